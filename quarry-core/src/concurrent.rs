//! Sharded concurrent accumulation map.
//!
//! A fixed number of buckets, each an ordered map behind its own lock. A key
//! is routed to `hash(key) % bucket_count`, so two threads only contend when
//! their keys land in the same bucket. The bucket count never changes after
//! construction.
//!
//! Used as scratch space by the parallel ranking path; drained into an
//! ordinary map with [`ConcurrentMap::build_ordinary_map`] once all writers
//! are done.

use core::hash::{BuildHasher, Hash};
use core::ops::{Deref, DerefMut};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use rustc_hash::FxBuildHasher;
use std::collections::BTreeMap;

/// Fixed-bucket map with one lock per bucket.
pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
    hasher: FxBuildHasher,
}

/// Locked access to one value. The bucket stays locked until this is dropped.
pub struct Access<'a, V> {
    guard: MappedMutexGuard<'a, V>,
}

impl<V> Deref for Access<'_, V> {
    type Target = V;

    #[inline(always)]
    fn deref(&self) -> &V {
        &self.guard
    }
}

impl<V> DerefMut for Access<'_, V> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard
    }
}

impl<K: Hash + Ord, V> ConcurrentMap<K, V> {
    /// Creates a map with `bucket_count` buckets (at least one).
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1))
            .map(|_| Mutex::new(BTreeMap::new()))
            .collect();
        Self {
            buckets,
            hasher: FxBuildHasher,
        }
    }

    /// Number of buckets.
    #[inline(always)]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline(always)]
    fn bucket(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        let index = (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize;
        &self.buckets[index]
    }

    /// Locks the bucket owning `key` and returns its value, inserting
    /// `V::default()` first if absent.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        let guard = self.bucket(&key).lock();
        Access {
            guard: MutexGuard::map(guard, |map| map.entry(key).or_default()),
        }
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn erase(&self, key: &K) -> bool {
        self.bucket(key).lock().remove(key).is_some()
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.lock().len()).sum()
    }

    /// Returns `true` if no bucket holds an entry.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.lock().is_empty())
    }

    /// Drains every bucket into a single ordered map.
    pub fn build_ordinary_map(self) -> BTreeMap<K, V> {
        let mut out = BTreeMap::new();
        for bucket in self.buckets {
            let mut entries = bucket.into_inner();
            out.append(&mut entries);
        }
        out
    }
}
