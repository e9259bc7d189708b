//! Interning Arena for Indexed Words
//!
//! Every distinct indexed word is stored exactly once, in a single contiguous
//! buffer. The inverted index and the per-document token lists refer to words
//! by [`WordId`] handles instead of owning or borrowing strings, so nothing in
//! the index can outlive the text it points at.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena Buffer: [cat][city][dog][mouse]...[free space]
//!               ^    ^     ^    ^
//!               |    |     |    |
//! Spans:       (0,3)(3,4) (7,3)(10,5) ...
//! WordId:        0    1     2    3
//! ```
//!
//! ## Performance
//!
//! - Interning: O(1) amortized - hash probe, then bump append on a miss
//! - Resolution: O(1) - slice from buffer
//! - Memory overhead: 8 bytes per word (u32 offset + u32 len) plus one lookup slot
//!
//! Words are never released; a handle stays valid for the lifetime of the arena
//! even after every document using the word has been removed.

use core::hash::BuildHasher;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

/// Stable handle to an interned word.
pub type WordId = u32;

/// Word reference - 8 bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordSpan {
    offset: u32,
    len: u32,
}

impl WordSpan {
    /// Creates a new word span.
    #[inline(always)]
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Returns the byte offset in the arena.
    #[inline(always)]
    pub const fn offset(self) -> usize {
        self.offset as usize
    }

    /// Returns the byte length.
    #[inline(always)]
    pub const fn len(self) -> usize {
        self.len as usize
    }
}

/// Bump-allocated intern pool for words.
pub struct WordArena {
    /// Contiguous storage buffer
    buffer: String,
    /// Word spans, indexed by `WordId`
    spans: Vec<WordSpan>,
    /// Word hash -> ids sharing that hash
    lookup: FxHashMap<u64, SmallVec<[WordId; 1]>>,
    hasher: FxBuildHasher,
}

impl Default for WordArena {
    fn default() -> Self {
        Self::new()
    }
}

impl WordArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024, 1024)
    }

    /// Creates a new arena with pre-allocated capacity.
    pub fn with_capacity(buffer_cap: usize, word_cap: usize) -> Self {
        Self {
            buffer: String::with_capacity(buffer_cap),
            spans: Vec::with_capacity(word_cap),
            lookup: FxHashMap::default(),
            hasher: FxBuildHasher,
        }
    }

    /// Returns the number of distinct words stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if no words are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the total bytes of word text stored.
    pub fn text_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Interns `word`, returning its handle.
    ///
    /// Returns the existing handle when the word is already stored, and
    /// `None` if the buffer or the handle space would exceed `u32::MAX`.
    pub fn intern(&mut self, word: &str) -> Option<WordId> {
        let hash = self.hasher.hash_one(word);
        if let Some(id) = self.find(hash, word) {
            return Some(id);
        }

        let offset = u32::try_from(self.buffer.len()).ok()?;
        let len = u32::try_from(word.len()).ok()?;
        if offset.checked_add(len).is_none() {
            return None;
        }
        let id = WordId::try_from(self.spans.len()).ok()?;

        self.buffer.push_str(word);
        self.spans.push(WordSpan::new(offset, len));
        self.lookup.entry(hash).or_default().push(id);
        Some(id)
    }

    /// Returns the handle of `word` if it has been interned.
    #[inline]
    pub fn lookup(&self, word: &str) -> Option<WordId> {
        self.find(self.hasher.hash_one(word), word)
    }

    /// Resolves a handle back to its word.
    #[inline(always)]
    pub fn get(&self, id: WordId) -> Option<&str> {
        let span = self.spans.get(id as usize)?;
        let start = span.offset();
        // Spans always cover whole `push_str` calls, so both ends are char boundaries.
        self.buffer.get(start..start + span.len())
    }

    fn find(&self, hash: u64, word: &str) -> Option<WordId> {
        self.lookup
            .get(&hash)?
            .iter()
            .copied()
            .find(|&id| self.get(id) == Some(word))
    }
}
