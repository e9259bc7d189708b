//! In-memory TF-IDF index: document store, inverted index and ranking.
//!
//! Memory Layout:
//! - Every distinct word lives once in a [`WordArena`](crate::arena::WordArena);
//!   documents and posting lists refer to it by `WordId`
//! - Posting lists are a `Vec` indexed by `WordId`, each an ordered
//!   document id -> term frequency map
//! - The document store is ordered by id, which gives ascending iteration and
//!   deterministic ranking input for free
//!
//! Threading:
//! - [`Quarry`] is `Send + Sync` and holds no locks. Writers take `&mut self`;
//!   searches, matches and batch queries take `&self` and may run from many
//!   threads at once. The `*_with` variants accept an
//!   [`ExecutionPolicy`](quarry_types::ExecutionPolicy) to fan a single call
//!   out over the rayon pool.

mod api;
mod matching;
mod query;
mod scoring;
mod search;
mod types;

pub use api::DocIds;
pub use query::Query;
pub use types::{EngineMetrics, Quarry};
