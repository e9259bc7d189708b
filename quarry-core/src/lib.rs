//! Quarry: an in-memory TF-IDF document index.
//!
//! Documents are indexed word by word; queries are space-separated words
//! where a leading `-` excludes every document containing that word.
//! Results are ranked by TF-IDF relevance, ties broken by rating, and capped
//! at [`MAX_RESULT_DOCUMENT_COUNT`].
//!
//! ```
//! use quarry_core::{DocumentStatus, Quarry};
//!
//! let mut index = Quarry::from_stop_words_text("in the").unwrap();
//! index.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
//! index.add_document(43, "dog in the city", DocumentStatus::Actual, &[3, 4, 5]).unwrap();
//!
//! let hits = index.find_top_documents("cat -dog").unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, 42);
//! ```

pub mod analyzer;
pub mod arena;
pub mod concurrent;
pub mod duplicates;
pub mod index;
pub mod paginator;
pub mod process;
pub mod request_queue;

pub use duplicates::{find_duplicates, remove_duplicates};
pub use index::{EngineMetrics, Quarry, Query};
pub use paginator::{paginate, Paginator};
pub use process::{process_queries, process_queries_joined};
pub use quarry_types::*;
pub use request_queue::{RequestQueue, REQUEST_WINDOW_TICKS};
