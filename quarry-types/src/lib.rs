//! Core types and traits for the Quarry search engine.
//!
//! This crate provides the types shared between the index engine and
//! anything layered on top of it. Keeping them separate ensures:
//!
//! - **Stable vocabulary**: statuses, hits and errors mean the same thing everywhere
//! - **No engine coupling**: consumers can name results without pulling in the index
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::cmp::Ordering;
use core::fmt;

/// Document identifier supplied by the caller.
///
/// Identifiers are signed so that callers can pass whatever their own
/// numbering scheme produces; the index rejects negative values on insert.
pub type DocId = i32;

/// Maximum number of documents returned by a single ranked search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance values closer than this are considered equal when ranking.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Lifecycle tag attached to every document.
///
/// The engine never interprets the status itself; it is only handed to
/// caller-supplied predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentStatus {
    /// Live document, matched by default searches.
    #[default]
    Actual,
    /// Kept in the index but no longer relevant.
    Irrelevant,
    /// Blocked by moderation.
    Banned,
    /// Logically removed by the caller.
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Actual => "ACTUAL",
            DocumentStatus::Irrelevant => "IRRELEVANT",
            DocumentStatus::Banned => "BANNED",
            DocumentStatus::Removed => "REMOVED",
        };
        f.write_str(name)
    }
}

/// A ranked search hit.
///
/// Hits are ordered by relevance (descending); relevances within
/// [`RELEVANCE_EPSILON`] of each other are ordered by rating (descending).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Document {
    /// Document identifier
    pub id: DocId,
    /// TF-IDF relevance (non-negative)
    pub relevance: f64,
    /// Average rating computed at insertion
    pub rating: i32,
}

impl Document {
    /// Creates a new search hit.
    #[inline(always)]
    pub const fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self {
            id,
            relevance,
            rating,
        }
    }

    /// Pairwise ranking comparison: `Less` means `self` ranks first.
    ///
    /// This is the comparison callers observe on a result list. It is not
    /// transitive across chains of near-equal relevances, so the engine never
    /// sorts with it directly; ranked output agrees with it on every adjacent
    /// pair.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        if (self.relevance - other.relevance).abs() < RELEVANCE_EPSILON {
            other.rating.cmp(&self.rating)
        } else {
            other.relevance.total_cmp(&self.relevance)
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Caller-supplied document filter applied during ranking.
///
/// Implemented for any `Fn(DocId, DocumentStatus, i32) -> bool` closure and
/// for [`DocumentStatus`] itself, which selects documents with that status.
/// Predicates must be `Sync` because the parallel ranking path evaluates
/// them from worker threads.
pub trait DocumentPredicate: Sync {
    /// Returns `true` if the document should take part in ranking.
    fn matches(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool;
}

impl<F> DocumentPredicate for F
where
    F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    #[inline(always)]
    fn matches(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool {
        self(id, status, rating)
    }
}

impl DocumentPredicate for DocumentStatus {
    #[inline(always)]
    fn matches(&self, _id: DocId, status: DocumentStatus, _rating: i32) -> bool {
        *self == status
    }
}

/// Selects how an operation spreads its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Run on the calling thread.
    #[default]
    Sequential,
    /// Fan out over the global worker pool.
    Parallel,
}

/// Why a single word was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordDefect {
    /// The word has no characters.
    Empty,
    /// The word is a bare `-`.
    LoneMinus,
    /// The word starts with `--`.
    DoubleMinus,
    /// The word contains a byte below `0x20`.
    ControlCharacter,
}

impl fmt::Display for WordDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            WordDefect::Empty => "word is empty",
            WordDefect::LoneMinus => "word is a lone minus sign",
            WordDefect::DoubleMinus => "word starts with a double minus",
            WordDefect::ControlCharacter => "word contains control characters",
        };
        f.write_str(reason)
    }
}

/// Broad classification of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a malformed or conflicting value.
    InvalidArgument,
    /// An ordinal was past the end of the document set.
    OutOfRange,
}

/// Errors reported by index operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Document identifiers must be non-negative.
    NegativeDocumentId {
        /// The rejected identifier.
        id: DocId,
    },
    /// A document with this identifier is already indexed.
    DuplicateDocumentId {
        /// The rejected identifier.
        id: DocId,
    },
    /// No live document has this identifier.
    UnknownDocumentId {
        /// The identifier that was looked up.
        id: DocId,
    },
    /// Document text contains bytes below `0x20`.
    ControlCharacters,
    /// A query word, document word or stop word failed validation.
    InvalidWord {
        /// The offending word as written by the caller.
        word: String,
        /// What was wrong with it.
        defect: WordDefect,
    },
    /// Ordinal lookup past the end of the document set.
    OutOfRange {
        /// The requested ordinal.
        index: usize,
        /// Number of live documents.
        len: usize,
    },
    /// Pagination was requested with a page size of zero.
    ZeroPageSize,
    /// The word arena cannot address any more text.
    CapacityExceeded,
}

impl SearchError {
    /// Returns the broad category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            SearchError::OutOfRange { .. } => ErrorKind::OutOfRange,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NegativeDocumentId { id } => {
                write!(f, "document id must not be negative: {}", id)
            }
            SearchError::DuplicateDocumentId { id } => {
                write!(f, "document id {} is already indexed", id)
            }
            SearchError::UnknownDocumentId { id } => {
                write!(f, "no document with id {}", id)
            }
            SearchError::ControlCharacters => {
                write!(f, "document contains control characters (0x00-0x1F)")
            }
            SearchError::InvalidWord { word, defect } => {
                write!(f, "invalid word {:?}: {}", word, defect)
            }
            SearchError::OutOfRange { index, len } => {
                write!(
                    f,
                    "document ordinal {} out of range ({} documents)",
                    index, len
                )
            }
            SearchError::ZeroPageSize => write!(f, "page size must be positive"),
            SearchError::CapacityExceeded => write!(f, "word storage capacity exceeded"),
        }
    }
}

impl core::error::Error for SearchError {}

/// Tuning knobs for the parallel ranking path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Live documents per accumulation shard.
    /// Default: 32 (a 3,200-document index ranks into 100 shards)
    pub docs_per_shard: usize,
    /// Upper bound on the shard count regardless of index size.
    pub max_shards: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            docs_per_shard: 32,
            max_shards: 1024,
        }
    }
}

impl SearchConfig {
    /// Creates a configuration with many small shards, for heavily threaded hosts.
    pub const fn fine_grained() -> Self {
        Self {
            docs_per_shard: 4,
            max_shards: 8192,
        }
    }

    /// Creates a configuration with few large shards, for small hosts.
    pub const fn coarse() -> Self {
        Self {
            docs_per_shard: 256,
            max_shards: 64,
        }
    }

    /// Number of shards to use for an index holding `doc_count` documents.
    ///
    /// Always at least one.
    pub fn shard_count(&self, doc_count: usize) -> usize {
        (doc_count / self.docs_per_shard.max(1)).clamp(1, self.max_shards.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_cmp_orders_by_relevance_then_rating() {
        let high = Document::new(1, 0.9, 0);
        let low = Document::new(2, 0.5, 10);
        assert_eq!(high.rank_cmp(&low), Ordering::Less);
        assert_eq!(low.rank_cmp(&high), Ordering::Greater);

        // Within epsilon, the higher rating wins
        let a = Document::new(3, 0.5, 1);
        let b = Document::new(4, 0.5 + RELEVANCE_EPSILON / 2.0, 7);
        assert_eq!(b.rank_cmp(&a), Ordering::Less);
        assert_eq!(a.rank_cmp(&b), Ordering::Greater);
    }

    #[test]
    fn document_display() {
        let doc = Document::new(42, 0.5, 2);
        assert_eq!(
            doc.to_string(),
            "{ document_id = 42, relevance = 0.5, rating = 2 }"
        );
    }

    #[test]
    fn status_is_a_predicate() {
        assert!(DocumentStatus::Banned.matches(1, DocumentStatus::Banned, 0));
        assert!(!DocumentStatus::Banned.matches(1, DocumentStatus::Actual, 0));
    }

    #[test]
    fn closures_are_predicates() {
        let even = |id: DocId, _: DocumentStatus, _: i32| id % 2 == 0;
        assert!(even.matches(2, DocumentStatus::Actual, 0));
        assert!(!even.matches(3, DocumentStatus::Actual, 0));
    }

    #[test]
    fn error_kinds() {
        assert_eq!(
            SearchError::OutOfRange { index: 3, len: 1 }.kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            SearchError::NegativeDocumentId { id: -1 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(SearchError::ZeroPageSize.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn error_display_names_the_word() {
        let err = SearchError::InvalidWord {
            word: "--cat".to_string(),
            defect: WordDefect::DoubleMinus,
        };
        assert_eq!(
            err.to_string(),
            "invalid word \"--cat\": word starts with a double minus"
        );
    }

    #[test]
    fn shard_count_scales_and_clamps() {
        let config = SearchConfig::default();
        assert_eq!(config.shard_count(0), 1);
        assert_eq!(config.shard_count(31), 1);
        assert_eq!(config.shard_count(3200), 100);
        assert_eq!(config.shard_count(usize::MAX), config.max_shards);

        let degenerate = SearchConfig {
            docs_per_shard: 0,
            max_shards: 0,
        };
        assert_eq!(degenerate.shard_count(10), 1);
    }
}
