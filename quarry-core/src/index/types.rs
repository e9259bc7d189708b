//! Index types and constructors.

use crate::analyzer::StopWords;
use crate::arena::{WordArena, WordId};
use quarry_types::{DocId, DocumentStatus, SearchConfig, SearchError};

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Posting list: document id -> term frequency of one word.
pub(crate) type Postings = BTreeMap<DocId, f64>;

/// Per-document metadata held by the document store.
#[derive(Debug, Clone)]
pub(crate) struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
    /// Indexed words in document order, duplicates retained.
    pub tokens: Vec<WordId>,
    /// Distinct words -> term frequency.
    pub word_freqs: BTreeMap<WordId, f64>,
}

/// In-memory TF-IDF document index.
///
/// Writers (`add_document`, `remove_document`) take `&mut self`; every read
/// path, including the parallel ones, takes `&self`. The borrow checker
/// therefore enforces the single-writer discipline: concurrent readers are
/// fine, a writer excludes everyone else.
pub struct Quarry {
    pub(crate) words: WordArena,
    pub(crate) stop_words: StopWords,
    /// Inverted index, indexed by `WordId`. An empty list means the word
    /// currently occurs in no live document.
    pub(crate) postings: Vec<Postings>,
    /// Document store, ordered by id.
    pub(crate) documents: BTreeMap<DocId, DocumentData>,
    pub(crate) config: SearchConfig,
    /// Total number of documents added
    pub(crate) documents_added: u64,
    /// Total number of documents removed
    pub(crate) documents_removed: u64,
    /// Total number of ranked searches executed
    pub(crate) query_count: AtomicU64,
}

impl Default for Quarry {
    fn default() -> Self {
        Self::new()
    }
}

impl Quarry {
    /// Creates a new, empty index without stop words.
    pub fn new() -> Self {
        Self::with_config(StopWords::new(), SearchConfig::default())
    }

    /// Creates a new index with the given stop words.
    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self::with_config(stop_words, SearchConfig::default())
    }

    /// Creates a new index with stop words and custom configuration.
    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Self {
        Self {
            words: WordArena::new(),
            stop_words,
            postings: Vec::new(),
            documents: BTreeMap::new(),
            config,
            documents_added: 0,
            documents_removed: 0,
            query_count: AtomicU64::new(0),
        }
    }

    /// Creates a new index from a whitespace-delimited stop-word string.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if a stop word fails validation.
    pub fn from_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Ok(Self::with_stop_words(StopWords::from_text(text)?))
    }

    /// Creates a new index from a container of stop words.
    ///
    /// Empty strings are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if a stop word fails validation.
    pub fn from_stop_words<I, S>(words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWords::from_words(words)?))
    }

    /// Returns the active configuration.
    #[inline(always)]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the stop-word set.
    #[inline(always)]
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Returns `true` if the index contains no documents.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the posting list of `word` if it occurs in any live document.
    #[inline]
    pub(crate) fn postings_for(&self, word: &str) -> Option<&Postings> {
        let id = self.words.lookup(word)?;
        self.postings
            .get(id as usize)
            .filter(|postings| !postings.is_empty())
    }

    /// Returns basic metrics about the engine's operation.
    #[inline(always)]
    #[must_use]
    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics {
            documents_indexed: self.documents_added,
            documents_removed: self.documents_removed,
            queries_executed: self.query_count.load(Ordering::Relaxed),
            current_doc_count: self.documents.len() as u64,
            distinct_words: self.words.len() as u64,
        }
    }
}

/// Basic operational metrics for the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Total number of documents added.
    pub documents_indexed: u64,
    /// Total number of documents removed.
    pub documents_removed: u64,
    /// Total number of ranked searches executed.
    pub queries_executed: u64,
    /// Current number of documents in the index.
    pub current_doc_count: u64,
    /// Distinct words ever interned, including ones no live document uses.
    pub distinct_words: u64,
}
