//! Matching a query against a single document.

use crate::arena::WordId;
use crate::index::types::{DocumentData, Quarry};
use quarry_types::{DocId, DocumentStatus, ExecutionPolicy, SearchError};

use rayon::prelude::*;
use smallvec::SmallVec;

/// Query words resolved to handles; words never interned cannot match.
type WordIds = SmallVec<[WordId; 8]>;

impl Quarry {
    /// Returns the plus words of `raw_query` that occur in document `id`,
    /// sorted and deduplicated, together with the document's status.
    ///
    /// If any minus word occurs in the document the word list is empty.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` for a malformed query and
    /// `SearchError::UnknownDocumentId` if `id` is not in the index.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus), SearchError> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, id)
    }

    /// [`match_document`](Self::match_document) with an explicit execution policy.
    ///
    /// # Errors
    ///
    /// Same as [`match_document`](Self::match_document).
    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus), SearchError> {
        let query = self.parse_query(raw_query)?;
        let doc = self
            .documents
            .get(&id)
            .ok_or(SearchError::UnknownDocumentId { id })?;

        let plus = self.resolve(&query.plus_words);
        let minus = self.resolve(&query.minus_words);

        let words = match policy {
            ExecutionPolicy::Sequential => self.matched_words(doc, &plus, &minus),
            ExecutionPolicy::Parallel => self.matched_words_par(doc, &plus, &minus),
        };
        tracing::trace!(doc_id = id, ?policy, matched = words.len(), "document matched");
        Ok((words, doc.status))
    }

    /// Maps words to their handles, sorted for binary search.
    fn resolve(&self, words: &[&str]) -> WordIds {
        let mut ids: WordIds = words
            .iter()
            .filter_map(|word| self.words.lookup(word))
            .collect();
        ids.sort_unstable();
        ids
    }

    fn matched_words(&self, doc: &DocumentData, plus: &[WordId], minus: &[WordId]) -> Vec<&str> {
        if minus.iter().any(|word| doc.word_freqs.contains_key(word)) {
            return Vec::new();
        }
        let mut words: Vec<&str> = plus
            .iter()
            .filter(|&&word| doc.word_freqs.contains_key(&word))
            .filter_map(|&word| self.words.get(word))
            .collect();
        words.sort_unstable();
        words
    }

    /// Scans the document's token list in parallel. Each token becomes either
    /// its word or `None`; the `None` sentinels are compacted away before the
    /// final sort and dedup.
    fn matched_words_par(&self, doc: &DocumentData, plus: &[WordId], minus: &[WordId]) -> Vec<&str> {
        if doc
            .tokens
            .par_iter()
            .any(|token| minus.binary_search(token).is_ok())
        {
            return Vec::new();
        }

        let marked: Vec<Option<&str>> = doc
            .tokens
            .par_iter()
            .map(|&token| {
                if plus.binary_search(&token).is_ok() {
                    self.words.get(token)
                } else {
                    None
                }
            })
            .collect();

        let mut words: Vec<&str> = marked.into_iter().flatten().collect();
        words.par_sort_unstable();
        words.dedup();
        words
    }
}
