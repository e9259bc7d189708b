//! Public API for adding, inspecting and removing documents.

use crate::analyzer::{contains_control_characters, split_into_words};
use crate::arena::WordId;
use crate::index::scoring::average_rating;
use crate::index::types::{DocumentData, Postings, Quarry};
use quarry_types::{DocId, DocumentStatus, ExecutionPolicy, SearchError};

use rayon::prelude::*;
use std::collections::{btree_map, BTreeMap};

impl Quarry {
    /// Adds a document to the index.
    ///
    /// The rating is the truncating average of `ratings` (0 when empty).
    /// Either the whole document is indexed or, on error, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::NegativeDocumentId` or `DuplicateDocumentId` for a bad id,
    /// and `SearchError::ControlCharacters` if the text contains bytes below `0x20`.
    /// Words are otherwise indexed as written: `-` and `--x` are ordinary words here,
    /// minus syntax only means something in queries.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if id < 0 {
            return Err(SearchError::NegativeDocumentId { id });
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::DuplicateDocumentId { id });
        }
        if contains_control_characters(text) {
            return Err(SearchError::ControlCharacters);
        }

        let words = self.split_into_words_no_stop(text);

        // Interning may grow the arena, but postings are untouched until
        // every word has a handle.
        let mut tokens: Vec<WordId> = Vec::with_capacity(words.len());
        for word in words {
            tokens.push(self.words.intern(word).ok_or(SearchError::CapacityExceeded)?);
        }

        let mut word_freqs: BTreeMap<WordId, f64> = BTreeMap::new();
        let inv_word_count = 1.0 / tokens.len() as f64;
        for &word in &tokens {
            *word_freqs.entry(word).or_insert(0.0) += inv_word_count;
        }

        if self.postings.len() < self.words.len() {
            self.postings.resize_with(self.words.len(), Postings::new);
        }
        for (&word, &term_freq) in &word_freqs {
            self.postings[word as usize].insert(id, term_freq);
        }

        tracing::debug!(
            doc_id = id,
            tokens = tokens.len(),
            distinct = word_freqs.len(),
            "document added"
        );

        self.documents.insert(
            id,
            DocumentData {
                rating: average_rating(ratings),
                status,
                tokens,
                word_freqs,
            },
        );
        self.documents_added += 1;
        Ok(())
    }

    /// Returns the number of live documents.
    #[inline(always)]
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Returns the id at `ordinal` in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::OutOfRange` if `ordinal >= document_count()`.
    pub fn document_id(&self, ordinal: usize) -> Result<DocId, SearchError> {
        self.documents
            .keys()
            .nth(ordinal)
            .copied()
            .ok_or(SearchError::OutOfRange {
                index: ordinal,
                len: self.documents.len(),
            })
    }

    /// Iterates live document ids in ascending order.
    pub fn iter(&self) -> DocIds<'_> {
        DocIds {
            inner: self.documents.keys(),
        }
    }

    /// Returns the status and rating of a live document.
    pub fn document_info(&self, id: DocId) -> Option<(DocumentStatus, i32)> {
        self.documents.get(&id).map(|doc| (doc.status, doc.rating))
    }

    /// Returns the word -> term frequency mapping of a document.
    ///
    /// An unknown id yields an empty map, indistinguishable from a live
    /// document whose words were all stop words.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<&str, f64> {
        let Some(doc) = self.documents.get(&id) else {
            return BTreeMap::new();
        };
        doc.word_freqs
            .iter()
            .filter_map(|(&word, &freq)| Some((self.words.get(word)?, freq)))
            .collect()
    }

    /// Removes a document. Unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with(ExecutionPolicy::Sequential, id);
    }

    /// Removes a document using the given execution policy.
    ///
    /// The parallel policy erases the id from each of the document's posting
    /// lists concurrently; every list belongs to a distinct word, so the
    /// workers never touch the same list.
    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, id: DocId) {
        let Some(doc) = self.documents.remove(&id) else {
            return;
        };

        match policy {
            ExecutionPolicy::Sequential => {
                for &word in doc.word_freqs.keys() {
                    if let Some(postings) = self.postings.get_mut(word as usize) {
                        postings.remove(&id);
                    }
                }
            }
            ExecutionPolicy::Parallel => {
                let lists = disjoint_postings_mut(
                    &mut self.postings,
                    doc.word_freqs.keys().map(|&word| word as usize),
                );
                lists.into_par_iter().for_each(|postings| {
                    postings.remove(&id);
                });
            }
        }

        self.documents_removed += 1;
        tracing::debug!(doc_id = id, ?policy, "document removed");
    }

    /// Splits text into words, dropping stop words.
    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Vec<&'t str> {
        split_into_words(text)
            .into_iter()
            .filter(|word| !self.stop_words.contains(word))
            .collect()
    }
}

/// Ascending iterator over live document ids.
pub struct DocIds<'a> {
    inner: btree_map::Keys<'a, DocId, DocumentData>,
}

impl Iterator for DocIds<'_> {
    type Item = DocId;

    #[inline]
    fn next(&mut self) -> Option<DocId> {
        self.inner.next().copied()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for DocIds<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<DocId> {
        self.inner.next_back().copied()
    }
}

impl ExactSizeIterator for DocIds<'_> {}

impl<'a> IntoIterator for &'a Quarry {
    type Item = DocId;
    type IntoIter = DocIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrows the elements at `ascending_indices` mutably, all at once.
///
/// Indices must be ascending; repeats and out-of-range indices are skipped.
fn disjoint_postings_mut<I>(postings: &mut [Postings], ascending_indices: I) -> Vec<&mut Postings>
where
    I: IntoIterator<Item = usize>,
{
    let mut out = Vec::new();
    let mut rest = postings;
    let mut base = 0usize;

    for index in ascending_indices {
        let Some(skip) = index.checked_sub(base) else {
            continue;
        };
        if skip >= rest.len() {
            break;
        }
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(skip + 1);
        if let Some(list) = head.last_mut() {
            out.push(list);
        }
        rest = tail;
        base = index + 1;
    }
    out
}
