//! Query parsing.
//!
//! A raw query is a space-delimited list of words. A word prefixed with a
//! single `-` is a minus word: documents containing it never match. Every
//! word is validated before its marker is stripped, so `-` on its own and
//! anything starting with `--` fail the whole query. Stop words are dropped
//! from both sides.

use crate::analyzer::{split_into_words, validate_word};
use crate::index::types::Quarry;
use quarry_types::SearchError;

/// A parsed query. Both word lists are sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub(crate) plus_words: Vec<&'q str>,
    pub(crate) minus_words: Vec<&'q str>,
}

impl<'q> Query<'q> {
    /// Words a document should contain.
    pub fn plus_words(&self) -> &[&'q str] {
        &self.plus_words
    }

    /// Words a document must not contain.
    pub fn minus_words(&self) -> &[&'q str] {
        &self.minus_words
    }

    /// Returns `true` if the query has no usable words at all.
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

impl Quarry {
    /// Parses `raw_query` against this index's stop words.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` for a bare `-`, a word starting with
    /// `--`, or a word containing control characters.
    pub fn parse_query<'q>(&self, raw_query: &'q str) -> Result<Query<'q>, SearchError> {
        let mut query = Query::default();

        for token in split_into_words(raw_query) {
            validate_word(token)?;
            let (word, is_minus) = match token.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (token, false),
            };
            if self.stop_words.contains(word) {
                continue;
            }
            if is_minus {
                query.minus_words.push(word);
            } else {
                query.plus_words.push(word);
            }
        }

        query.plus_words.sort_unstable();
        query.plus_words.dedup();
        query.minus_words.sort_unstable();
        query.minus_words.dedup();

        Ok(query)
    }
}
