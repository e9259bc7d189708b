//! Stop-word set.

use crate::analyzer::tokenizer::split_into_words;
use crate::analyzer::validator::validate_word;
use quarry_types::SearchError;
use rustc_hash::FxHashSet;

/// Words excluded from indexing and from query interpretation.
///
/// Empty strings are ignored on construction; any other invalid word fails
/// construction.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: FxHashSet<String>,
}

impl StopWords {
    /// Creates an empty stop-word set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from a whitespace-delimited string.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if any word fails validation.
    pub fn from_text(text: &str) -> Result<Self, SearchError> {
        Self::from_words(split_into_words(text))
    }

    /// Builds the set from individual words.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidWord` if any non-empty word fails validation.
    pub fn from_words<I, S>(words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FxHashSet::default();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            validate_word(word)?;
            set.insert(word.to_owned());
        }
        Ok(Self { words: set })
    }

    /// Returns `true` if `word` is a stop word.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of distinct stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if there are no stop words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
