//! Whitespace Tokenizer
//!
//! Splits raw document or query text into words. This is the first stage of
//! both the indexing and the query pipeline; it performs no validation and
//! no stop-word filtering, which happen afterwards.
//!
//! ## What It Does
//!
//! Given input like `"cat  in the city"`, it emits each word in order:
//!
//! ```ignore
//! "cat"
//! "in"
//! "the"
//! "city"
//! ```
//!
//! Runs of spaces, as well as leading and trailing spaces, produce no tokens.
//!
//! ## Key Features
//!
//! - **Zero Allocation**: tokens are slices of the input, not copies
//! - **Streaming**: tokens are handed to a callback, no intermediate collection
//! - **Fast**: a `memchr` scan for the ASCII space byte (0x20)
//!
//! Other whitespace bytes (tab, newline) are control characters and are
//! rejected by validation before text is indexed, so splitting on the space
//! byte alone is sufficient for every input that reaches the index.

use memchr::memchr_iter;

/// Streaming whitespace tokenizer.
///
/// ## Example
///
/// ```
/// use quarry_core::analyzer::Tokenizer;
///
/// let mut count = 0;
/// Tokenizer::new().tokenize("hello  world foo", |_word| count += 1);
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes `text` and emits each non-empty word.
    #[inline(always)]
    pub fn tokenize<'t, F>(&self, text: &'t str, mut emit: F)
    where
        F: FnMut(&'t str),
    {
        let bytes = text.as_bytes();
        let mut start = 0usize;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // Splitting on an ASCII byte always lands on a char boundary.
                emit(&text[start..i]);
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&text[start..]);
        }
    }
}

/// Splits `text` into its words, in order.
pub fn split_into_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    Tokenizer::new().tokenize(text, |word| words.push(word));
    words
}
