//! Word validation.
//!
//! A word is valid when it is non-empty, contains no byte below `0x20`, is not
//! a bare `-` and does not start with `--`. Query words are validated before
//! their single leading `-` (the minus marker) is stripped.

use quarry_types::{SearchError, WordDefect};

/// Checks if input contains control characters (bytes `0x00..=0x1F`).
#[inline]
pub fn contains_control_characters(input: &str) -> bool {
    input.bytes().any(|b| b < b' ')
}

/// Returns the first defect found in `word`, if any.
pub fn check_word(word: &str) -> Result<(), WordDefect> {
    if word.is_empty() {
        return Err(WordDefect::Empty);
    }
    if contains_control_characters(word) {
        return Err(WordDefect::ControlCharacter);
    }
    if word == "-" {
        return Err(WordDefect::LoneMinus);
    }
    if word.starts_with("--") {
        return Err(WordDefect::DoubleMinus);
    }
    Ok(())
}

/// Validates `word`, reporting failures as [`SearchError::InvalidWord`].
pub fn validate_word(word: &str) -> Result<(), SearchError> {
    check_word(word).map_err(|defect| SearchError::InvalidWord {
        word: word.to_owned(),
        defect,
    })
}
