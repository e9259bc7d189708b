//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Tokenizer**: Splits raw text into words on spaces
//! - **Validator**: Rejects malformed words and control characters
//! - **Stop words**: Words dropped from documents and queries

pub mod stop_words;
pub mod tokenizer;
pub mod validator;

pub use stop_words::StopWords;
pub use tokenizer::{split_into_words, Tokenizer};
pub use validator::{check_word, contains_control_characters, validate_word};
