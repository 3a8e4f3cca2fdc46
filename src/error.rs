//! Error types for TON parsing, serialization, and validation.
//!
//! Lexing and parsing stop at the first malformed construct and report it
//! with the 1-based line and column of the offending character. Validation
//! never surfaces through this type: data-shape violations are collected
//! into a [`ValidationResult`](crate::ValidationResult) so a caller sees
//! every failure in one pass.
//!
//! ## Examples
//!
//! ```rust
//! use ton_format::{parse, TonError};
//!
//! let result = parse("{name = }");
//! assert!(matches!(result, Err(TonError::Parse { .. })));
//! ```

use thiserror::Error;

/// All errors the TON engine can raise.
///
/// Each parsing-side variant includes the source position that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TonError {
    /// Invalid argument handed to an entry point (empty document text,
    /// an option combination that cannot be honored).
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Unrecognized input or unterminated literal in the lexer.
    #[error("Lex error at line {line}, column {column}: {msg}")]
    Lex {
        line: usize,
        column: usize,
        msg: String,
    },

    /// Structural error in the parser: unexpected token, depth exceeded,
    /// ordering violation.
    #[error("Parse error at line {line}, column {column}: {msg}")]
    Parse {
        line: usize,
        column: usize,
        msg: String,
    },

    /// Error while rendering a document tree back to text.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl TonError {
    /// Creates an argument error.
    pub fn argument(msg: impl Into<String>) -> Self {
        TonError::Argument(msg.into())
    }

    /// Creates a lex error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ton_format::TonError;
    ///
    /// let err = TonError::lex(10, 5, "unexpected character '~'");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn lex(line: usize, column: usize, msg: impl Into<String>) -> Self {
        TonError::Lex {
            line,
            column,
            msg: msg.into(),
        }
    }

    /// Creates a parse error with line and column information.
    pub fn parse(line: usize, column: usize, msg: impl Into<String>) -> Self {
        TonError::Parse {
            line,
            column,
            msg: msg.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialize(msg: impl Into<String>) -> Self {
        TonError::Serialize(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TonError>;
