//! Error types shared by the Renku codecs.
//!
//! Every failure a codec can produce is a variant of [`Error`]. The codecs
//! attempt no local recovery: a failed tokenize or parse aborts and the
//! error is surfaced to the caller of the entry point that triggered it.

use thiserror::Error;

/// A source position for error reporting.
///
/// The simple codec fills in 1-based line and column numbers as it walks
/// code points; the canonical codec reports the byte offset into its input
/// (its notion of a "line" is always 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    /// Byte (canonical codec) or code-point (simple codec) offset, 0-based.
    pub offset: usize,

    /// Line number, 1-based.
    pub line: u32,

    /// Column number, 1-based.
    pub column: u32,
}

impl Position {
    /// Creates a position from explicit line/column coordinates.
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Creates a position from a flat offset into a byte stream.
    pub fn at_offset(offset: usize) -> Self {
        Self {
            offset,
            line: 1,
            column: offset as u32 + 1,
        }
    }

    /// The position of the first input element.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors produced by the Renku codecs.
#[derive(Debug, Error)]
pub enum Error {
    /// Lexical failure: unmatched brackets, EOF inside a string, a bad
    /// constant name, a bad length prefix.
    #[error("lexical error at {position}: {message}")]
    Token { message: String, position: Position },

    /// Structural failure: a detached `:`, non-contiguous sequence
    /// indices, a malformed typed tuple.
    #[error("syntax error at {position}: {message}")]
    Syntax { message: String, position: Position },

    /// A value variant with no defined encoding was offered to a
    /// serializer.
    #[error("cannot serialize a value of type {variant}")]
    Unserializable { variant: &'static str },

    /// A value offered to a codec is malformed.
    #[error("invalid value: {message}")]
    Value { message: String },

    /// Byte-to-text decoding failed while reading a source.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A sink or source operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a lexical error at the given position.
    pub fn token(message: impl Into<String>, position: Position) -> Self {
        Error::Token {
            message: message.into(),
            position,
        }
    }

    /// Creates a structural error at the given position.
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Error::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Creates an error for a value variant with no encoding.
    pub fn unserializable(variant: &'static str) -> Self {
        Error::Unserializable { variant }
    }

    /// Creates an error for a malformed value.
    pub fn value(message: impl Into<String>) -> Self {
        Error::Value {
            message: message.into(),
        }
    }

    /// Creates a decoding error.
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

/// Result type alias used throughout the Renku crates.
pub type Result<T> = std::result::Result<T, Error>;
