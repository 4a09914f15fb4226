//! Core tokenizer implementation.
//!
//! A byte-level machine over a one-element lookahead stream. Marker
//! bytes become tokens directly; a decimal digit hands off to the atom
//! lexer, whose length/separator/payload states live in `atom`.

use renku_util::{Error, Lookahead, Position, Result};

use crate::token::Token;

/// Streams canonical-expression tokens out of a byte slice.
///
/// # Example
///
/// ```
/// use renku_canon::{Token, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new(b"3:cat");
/// assert_eq!(
///     tokenizer.next_token().unwrap(),
///     Some(Token::Atom(b"cat".to_vec()))
/// );
/// assert_eq!(tokenizer.next_token().unwrap(), None);
/// ```
pub struct Tokenizer<'a> {
    input: Lookahead<std::iter::Copied<std::slice::Iter<'a, u8>>>,

    /// Offset of the next byte to be pulled.
    offset: usize,

    /// Set once an error has been reported; the iterator then fuses.
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over a canonical-expression byte string.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input: Lookahead::new(input.iter().copied()),
            offset: 0,
            failed: false,
        }
    }

    /// The position of the next unread byte, for error reporting.
    pub fn position(&self) -> Position {
        Position::at_offset(self.offset)
    }

    /// Returns the next token, `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let (byte, next) = match self.pull() {
            Some(pair) => pair,
            None => return Ok(None),
        };

        let token = match byte {
            b'[' => Token::TupleOpen,
            b']' => Token::TupleClose,
            b'(' => Token::SequenceOpen,
            b')' => Token::SequenceClose,
            b'=' => Token::Association,
            b'\'' => Token::Quote,
            b',' => Token::Unquote,
            b'`' => Token::UnquoteSplice,
            b'0' => return self.lex_empty_atom(next).map(Some),
            b'1'..=b'9' => return self.lex_atom(byte).map(Some),
            other => {
                return Err(self.error_here(format!("unexpected byte 0x{:02x}", other)));
            },
        };

        Ok(Some(token))
    }

    pub(crate) fn pull(&mut self) -> Option<(u8, Option<u8>)> {
        let pair = self.input.next();
        if pair.is_some() {
            self.offset += 1;
        }
        pair
    }

    /// An error positioned at the most recently pulled byte.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> Error {
        Error::token(message, Position::at_offset(self.offset.saturating_sub(1)))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            },
        }
    }
}
