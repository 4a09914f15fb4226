//! Length-prefixed atom lexing.
//!
//! An atom is `<decimal>:<octets>` with exactly `<decimal>` payload
//! octets. Length fields carry no leading zeros; the zero-length atom
//! is exactly `0:`. The states here are the length accumulation, the
//! `:` separator and the payload read.

use renku_util::Result;

use super::core::Tokenizer;
use crate::token::Token;

impl<'a> Tokenizer<'a> {
    /// Lexes the zero-length atom `0:`; a `0` followed by anything else
    /// is a malformed length prefix.
    pub(crate) fn lex_empty_atom(&mut self, next: Option<u8>) -> Result<Token> {
        match next {
            Some(b':') => {
                self.pull();
                Ok(Token::Atom(Vec::new()))
            },
            Some(b'0'..=b'9') => Err(self.error_here("length prefix with a leading zero")),
            _ => Err(self.error_here("expected ':' after zero-length prefix")),
        }
    }

    /// Lexes an atom starting from its first (non-zero) length digit.
    pub(crate) fn lex_atom(&mut self, first_digit: u8) -> Result<Token> {
        let mut length = (first_digit - b'0') as usize;

        // Length state: accumulate digits until the separator.
        loop {
            match self.pull() {
                Some((digit @ b'0'..=b'9', _)) => {
                    length = length
                        .checked_mul(10)
                        .and_then(|n| n.checked_add((digit - b'0') as usize))
                        .ok_or_else(|| self.error_here("length prefix out of range"))?;
                },
                Some((b':', _)) => break,
                Some((other, _)) => {
                    return Err(self.error_here(format!(
                        "expected digit or ':' in length prefix, found 0x{:02x}",
                        other
                    )));
                },
                None => {
                    return Err(self.error_here("unexpected end of input in length prefix"));
                },
            }
        }

        // Symbol state: exactly `length` payload octets.
        let mut bytes = Vec::with_capacity(length.min(4096));
        for _ in 0..length {
            match self.pull() {
                Some((byte, _)) => bytes.push(byte),
                None => {
                    return Err(self.error_here(format!(
                        "unexpected end of input inside atom: expected {} octets, found {}",
                        length,
                        bytes.len()
                    )));
                },
            }
        }

        Ok(Token::Atom(bytes))
    }
}
