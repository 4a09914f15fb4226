//! Symbol lexing.
//!
//! Symbols are the identifier tokens of the notation; they become
//! `Bytes` literals. A symbol ends when the lookahead is anything
//! outside the subsequent-character class.

use renku_types::Value;

use super::core::{terminates_symbol, State, Tokenizer};

impl<'a> Tokenizer<'a> {
    /// Starts a symbol at its initial code point, emitting immediately
    /// when the lookahead already terminates it.
    pub(crate) fn begin_symbol(&mut self, initial: char, next: Option<char>) {
        if terminates_symbol(next) {
            self.emit_literal(Value::Bytes(String::from(initial).into_bytes()));
        } else {
            self.state = State::Symbol {
                buffer: String::from(initial),
            };
        }
    }

    /// Continues a symbol by one code point.
    pub(crate) fn step_symbol(&mut self, mut buffer: String, c: char, next: Option<char>) {
        buffer.push(c);
        if terminates_symbol(next) {
            self.emit_literal(Value::Bytes(buffer.into_bytes()));
        } else {
            self.state = State::Symbol { buffer };
        }
    }
}
