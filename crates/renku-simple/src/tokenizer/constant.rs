//! Constant lexing.
//!
//! A `#` introduces one of the three named constants `nil`, `t` and
//! `f`. Whitespace may separate the `#` from the name; anything other
//! than a recognized name is an error.

use renku_types::Value;
use renku_util::{Error, Position, Result};

use super::core::{State, Tokenizer};
use crate::token::is_symbol_subsequent;

impl<'a> Tokenizer<'a> {
    /// Enters the constant state after a `#`.
    pub(crate) fn begin_constant(&mut self, next: Option<char>, position: Position) -> Result<()> {
        if next.is_none() {
            return Err(Error::token("unexpected end of input after '#'", position));
        }
        self.state = State::Constant {
            name: String::new(),
        };
        Ok(())
    }

    /// Accumulates the constant name and resolves it when the
    /// lookahead terminates it.
    pub(crate) fn step_constant(
        &mut self,
        mut name: String,
        c: char,
        next: Option<char>,
        position: Position,
    ) -> Result<()> {
        // Whitespace between '#' and the constant name is allowed.
        if name.is_empty() && c.is_whitespace() {
            if next.is_none() {
                return Err(Error::token("unexpected end of input after '#'", position));
            }
            self.state = State::Constant { name };
            return Ok(());
        }

        if !c.is_ascii_alphabetic() {
            return Err(Error::token(
                format!("unexpected character '{}' after '#'", c),
                position,
            ));
        }

        name.push(c);
        let done = match next {
            None => true,
            Some(following) => !is_symbol_subsequent(following),
        };
        if !done {
            self.state = State::Constant { name };
            return Ok(());
        }

        let value = match name.as_str() {
            "nil" => Value::Omega,
            "t" => Value::Boolean(true),
            "f" => Value::Boolean(false),
            other => {
                return Err(Error::token(
                    format!("unrecognized constant '#{}'", other),
                    position,
                ));
            },
        };
        self.emit_literal(value);
        Ok(())
    }
}
