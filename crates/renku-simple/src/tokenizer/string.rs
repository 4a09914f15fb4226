//! String literal lexing.
//!
//! A string opens with any of the paired quotation families and closes
//! with its family's close quote. Inside a string exactly two escapes
//! exist: a backslash before the close quote and a doubled backslash;
//! every other backslash is ordinary content.

use renku_types::Value;
use renku_util::{Error, Position, Result};

use super::core::{State, Tokenizer};
use crate::token::close_quote_for;

impl<'a> Tokenizer<'a> {
    /// Enters the string state at an opening quotation mark.
    pub(crate) fn begin_string(
        &mut self,
        open: char,
        next: Option<char>,
        position: Position,
    ) -> Result<()> {
        if next.is_none() {
            return Err(Error::token(
                "unexpected end of input inside string",
                position,
            ));
        }
        self.state = State::Unicode {
            close: close_quote_for(open).unwrap_or(open),
            buffer: String::new(),
            escaped: false,
        };
        Ok(())
    }

    /// Consumes one string code point.
    pub(crate) fn step_unicode(
        &mut self,
        close: char,
        mut buffer: String,
        escaped: bool,
        c: char,
        next: Option<char>,
        position: Position,
    ) -> Result<()> {
        if escaped {
            buffer.push(c);
        } else if c == close {
            self.emit_literal(Value::Unicode(buffer));
            return Ok(());
        } else if c == '\\'
            && matches!(next, Some(following) if following == close || following == '\\')
        {
            self.state = State::Unicode {
                close,
                buffer,
                escaped: true,
            };
            return Ok(());
        } else {
            // Any other backslash is literal.
            buffer.push(c);
        }

        if next.is_none() {
            return Err(Error::token(
                "unexpected end of input inside string",
                position,
            ));
        }
        self.state = State::Unicode {
            close,
            buffer,
            escaped: false,
        };
        Ok(())
    }
}
