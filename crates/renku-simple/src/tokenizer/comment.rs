//! Comment skipping.
//!
//! A `;` consumes through the next newline. A comment with content may
//! end at end of input; a bare `;` as the final code point is an error.

use renku_util::{Error, Position, Result};

use super::core::{State, Tokenizer};

impl<'a> Tokenizer<'a> {
    /// Enters the comment state after a `;`.
    pub(crate) fn begin_comment(&mut self, next: Option<char>, position: Position) -> Result<()> {
        if next.is_none() {
            return Err(Error::token(
                "unexpected end of input after comment indicator",
                position,
            ));
        }
        self.state = State::Comment;
        Ok(())
    }

    /// Consumes one comment code point; a newline returns to dispatch.
    pub(crate) fn step_comment(&mut self, c: char) {
        if c != '\n' {
            self.state = State::Comment;
        }
    }
}
