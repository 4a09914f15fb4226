//! Core tokenizer implementation.
//!
//! The machine is driven by `(current, lookahead)` pairs pulled from a
//! one-element lookahead stream: on each code point `c` it inspects the
//! following code point to decide between continuation and termination,
//! so no state ever needs to push back input. Completed tokens collect
//! in a small queue because one step can finish two tokens at once
//! (`1/` ends a number and begins a symbol).
//!
//! The bracket stack lives here too: bracket-family mismatches are
//! lexical errors in this notation.

use std::collections::VecDeque;

use renku_types::Value;
use renku_util::{Error, Lookahead, Position, Result};

use crate::token::{close_quote_for, is_symbol_initial, is_symbol_subsequent, Syntax, Token};

/// Streams simple-expression tokens out of a source string.
///
/// # Example
///
/// ```
/// use renku_simple::{Token, Tokenizer};
/// use renku_types::Value;
///
/// let mut tokenizer = Tokenizer::new("abc");
/// assert_eq!(
///     tokenizer.next_token().unwrap(),
///     Some(Token::Literal(Value::symbol("abc")))
/// );
/// assert_eq!(tokenizer.next_token().unwrap(), None);
/// ```
pub struct Tokenizer<'a> {
    input: Lookahead<std::str::Chars<'a>>,

    /// Code-point offset, line and column of the next unread code point.
    offset: usize,
    line: u32,
    column: u32,

    pub(crate) state: State,
    brackets: Vec<Bracket>,
    queue: VecDeque<Token>,
    finished: bool,
}

/// The DFA state, carried between steps.
pub(crate) enum State {
    Initial,
    Comment,
    Symbol {
        buffer: String,
    },
    Constant {
        name: String,
    },
    Number {
        buffer: String,
        denominator: Option<String>,
    },
    Unicode {
        close: char,
        buffer: String,
        escaped: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bracket {
    Tuple,
    EvalData,
    Sequence,
}

impl Bracket {
    fn open_glyph(&self) -> char {
        match self {
            Bracket::Tuple => '[',
            Bracket::EvalData => '{',
            Bracket::Sequence => '(',
        }
    }

    fn close_glyph(&self) -> char {
        match self {
            Bracket::Tuple => ']',
            Bracket::EvalData => '}',
            Bracket::Sequence => ')',
        }
    }
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over a source string.
    pub fn new(source: &'a str) -> Self {
        Self {
            input: Lookahead::new(source.chars()),
            offset: 0,
            line: 1,
            column: 1,
            state: State::Initial,
            brackets: Vec::new(),
            queue: VecDeque::new(),
            finished: false,
        }
    }

    /// The position of the next unread code point, for error reporting.
    pub fn position(&self) -> Position {
        Position::new(self.offset, self.line, self.column)
    }

    /// Returns the next token, `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Ok(Some(token));
            }
            let position = Tokenizer::position(self);
            match self.input.next() {
                Some((c, next)) => {
                    self.advance_position(c);
                    self.step(c, next, position)?;
                },
                None => {
                    self.finish()?;
                    return Ok(None);
                },
            }
        }
    }

    /// Processes one `(code point, lookahead)` pair.
    fn step(&mut self, c: char, next: Option<char>, position: Position) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Initial) {
            State::Initial => self.step_initial(c, next, position),
            State::Comment => {
                self.step_comment(c);
                Ok(())
            },
            State::Symbol { buffer } => {
                self.step_symbol(buffer, c, next);
                Ok(())
            },
            State::Constant { name } => self.step_constant(name, c, next, position),
            State::Number {
                buffer,
                denominator,
            } => self.step_number(buffer, denominator, c, next, position),
            State::Unicode {
                close,
                buffer,
                escaped,
            } => self.step_unicode(close, buffer, escaped, c, next, position),
        }
    }

    fn step_initial(&mut self, c: char, next: Option<char>, position: Position) -> Result<()> {
        match c {
            c if c.is_whitespace() => Ok(()),
            '[' => {
                self.brackets.push(Bracket::Tuple);
                self.emit_syntax(Syntax::TupleOpen);
                Ok(())
            },
            '{' => {
                self.brackets.push(Bracket::EvalData);
                self.emit_syntax(Syntax::EvalDataOpen);
                Ok(())
            },
            '(' => {
                self.brackets.push(Bracket::Sequence);
                self.emit_syntax(Syntax::SequenceOpen);
                Ok(())
            },
            ']' => {
                self.close_bracket(Bracket::Tuple, position)?;
                self.emit_syntax(Syntax::TupleClose);
                Ok(())
            },
            '}' => {
                self.close_bracket(Bracket::EvalData, position)?;
                self.emit_syntax(Syntax::EvalDataClose);
                Ok(())
            },
            ')' => {
                self.close_bracket(Bracket::Sequence, position)?;
                self.emit_syntax(Syntax::SequenceClose);
                Ok(())
            },
            ':' => {
                self.emit_syntax(Syntax::Association);
                Ok(())
            },
            '\'' => {
                self.emit_syntax(Syntax::Quote);
                Ok(())
            },
            ',' => {
                self.emit_syntax(Syntax::Unquote);
                Ok(())
            },
            '`' => {
                self.emit_syntax(Syntax::UnquoteSplice);
                Ok(())
            },
            ';' => self.begin_comment(next, position),
            '#' => self.begin_constant(next, position),
            sign @ ('+' | '-') if next_is_digit(next) => {
                self.proceed_number(String::from(sign), None, next, position)
            },
            digit if digit.is_ascii_digit() => {
                self.proceed_number(String::from(digit), None, next, position)
            },
            open if close_quote_for(open).is_some() => self.begin_string(open, next, position),
            initial if is_symbol_initial(initial) => {
                self.begin_symbol(initial, next);
                Ok(())
            },
            other => Err(Error::token(
                format!("unexpected character '{}'", other),
                position,
            )),
        }
    }

    fn close_bracket(&mut self, found: Bracket, position: Position) -> Result<()> {
        match self.brackets.pop() {
            None => Err(Error::token(
                format!("unmatched '{}'", found.close_glyph()),
                position,
            )),
            Some(open) if open == found => Ok(()),
            Some(open) => Err(Error::token(
                format!(
                    "mismatched bracket: '{}' closed by '{}'",
                    open.open_glyph(),
                    found.close_glyph()
                ),
                position,
            )),
        }
    }

    /// Verifies end-of-input invariants once the stream is exhausted.
    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(open) = self.brackets.last() {
            return Err(Error::token(
                format!("unexpected end of input: unclosed '{}'", open.open_glyph()),
                Tokenizer::position(self),
            ));
        }
        Ok(())
    }

    fn emit_syntax(&mut self, marker: Syntax) {
        self.queue.push_back(Token::Syntax(marker));
    }

    pub(crate) fn emit_literal(&mut self, value: Value) {
        self.queue.push_back(Token::Literal(value));
    }

    fn advance_position(&mut self, c: char) {
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

pub(crate) fn next_is_digit(next: Option<char>) -> bool {
    matches!(next, Some(following) if following.is_ascii_digit())
}

pub(crate) fn terminates_symbol(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(following) => !is_symbol_subsequent(following),
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished && self.queue.is_empty() {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(error) => {
                self.finished = true;
                self.queue.clear();
                Some(Err(error))
            },
        }
    }
}
