//! Number and rational literal lexing.
//!
//! A number is one or more decimal digits with an optional sign (the
//! sign belongs to the number only when a digit follows immediately).
//! `N/D` is a rational only when the `/` sits between digits with no
//! intervening whitespace; any other `/` begins a symbol.

use num_bigint::BigInt;
use renku_types::{BigRational, Value};
use renku_util::{Error, Position, Result};

use super::core::{next_is_digit, State, Tokenizer};

impl<'a> Tokenizer<'a> {
    /// Continues a number by one code point.
    pub(crate) fn step_number(
        &mut self,
        mut buffer: String,
        mut denominator: Option<String>,
        c: char,
        next: Option<char>,
        position: Position,
    ) -> Result<()> {
        if c.is_ascii_digit() {
            match &mut denominator {
                Some(digits) => digits.push(c),
                None => buffer.push(c),
            }
            return self.proceed_number(buffer, denominator, next, position);
        }

        if c == '/' {
            // `N/D` is a rational only when the digits follow immediately.
            if denominator.is_none() && next_is_digit(next) {
                return self.proceed_number(buffer, Some(String::new()), next, position);
            }
            // The number ends here; '/' begins a fresh symbol.
            self.emit_number(buffer, denominator, position)?;
            self.begin_symbol('/', next);
            return Ok(());
        }

        Err(Error::token(
            format!("unexpected character '{}' in number", c),
            position,
        ))
    }

    /// Decides whether a number continues based on the lookahead: a digit
    /// keeps accumulating, a `/` defers the decision one step, anything
    /// else completes the literal.
    pub(crate) fn proceed_number(
        &mut self,
        buffer: String,
        denominator: Option<String>,
        next: Option<char>,
        position: Position,
    ) -> Result<()> {
        match next {
            Some(following) if following.is_ascii_digit() || following == '/' => {
                self.state = State::Number {
                    buffer,
                    denominator,
                };
                Ok(())
            },
            _ => self.emit_number(buffer, denominator, position),
        }
    }

    fn emit_number(
        &mut self,
        buffer: String,
        denominator: Option<String>,
        position: Position,
    ) -> Result<()> {
        let numerator: BigInt = buffer
            .parse()
            .map_err(|_| Error::token(format!("invalid number '{}'", buffer), position))?;
        match denominator {
            None => {
                self.emit_literal(Value::Integer(numerator));
                Ok(())
            },
            Some(digits) => {
                let denominator: BigInt = digits
                    .parse()
                    .map_err(|_| Error::token(format!("invalid number '{}'", digits), position))?;
                if denominator == BigInt::from(0) {
                    return Err(Error::value(format!(
                        "rational {}/{} has a zero denominator",
                        numerator, digits
                    )));
                }
                self.emit_literal(Value::Rational(BigRational::new(numerator, denominator)));
                Ok(())
            },
        }
    }
}
