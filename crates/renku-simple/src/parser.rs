//! Simple-expression parser.
//!
//! Folds the token stream into value trees with an explicit stack of
//! in-construction containers, one frame per open bracket plus an
//! implicit top-level frame. Each frame keeps a one-slot buffer for the
//! most recently completed value so the association marker can promote
//! it to a pending key instead of letting it land at the next positional
//! index.

use num_bigint::BigInt;
use renku_types::{Tuple, Value};
use renku_util::{Error, Position, Result};

use crate::token::{Syntax, Token};
use crate::tokenizer::Tokenizer;

/// Parses one simple-expression input to completion.
///
/// Top-level expressions are collected under the integer keys 0, 1, 2, …
/// of an implicit tuple; empty input yields the empty tuple.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    stack: Vec<Frame>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameKind {
    TopLevel,
    Tuple,
    EvalData,
    Sequence,
}

struct Frame {
    kind: FrameKind,
    tuple: Tuple,
    counter: usize,
    buffered: Option<Value>,
    pending_key: Option<Value>,
    quotes: Vec<Syntax>,
    opened_at: Position,
}

impl Frame {
    fn new(kind: FrameKind, opened_at: Position) -> Self {
        Self {
            kind,
            tuple: Tuple::new(),
            counter: 0,
            buffered: None,
            pending_key: None,
            quotes: Vec::new(),
            opened_at,
        }
    }

    /// Inserts a value under the positional counter and advances it.
    fn insert_positional(&mut self, value: Value) {
        self.tuple
            .insert(Value::Integer(BigInt::from(self.counter)), value);
        self.counter += 1;
    }
}

impl<'a> Parser<'a> {
    /// Creates a parser over a tokenizer.
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        Self {
            tokenizer,
            stack: vec![Frame::new(FrameKind::TopLevel, Position::START)],
        }
    }

    /// Runs the parse to completion.
    pub fn parse(mut self) -> Result<Value> {
        while let Some(token) = self.tokenizer.next_token()? {
            let position = self.tokenizer.position();
            match token {
                Token::Literal(value) => self.complete(value, position)?,
                Token::Syntax(Syntax::TupleOpen) => {
                    self.stack.push(Frame::new(FrameKind::Tuple, position));
                },
                Token::Syntax(Syntax::EvalDataOpen) => {
                    self.stack.push(Frame::new(FrameKind::EvalData, position));
                },
                Token::Syntax(Syntax::SequenceOpen) => {
                    self.stack.push(Frame::new(FrameKind::Sequence, position));
                },
                Token::Syntax(Syntax::TupleClose) => {
                    self.close(FrameKind::Tuple, position)?;
                },
                Token::Syntax(Syntax::EvalDataClose) => {
                    self.close(FrameKind::EvalData, position)?;
                },
                Token::Syntax(Syntax::SequenceClose) => {
                    self.close(FrameKind::Sequence, position)?;
                },
                Token::Syntax(Syntax::Association) => {
                    let frame = self.current_frame(position)?;
                    if frame.pending_key.is_some() {
                        return Err(Error::syntax("':' after an unfinished ':'", position));
                    }
                    match frame.buffered.take() {
                        Some(key) => frame.pending_key = Some(key),
                        None => {
                            return Err(Error::syntax("':' with no preceding value", position));
                        },
                    }
                },
                Token::Syntax(marker @ (Syntax::Quote | Syntax::Unquote | Syntax::UnquoteSplice)) => {
                    self.current_frame(position)?.quotes.push(marker);
                },
            }
        }

        let position = self.tokenizer.position();
        if self.stack.len() > 1 {
            let innermost = &self.stack[self.stack.len() - 1];
            return Err(Error::syntax(
                "unexpected end of input: unclosed bracket",
                innermost.opened_at,
            ));
        }
        match self.stack.pop() {
            Some(mut frame) => {
                flush_frame(&mut frame, position)?;
                Ok(Value::Tuple(frame.tuple))
            },
            None => Err(Error::syntax("empty parser stack", position)),
        }
    }

    /// Routes a completed value into the innermost frame: pending quote
    /// wrappers apply outer-to-inner, a pending key claims the value,
    /// and otherwise it displaces the buffered value, which lands at the
    /// next positional index.
    fn complete(&mut self, value: Value, position: Position) -> Result<()> {
        let frame = self.current_frame(position)?;

        let mut value = value;
        for marker in frame.quotes.drain(..).rev() {
            value = quote_form(quote_name(marker), value);
        }

        if let Some(key) = frame.pending_key.take() {
            frame.tuple.insert(key, value);
        } else {
            if let Some(previous) = frame.buffered.take() {
                frame.insert_positional(previous);
            }
            frame.buffered = Some(value);
        }
        Ok(())
    }

    /// Closes the innermost frame and completes its value in the parent.
    fn close(&mut self, expected: FrameKind, position: Position) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.kind == FrameKind::TopLevel => {
                return Err(Error::syntax("unmatched closing bracket", position));
            },
            Some(frame) if frame.kind != expected => {
                return Err(Error::syntax("mismatched closing bracket", position));
            },
            Some(_) => {},
            None => return Err(Error::syntax("empty parser stack", position)),
        }
        let mut frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return Err(Error::syntax("empty parser stack", position)),
        };

        flush_frame(&mut frame, position)?;
        let value = match frame.kind {
            FrameKind::Tuple | FrameKind::TopLevel => Value::Tuple(frame.tuple),
            FrameKind::EvalData => eval_data(frame.tuple),
            FrameKind::Sequence => sequence(frame.tuple, position)?,
        };
        self.complete(value, position)
    }

    fn current_frame(&mut self, position: Position) -> Result<&mut Frame> {
        match self.stack.last_mut() {
            Some(frame) => Ok(frame),
            None => Err(Error::syntax("empty parser stack", position)),
        }
    }
}

/// Settles a frame before it closes: the buffered value lands at the
/// positional counter, and a dangling key or quote marker is an error.
fn flush_frame(frame: &mut Frame, position: Position) -> Result<()> {
    if let Some(value) = frame.buffered.take() {
        frame.insert_positional(value);
    }
    if frame.pending_key.is_some() {
        return Err(Error::syntax("':' with no following value", position));
    }
    if !frame.quotes.is_empty() {
        return Err(Error::syntax(
            "quote marker with no following expression",
            position,
        ));
    }
    Ok(())
}

/// `(…)` requires its keys to be the contiguous integers from zero.
fn sequence(tuple: Tuple, position: Position) -> Result<Value> {
    if tuple.positional_len() != tuple.len() {
        return Err(Error::syntax(
            "sequence keys must be contiguous integers starting at 0",
            position,
        ));
    }
    Ok(Value::Sequence(
        tuple.positional_values().into_iter().cloned().collect(),
    ))
}

/// `{k: v, …}` expands to `[quote [k: [unquote v], …]]`.
fn eval_data(tuple: Tuple) -> Value {
    let mut inner = Tuple::new();
    for (key, value) in tuple.iter() {
        inner.insert(key.clone(), quote_form("unquote", value.clone()));
    }
    quote_form("quote", Value::Tuple(inner))
}

fn quote_name(marker: Syntax) -> &'static str {
    match marker {
        Syntax::Unquote => "unquote",
        Syntax::UnquoteSplice => "unquote-splice",
        _ => "quote",
    }
}

fn quote_form(name: &str, value: Value) -> Value {
    let mut tuple = Tuple::new();
    tuple.insert(Value::Integer(BigInt::from(0)), Value::symbol(name));
    tuple.insert(Value::Integer(BigInt::from(1)), value);
    Value::Tuple(tuple)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Value {
        Parser::new(Tokenizer::new(source))
            .parse()
            .expect("source should parse")
    }

    fn parse_error(source: &str) -> Error {
        Parser::new(Tokenizer::new(source))
            .parse()
            .expect_err("source should fail to parse")
    }

    fn single(source: &str) -> Value {
        match parse(source) {
            Value::Tuple(tuple) => {
                assert_eq!(tuple.len(), 1, "expected exactly one top-level entry");
                tuple.get_positional(0).expect("entry 0").clone()
            },
            other => panic!("top level should be a tuple, got {:?}", other),
        }
    }

    fn top(source: &str) -> Tuple {
        match parse(source) {
            Value::Tuple(tuple) => tuple,
            other => panic!("top level should be a tuple, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_tuple() {
        assert_eq!(parse(""), Value::Tuple(Tuple::new()));
        assert_eq!(parse("   "), Value::Tuple(Tuple::new()));
        assert_eq!(parse("\n"), Value::Tuple(Tuple::new()));
    }

    #[test]
    fn test_symbol() {
        assert_eq!(single("abc"), Value::symbol("abc"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(single("#nil"), Value::Omega);
        assert_eq!(single("#t"), Value::Boolean(true));
    }

    #[test]
    fn test_positional_tuple() {
        let tuple = match single("[+ 2 3 4]") {
            Value::Tuple(tuple) => tuple,
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.len(), 4);
        assert_eq!(tuple.get_positional(0), Some(&Value::symbol("+")));
        assert_eq!(tuple.get_positional(1), Some(&Value::integer(2)));
        assert_eq!(tuple.get_positional(3), Some(&Value::integer(4)));
    }

    #[test]
    fn test_named_and_positional_entries() {
        let tuple = match single("[if [= 1 2] then:#nil else:\"whew\"]") {
            Value::Tuple(tuple) => tuple,
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.positional_len(), 2);
        assert_eq!(tuple.get_positional(0), Some(&Value::symbol("if")));
        assert_eq!(tuple.get(&Value::symbol("then")), Some(&Value::Omega));
        assert_eq!(
            tuple.get(&Value::symbol("else")),
            Some(&Value::text("whew"))
        );

        let condition = match tuple.get_positional(1) {
            Some(Value::Tuple(inner)) => inner,
            other => panic!("expected inner tuple, got {:?}", other),
        };
        assert_eq!(condition.get_positional(0), Some(&Value::symbol("=")));
        assert_eq!(condition.get_positional(1), Some(&Value::integer(1)));
        assert_eq!(condition.get_positional(2), Some(&Value::integer(2)));
    }

    #[test]
    fn test_sequence() {
        assert_eq!(
            single("(a b c)"),
            Value::Sequence(vec![
                Value::symbol("a"),
                Value::symbol("b"),
                Value::symbol("c"),
            ])
        );
    }

    #[test]
    fn test_sequence_with_explicit_contiguous_keys() {
        assert_eq!(
            single("(0:a 1:b)"),
            Value::Sequence(vec![Value::symbol("a"), Value::symbol("b")])
        );
    }

    #[test]
    fn test_sequence_rejects_named_keys() {
        assert!(matches!(parse_error("(a:b)"), Error::Syntax { .. }));
    }

    #[test]
    fn test_sequence_rejects_gapped_keys() {
        assert!(matches!(parse_error("(2:a)"), Error::Syntax { .. }));
    }

    #[test]
    fn test_quote_expands() {
        assert_eq!(single("'x"), quote_form("quote", Value::symbol("x")));
    }

    #[test]
    fn test_unquote_and_splice_expand() {
        assert_eq!(single(",x"), quote_form("unquote", Value::symbol("x")));
        assert_eq!(
            single("`x"),
            quote_form("unquote-splice", Value::symbol("x"))
        );
    }

    #[test]
    fn test_stacked_quotes_nest_outer_to_inner() {
        assert_eq!(
            single("',x"),
            quote_form("quote", quote_form("unquote", Value::symbol("x")))
        );
    }

    #[test]
    fn test_quote_applies_to_next_container() {
        let expected = {
            let mut inner = Tuple::new();
            inner.insert(Value::Integer(BigInt::from(0)), Value::symbol("a"));
            quote_form("quote", Value::Tuple(inner))
        };
        assert_eq!(single("'[a]"), expected);
    }

    #[test]
    fn test_eval_data_expands() {
        // {a} => [quote [[unquote a]]]
        let expected = {
            let mut inner = Tuple::new();
            inner.insert(
                Value::Integer(BigInt::from(0)),
                quote_form("unquote", Value::symbol("a")),
            );
            quote_form("quote", Value::Tuple(inner))
        };
        assert_eq!(single("{a}"), expected);
    }

    #[test]
    fn test_eval_data_keeps_keys() {
        let value = single("{k:v}");
        let outer = match value {
            Value::Tuple(tuple) => tuple,
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(outer.get_positional(0), Some(&Value::symbol("quote")));
        let inner = match outer.get_positional(1) {
            Some(Value::Tuple(inner)) => inner,
            other => panic!("expected inner tuple, got {:?}", other),
        };
        assert_eq!(
            inner.get(&Value::symbol("k")),
            Some(&quote_form("unquote", Value::symbol("v")))
        );
    }

    #[test]
    fn test_rational_literal() {
        assert_eq!(single("1/2"), Value::rational(1, 2));
    }

    #[test]
    fn test_spaced_slash_yields_three_entries() {
        let tuple = top("1 / 2");
        assert_eq!(tuple.len(), 3);
        assert_eq!(tuple.get_positional(0), Some(&Value::integer(1)));
        assert_eq!(tuple.get_positional(1), Some(&Value::symbol("/")));
        assert_eq!(tuple.get_positional(2), Some(&Value::integer(2)));
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(single(";comment\nabc"), Value::symbol("abc"));
    }

    #[test]
    fn test_multiple_top_level_expressions() {
        let tuple = top("a b c");
        assert_eq!(tuple.len(), 3);
        assert_eq!(tuple.get_positional(2), Some(&Value::symbol("c")));
    }

    #[test]
    fn test_top_level_association() {
        let tuple = top("a:1 b");
        assert_eq!(tuple.get(&Value::symbol("a")), Some(&Value::integer(1)));
        assert_eq!(tuple.get_positional(0), Some(&Value::symbol("b")));
    }

    #[test]
    fn test_keyed_insert_does_not_advance_counter() {
        let tuple = match single("[a b:c d]") {
            Value::Tuple(tuple) => tuple,
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.positional_len(), 2);
        assert_eq!(tuple.get_positional(0), Some(&Value::symbol("a")));
        assert_eq!(tuple.get_positional(1), Some(&Value::symbol("d")));
        assert_eq!(tuple.get(&Value::symbol("b")), Some(&Value::symbol("c")));
    }

    #[test]
    fn test_unicode_key_is_distinct_from_symbol_key() {
        let tuple = match single("[\"k\":1 k:2]") {
            Value::Tuple(tuple) => tuple,
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.get(&Value::text("k")), Some(&Value::integer(1)));
        assert_eq!(tuple.get(&Value::symbol("k")), Some(&Value::integer(2)));
    }

    #[test]
    fn test_detached_association() {
        assert!(matches!(parse_error(":"), Error::Syntax { .. }));
        assert!(matches!(parse_error("[: a]"), Error::Syntax { .. }));
    }

    #[test]
    fn test_association_missing_value() {
        assert!(matches!(parse_error("[a:]"), Error::Syntax { .. }));
    }

    #[test]
    fn test_double_association() {
        assert!(matches!(parse_error("[a:: b]"), Error::Syntax { .. }));
    }

    #[test]
    fn test_dangling_quote() {
        assert!(matches!(parse_error("'"), Error::Syntax { .. }));
        assert!(matches!(parse_error("['"), Error::Syntax { .. } | Error::Token { .. }));
    }

    #[test]
    fn test_bracket_errors_propagate() {
        assert!(matches!(parse_error("]"), Error::Token { .. }));
        assert!(matches!(parse_error("[a"), Error::Token { .. }));
        assert!(matches!(parse_error("[a)"), Error::Token { .. }));
    }
}
