//! Canonical-expression parser.
//!
//! Folds the token stream into a value tree with an explicit stack of
//! in-construction containers. Atoms stay raw until their enclosing
//! bracket closes: a tuple whose first atom names a type (`integer`,
//! `string`, …) collapses into the typed value, and only then do the
//! remaining atoms resolve to `Omega` (empty) or `Bytes`.

use num_bigint::BigInt;
use num_traits::Zero;
use renku_types::{BigRational, Set, Tuple, Value};
use renku_util::{Error, Position, Result};

use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Parses one canonical-expression input to completion.
///
/// Top-level expressions are collected under the integer keys 0, 1, 2, …
/// of an implicit tuple; empty input yields the empty tuple.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    stack: Vec<Frame>,
}

/// A parsed element whose final shape is not yet known.
#[derive(Clone, Debug)]
enum Element {
    Atom(Vec<u8>),
    Value(Value),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameKind {
    TopLevel,
    Tuple,
    Sequence,
}

/// Progress of a `=` association inside a tuple frame.
enum Assoc {
    Inactive,
    WantKey,
    WantValue(Value),
}

struct Frame {
    kind: FrameKind,
    elements: Vec<Element>,
    named: Vec<(Value, Value)>,
    assoc: Assoc,
    quotes: Vec<Token>,
    opened_at: Position,
}

impl Frame {
    fn new(kind: FrameKind, opened_at: Position) -> Self {
        Self {
            kind,
            elements: Vec::new(),
            named: Vec::new(),
            assoc: Assoc::Inactive,
            quotes: Vec::new(),
            opened_at,
        }
    }
}

impl<'a> Parser<'a> {
    /// Creates a parser over a canonical-expression byte string.
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
                Token::TupleOpen => {
                    self.stack.push(Frame::new(FrameKind::Tuple, position));
                },
                Token::SequenceOpen => {
                    self.stack.push(Frame::new(FrameKind::Sequence, position));
                },
                Token::TupleClose => {
                    let frame = self.pop_frame(FrameKind::Tuple, "']'", position)?;
                    let value = close_tuple(frame, position)?;
                    self.complete(Element::Value(value), position)?;
                },
                Token::SequenceClose => {
                    let frame = self.pop_frame(FrameKind::Sequence, "')'", position)?;
                    let value = close_sequence(frame, position)?;
                    self.complete(Element::Value(value), position)?;
                },
                Token::Association => {
                    let frame = self.current_frame(position)?;
                    if frame.kind == FrameKind::Sequence {
                        return Err(Error::syntax("'=' inside a sequence", position));
                    }
                    match frame.assoc {
                        Assoc::Inactive => frame.assoc = Assoc::WantKey,
                        _ => {
                            return Err(Error::syntax(
                                "'=' inside an unfinished association",
                                position,
                            ));
                        },
                    }
                },
                marker @ (Token::Quote | Token::Unquote | Token::UnquoteSplice) => {
                    self.current_frame(position)?.quotes.push(marker);
                },
                Token::Atom(bytes) => {
                    self.complete(Element::Atom(bytes), position)?;
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
            Some(frame) => {
                check_frame_complete(&frame, position)?;
                Ok(Value::Tuple(plain_tuple(frame)))
            },
            None => Err(Error::syntax("empty parser stack", position)),
        }
    }

    /// Routes a completed element into the innermost frame, applying any
    /// pending quote wrappers outer-to-inner first.
    fn complete(&mut self, element: Element, position: Position) -> Result<()> {
        let frame = self.current_frame(position)?;

        let element = if frame.quotes.is_empty() {
            element
        } else {
            let mut value = element_value(element);
            for marker in frame.quotes.drain(..).rev() {
                value = quote_form(quote_name(&marker), value);
            }
            Element::Value(value)
        };

        match std::mem::replace(&mut frame.assoc, Assoc::Inactive) {
            Assoc::Inactive => frame.elements.push(element),
            Assoc::WantKey => frame.assoc = Assoc::WantValue(element_value(element)),
            Assoc::WantValue(key) => frame.named.push((key, element_value(element))),
        }
        Ok(())
    }

    fn current_frame(&mut self, position: Position) -> Result<&mut Frame> {
        match self.stack.last_mut() {
            Some(frame) => Ok(frame),
            None => Err(Error::syntax("empty parser stack", position)),
        }
    }

    fn pop_frame(
        &mut self,
        expected: FrameKind,
        close: &str,
        position: Position,
    ) -> Result<Frame> {
        match self.stack.last() {
            Some(frame) if frame.kind == FrameKind::TopLevel => {
                return Err(Error::syntax(format!("unmatched {}", close), position));
            },
            Some(frame) if frame.kind != expected => {
                return Err(Error::syntax(
                    format!("mismatched bracket: closed by {}", close),
                    position,
                ));
            },
            Some(_) => {},
            None => return Err(Error::syntax("empty parser stack", position)),
        }
        match self.stack.pop() {
            Some(frame) => Ok(frame),
            None => Err(Error::syntax("empty parser stack", position)),
        }
    }
}

/// Verifies a frame carries no half-finished association or dangling
/// quote marker.
fn check_frame_complete(frame: &Frame, position: Position) -> Result<()> {
    match frame.assoc {
        Assoc::Inactive => {},
        Assoc::WantKey => {
            return Err(Error::syntax("'=' with no following key", position));
        },
        Assoc::WantValue(_) => {
            return Err(Error::syntax("association missing its value", position));
        },
    }
    if !frame.quotes.is_empty() {
        return Err(Error::syntax(
            "quote marker with no following expression",
            position,
        ));
    }
    Ok(())
}

fn close_tuple(frame: Frame, position: Position) -> Result<Value> {
    check_frame_complete(&frame, position)?;
    if frame.named.is_empty() {
        if let Some(value) = typed_value(&frame.elements, position)? {
            return Ok(value);
        }
    }
    Ok(Value::Tuple(plain_tuple(frame)))
}

fn close_sequence(frame: Frame, position: Position) -> Result<Value> {
    check_frame_complete(&frame, position)?;
    Ok(Value::Sequence(
        frame.elements.into_iter().map(element_value).collect(),
    ))
}

fn plain_tuple(frame: Frame) -> Tuple {
    let mut tuple = Tuple::new();
    for (index, element) in frame.elements.into_iter().enumerate() {
        tuple.insert(Value::Integer(BigInt::from(index)), element_value(element));
    }
    for (key, value) in frame.named {
        tuple.insert(key, value);
    }
    tuple
}

/// Interprets an all-positional tuple whose first atom names a type.
///
/// A recognized head with the wrong shape is an error rather than a
/// fallback to a plain tuple: such input can never have come from the
/// serializer.
fn typed_value(elements: &[Element], position: Position) -> Result<Option<Value>> {
    let head = match elements.first() {
        Some(Element::Atom(head)) => head,
        _ => return Ok(None),
    };

    match head.as_slice() {
        b"true" | b"false" => {
            if elements.len() != 1 {
                return Err(Error::syntax("malformed boolean encoding", position));
            }
            Ok(Some(Value::Boolean(head.as_slice() == b"true")))
        },
        b"integer" => {
            let octets = match elements {
                [_, Element::Atom(octets)] => octets,
                _ => {
                    return Err(Error::syntax("malformed integer encoding", position));
                },
            };
            Ok(Some(Value::Integer(integer_from_octets(octets))))
        },
        b"rational" => {
            let (numerator, denominator) = match elements {
                [_, Element::Value(Value::Integer(n)), Element::Value(Value::Integer(d))] => {
                    (n, d)
                },
                _ => {
                    return Err(Error::syntax("malformed rational encoding", position));
                },
            };
            if denominator.is_zero() {
                return Err(Error::syntax("rational with zero denominator", position));
            }
            Ok(Some(Value::Rational(BigRational::new(
                numerator.clone(),
                denominator.clone(),
            ))))
        },
        b"string" => {
            let octets = match elements {
                [_, Element::Atom(octets)] => octets,
                _ => {
                    return Err(Error::syntax("malformed string encoding", position));
                },
            };
            match String::from_utf8(octets.clone()) {
                Ok(text) => Ok(Some(Value::Unicode(text))),
                Err(_) => Err(Error::syntax("string payload is not valid UTF-8", position)),
            }
        },
        b"set" => {
            let set: Set = elements[1..]
                .iter()
                .cloned()
                .map(element_value)
                .collect();
            Ok(Some(Value::Set(set)))
        },
        _ => Ok(None),
    }
}

/// The two's-complement reading of an integer payload; empty is zero.
fn integer_from_octets(octets: &[u8]) -> BigInt {
    if octets.is_empty() {
        BigInt::from(0)
    } else {
        BigInt::from_signed_bytes_be(octets)
    }
}

/// An atom in value position: the empty atom is Omega, any other is a
/// symbol.
fn element_value(element: Element) -> Value {
    match element {
        Element::Atom(bytes) => {
            if bytes.is_empty() {
                Value::Omega
            } else {
                Value::Bytes(bytes)
            }
        },
        Element::Value(value) => value,
    }
}

fn quote_name(marker: &Token) -> &'static str {
    match marker {
        Token::Unquote => "unquote",
        Token::UnquoteSplice => "unquote-splice",
        _ => "quote",
    }
}

fn quote_form(name: &str, value: Value) -> Value {
    let mut tuple = Tuple::new();
    tuple.insert(Value::Integer(BigInt::from(0)), Value::symbol(name));
    tuple.insert(Value::Integer(BigInt::from(1)), value);
    Value::Tuple(tuple)
}
