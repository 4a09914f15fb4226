//! renku-simple - Simple-Expression Codec (Tokenizer, Parser, Writer)
//!
//! ============================================================================
//! LEXICAL ANALYSIS THEORY
//! ============================================================================
//!
//! The reader half of this crate is a classical two-stage pipeline: a
//! tokenizer turns a stream of code points into a stream of tokens, and a
//! parser folds the token stream into a value tree.
//!
//! FORMAL DEFINITION:
//! ------------------
//! Let Σ be the alphabet (here: all Unicode scalar values).
//! Let Σ* be the set of all strings over Σ.
//!
//! The tokenizer is a function:
//!   L: Σ* → T*
//! where T is the token set. T has exactly two kinds:
//!
//!   SYNTAX   - a structural marker with no payload
//!   LITERAL  - a fully-formed value (constant, number, symbol, string)
//!
//! PROPERTIES:
//! -----------
//! - Linear time: O(n) in the number of input code points
//! - Single pass: each code point is pulled exactly once
//! - One symbol of lookahead: every continue/terminate decision is made
//!   from the pair (c, n) of the current and following code point
//!
//! LEXEME vs TOKEN:
//! ----------------
//! - Lexeme: the spelling in the input (e.g. "then", "1/2", "#nil")
//! - Token: the category plus payload (e.g. Literal(Bytes("then")),
//!   Literal(Rational(1, 2)), Literal(Omega))
//!
//! Example:
//! ```text
//! Source:  [if [= 1 2] then:#nil]
//!
//! Tokens:  TupleOpen  Literal("if")  TupleOpen  Literal("=")
//!          Literal(1)  Literal(2)  TupleClose  Literal("then")
//!          Association  Literal(Omega)  TupleClose
//! ```
//!
//! ============================================================================
//! THE SIMPLE-EXPRESSION GRAMMAR
//! ============================================================================
//!
//! In EBNF (whitespace between tokens and `;…\n` comments elided):
//!
//! ```ebnf
//! input      = { expression } ;
//!
//! expression = literal
//!            | tuple
//!            | eval-data
//!            | sequence
//!            | quoted ;
//!
//! tuple      = "[" { entry } "]" ;
//! eval-data  = "{" { entry } "}" ;
//! sequence   = "(" { entry } ")" ;
//! entry      = expression [ ":" expression ] ;
//!
//! quoted     = ( "'" | "," | "`" ) expression ;
//!
//! literal    = constant | rational | number | symbol | string ;
//! constant   = "#" ( "nil" | "t" | "f" ) ;
//! number     = [ "+" | "-" ] digit { digit } ;
//! rational   = number "/" digit { digit } ;
//! symbol     = initial { subsequent } ;
//! ```
//!
//! where `initial` is A-Z, a-z or one of `!?*+-/%\&|^~<=>`, and
//! `subsequent` additionally admits the digits 0-9.
//!
//! Two spellings are deliberately ambiguous at the character level and
//! resolved by one code point of lookahead:
//!
//! - A leading `+` or `-` starts a number exactly when the next code
//!   point is a digit; otherwise it starts a symbol. So `+5` is the
//!   integer 5 while `+ 5` is the symbol `+` followed by the integer 5.
//! - `/` continues a rational exactly when it sits between digits with
//!   no intervening whitespace. So `1/2` is one rational token while
//!   `1 / 2` is three tokens: integer, symbol, integer.
//!
//! ============================================================================
//! TOKENIZER DFA
//! ============================================================================
//!
//! The tokenizer is a deterministic finite automaton driven by
//! (current, lookahead) pairs. Its states:
//!
//! ```text
//! State     | Meaning                        | Leaves when
//! ----------+--------------------------------+---------------------------
//! INITIAL   | between tokens                 | always (dispatch on c)
//! COMMENT   | after ';'                      | c is a newline
//! SYMBOL    | inside an identifier           | n is not `subsequent`
//! CONSTANT  | after '#'                      | n is not `subsequent`
//! NUMBER    | inside a number or rational    | n is not a digit or '/'
//! UNICODE   | inside a string literal        | c is the close quote
//! ```
//!
//! Termination on *lookahead* rather than on the current code point is
//! what makes the machine single-pass: no state ever has to push a code
//! point back into the input. The price is that one step can complete
//! two tokens at once (`1/` ends a number and begins a symbol), so
//! finished tokens pass through a small queue.
//!
//! String literals open with any of eight paired quotation families:
//!
//! ```text
//! "…"   “…”   „…“   ‘…’   «…»   ‹…›   「…」   『…』
//! ```
//!
//! The close quote must come from the opening family. Inside a string
//! exactly two escapes exist: a backslash before the current family's
//! close quote and a doubled backslash; every other backslash is
//! ordinary content.
//!
//! ============================================================================
//! PARSING: AN EXPLICIT STACK MACHINE
//! ============================================================================
//!
//! The grammar is nested but the parser is not recursive. Recursive
//! descent ties the nesting depth of the *input* to the call depth of
//! the *parser*; a few thousand open brackets would overflow the call
//! stack. Instead the parser keeps an explicit stack of frames, one per
//! open container plus one implicit top-level frame:
//!
//! ```text
//! Frame:
//!   kind         which bracket opened it ([, {, ( or top level)
//!   tuple        the container under construction
//!   counter      next positional key (0, 1, 2, …)
//!   buffered     the most recently completed value, not yet placed
//!   pending_key  a value promoted by ':' awaiting its partner
//!   quotes       quote markers awaiting the next completed value
//! ```
//!
//! The one-slot buffer exists because `:` acts on the *previous* value:
//! in `[a b:c d]` the values a and d land at positional keys 0 and 1,
//! while b is promoted to a key the moment the `:` arrives and claims c.
//! A `)` close additionally checks that every key is a contiguous
//! integer from zero, a `}` close rewrites the finished tuple into
//! `[quote [k: [unquote v], …]]`, and quote markers wrap the next
//! completed value outermost-first.
//!
//! ============================================================================
//! SERIALIZATION AND DETERMINISM
//! ============================================================================
//!
//! The writer walks a value tree and renders text. Output is a pure
//! function of the value, not of construction history: named tuple
//! entries and set elements are emitted in the lexicographic order of
//! their canonical byte encodings, so two equal values always render
//! identically. Symbols whose spelling would re-lex as one symbol token
//! render verbatim; any other byte string renders as a
//! `[byte-array …]` form with a base-64 payload.
//!
//! ============================================================================
//! ERROR HANDLING
//! ============================================================================
//!
//! There is no recovery and no resynchronization: the first lexical or
//! structural fault aborts the parse and surfaces to the entry point
//! with the offending code point's line and column. Inputs are assumed
//! to be complete, finite buffers.
//!
//! ============================================================================
//! MODULE ORGANIZATION
//! ============================================================================
//!
//! - `token` - Tokens, character classes and quote families
//! - `tokenizer` - The DFA, one module per lexical concern
//! - `parser` - The frame-stack machine
//! - `writer` - The renderer
//!
//! The four entry points live here. `load` and `dump` take an
//! [`Encoding`] for the byte-level text encoding; everything else is
//! encoding-agnostic.

pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod writer;

#[cfg(test)]
mod edge_cases;

pub use parser::Parser;
pub use token::{Syntax, Token};
pub use tokenizer::Tokenizer;
pub use writer::dumps;

use renku_types::Value;
use renku_util::{Error, Result};

/// Text encoding used by `load` and `dump`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8, the default.
    #[default]
    Utf8,

    /// UTF-16, little-endian, no byte-order mark.
    Utf16Le,

    /// UTF-16, big-endian, no byte-order mark.
    Utf16Be,
}

impl Encoding {
    /// Encodes text into bytes.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16Le => text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect(),
            Encoding::Utf16Be => text
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect(),
        }
    }

    /// Decodes bytes into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|error| Error::decode(format!("invalid UTF-8: {}", error))),
            Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        }
    }
}

fn decode_utf16(bytes: &[u8], read_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::decode("UTF-16 input has an odd byte length"));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| read_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|error| Error::decode(format!("invalid UTF-16: {}", error)))
}

/// Parses a simple-expression string.
///
/// Top-level expressions are collected under the integer keys 0, 1, 2, …
/// of a tuple; empty input yields the empty tuple.
///
/// # Example
///
/// ```
/// use renku_types::Value;
///
/// let value = renku_simple::loads("[+ 2 3]").unwrap();
/// let top = match value {
///     Value::Tuple(tuple) => tuple,
///     _ => unreachable!(),
/// };
/// assert!(top.get_positional(0).unwrap().is_tuple());
/// ```
pub fn loads(source: &str) -> Result<Value> {
    Parser::new(Tokenizer::new(source)).parse()
}

/// Reads a byte-oriented source to EOF, decodes it, and parses.
pub fn load<R: std::io::Read>(source: &mut R, encoding: Encoding) -> Result<Value> {
    let mut buffer = Vec::new();
    source.read_to_end(&mut buffer)?;
    loads(&encoding.decode(&buffer)?)
}

/// Serializes values into a byte-oriented sink.
pub fn dump<W: std::io::Write>(
    sink: &mut W,
    values: &[Value],
    encoding: Encoding,
) -> Result<()> {
    let text = dumps(values)?;
    sink.write_all(&encoding.encode(&text))?;
    Ok(())
}
