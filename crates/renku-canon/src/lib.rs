//! renku-canon - Canonical-Expression Codec (Tokenizer, Parser, Writer)
//!
//! ============================================================================
//! CANONICAL FORMS THEORY
//! ============================================================================
//!
//! A serialization is *canonical* when the encoding function is
//! injective up to equality:
//!
//!   enc: V → Σ*     with     enc(v₁) = enc(v₂)  ⟺  v₁ = v₂
//!
//! Equal values produce byte-for-byte identical strings, and distinct
//! values never collide. That single property is what makes the format
//! usable for:
//!
//! - HASHING: hash(enc(v)) is a well-defined digest of the value
//! - SIGNING: a signature over enc(v) commits to the value, not to one
//!   of many spellings of it
//! - CONTENT ADDRESSING: enc(v) is a stable storage key
//!
//! Injectivity does not come for free. Three sources of freedom in the
//! data model have to be pinned down:
//!
//! 1. ORDER - tuples and sets compare order-independently, so anything
//!    unordered is serialized in a forced order: named tuple entries
//!    and set elements are sorted by their own canonical encodings.
//! 2. REDUNDANT SPELLINGS - every integer has exactly one octet string
//!    (minimal-length two's complement), every length field exactly one
//!    decimal spelling (no leading zeros), and the two-entry
//!    quote-shaped tuples always use their one-byte prefix markers.
//! 3. WHITESPACE - there is none. Any byte outside the grammar is an
//!    error, so an encoding cannot be "pretty-printed" into a second
//!    valid spelling.
//!
//! The round-trip laws follow: parse(enc(v)) = v for every serializable
//! v, and enc(parse(b)) = b whenever b is already canonical.
//!
//! ============================================================================
//! GRAMMAR
//! ============================================================================
//!
//! ```ebnf
//! c-tuple  = "[" { c-expr } "]" ;
//! c-seq    = "(" { c-expr } ")" ;
//! c-expr   = atom | c-tuple | c-seq
//!          | "'" c-expr | "," c-expr | "`" c-expr ;
//! atom     = decimal ":" octets ;        (* exactly `decimal` octets *)
//! decimal  = "0" | nonzero { digit } ;
//! ```
//!
//! Inside a tuple, `=` introduces one named entry: the two expressions
//! that follow it are a key and its value. An atom is an opaque octet
//! string; the empty atom `0:` is the no-value sentinel, any other atom
//! is a symbol. Every non-symbol variant is a bracketed tuple whose
//! first atom names the type:
//!
//! ```text
//! Value           | Encoding
//! ----------------+------------------------------------------
//! Omega           | 0:
//! true / false    | [4:true] / [5:false]
//! Integer 3       | [7:integer1:\x03]
//! Rational 1/2    | [8:rational[7:integer1:\x01][7:integer1:\x02]]
//! Unicode "hi"    | [6:string2:hi]
//! Bytes "cat"     | 3:cat
//! Set {a, b}      | [3:set1:a1:b]
//! [quote x]       | '1:x
//! ```
//!
//! ============================================================================
//! LENGTH-PREFIXED CODES
//! ============================================================================
//!
//! Atoms are length-prefixed rather than delimited. The trade-off is
//! classical:
//!
//! - No escaping: payload octets are copied verbatim, whatever they
//!   are. A delimiter-based format must escape its own delimiter and
//!   its escape character, which immediately creates multiple
//!   spellings of the same payload.
//! - Self-delimiting: a reader always knows where an atom ends, and a
//!   skipping reader can jump over one in O(1) after reading the
//!   prefix.
//! - The cost is that atoms cannot be streamed out before their length
//!   is known; values are serialized from complete in-memory trees.
//!
//! ============================================================================
//! TOKENIZER DFA
//! ============================================================================
//!
//! The byte-level machine has four states:
//!
//! ```text
//! State     | Meaning                  | Transition
//! ----------+--------------------------+--------------------------------
//! INITIAL   | between tokens           | marker byte → emit; 1-9 → LENGTH;
//!           |                          | 0 followed by ':' → empty atom
//! LENGTH    | inside the decimal field | digit → LENGTH; ':' → SEPARATOR
//! SEPARATOR | at the ':'               | always → SYMBOL
//! SYMBOL    | reading payload octets   | after `length` octets → INITIAL
//! ```
//!
//! A `0` followed by another digit is a leading zero and therefore a
//! lexical error, as are a truncated length field and a payload shorter
//! than its prefix promises. Errors carry the byte offset.
//!
//! ============================================================================
//! INTEGER OCTETS
//! ============================================================================
//!
//! Integers use minimal-length big-endian two's complement; zero is the
//! empty octet string:
//!
//! ```text
//! Value | Octets        Value | Octets
//! ------+---------      ------+------------
//!     0 | (empty)          -1 | ff
//!     3 | 03              255 | 00 ff
//!   127 | 7f             -256 | ff 00
//!   128 | 00 80          2⁶⁴  | 01 00 … 00 (9 octets)
//! ```
//!
//! The sign octet rule (255 needs a leading 00, -256 does not) is what
//! minimal two's complement means: the shortest octet string whose
//! signed reading is the value.
//!
//! ============================================================================
//! MODULE ORGANIZATION
//! ============================================================================
//!
//! - `token` - The nine-terminal token set
//! - `tokenizer` - The byte DFA, one module per lexical concern
//! - `parser` - The frame-stack machine and typed-head interpretation
//! - `writer` - The canonical encoder
//!
//! The entry points mirror the simple codec, minus the text-encoding
//! option: canonical expressions are raw bytes only.

pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod writer;

pub use token::Token;
pub use tokenizer::Tokenizer;
pub use parser::Parser;
pub use writer::{dump, dumps, encoding_of};

use renku_types::Value;
use renku_util::Result;

/// Parses a canonical-expression byte string.
///
/// Top-level expressions are collected under the integer keys 0, 1, 2, …
/// of a tuple; empty input yields the empty tuple.
///
/// # Example
///
/// ```
/// use renku_types::Value;
///
/// let value = renku_canon::loads(b"3:cat").unwrap();
/// let tuple = match value {
///     Value::Tuple(tuple) => tuple,
///     _ => unreachable!(),
/// };
/// assert_eq!(tuple.get_positional(0), Some(&Value::symbol("cat")));
/// ```
pub fn loads(input: &[u8]) -> Result<Value> {
    Parser::new(Tokenizer::new(input)).parse()
}

/// Reads a byte-oriented source to EOF and parses it.
pub fn load<R: std::io::Read>(source: &mut R) -> Result<Value> {
    let mut buffer = Vec::new();
    source.read_to_end(&mut buffer)?;
    loads(&buffer)
}
