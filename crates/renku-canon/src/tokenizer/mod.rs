//! Canonical-expression tokenizer.
//!
//! One byte-level machine, split into focused components:
//! - `core` - The Tokenizer struct, marker dispatch and offsets
//! - `atom` - Length-prefixed atom lexing

mod atom;
mod core;

pub use self::core::Tokenizer;
