//! renku-types - The Renku expression data model.
//!
//! This crate defines [`Value`], the tagged union every Renku codec reads
//! and writes, together with its two container types:
//! - `value` - The `Value` sum type and its capability predicates
//! - `tuple` - The insertion-ordered mapping that dominates the language
//! - `set` - The unordered, duplicate-free collection
//!
//! Values are immutable as far as the codecs are concerned: parsers build
//! fresh trees, serializers walk them by reference.

pub mod set;
pub mod tuple;
pub mod value;

pub use set::Set;
pub use tuple::Tuple;
pub use value::Value;

pub use num_bigint::BigInt;
pub use num_rational::BigRational;
