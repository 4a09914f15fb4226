//! The `Value` sum type and its capability predicates.
//!
//! Every expression the codecs exchange is a tree of `Value`s. The
//! serializers dispatch on the tag through the `is_*` predicates rather
//! than downcasting, and a handful of `From` impls keep test and caller
//! code short.

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::set::Set;
use crate::tuple::Tuple;

/// A Renku expression tree node.
///
/// The first nine variants are the serializable domain. `Relation`,
/// `Matrix` and `Procedure` exist in the type lattice so the predicates
/// are total, but neither codec defines an encoding for them; offering
/// one to a serializer fails with `Error::Unserializable`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// The absence-of-value singleton.
    Omega,

    /// A truth value.
    Boolean(bool),

    /// A signed integer of arbitrary magnitude.
    Integer(BigInt),

    /// A ratio of two integers. Kept reduced with a positive denominator
    /// by construction; the codecs accept unreduced input and emit the
    /// reduced form.
    Rational(BigRational),

    /// An opaque octet sequence; identifiers read as this variant.
    Bytes(Vec<u8>),

    /// A UTF-8 text, distinct from `Bytes`.
    Unicode(String),

    /// An unordered, duplicate-free collection.
    Set(Set),

    /// An insertion-ordered mapping from values to values; the dominant
    /// container.
    Tuple(Tuple),

    /// A positional list.
    Sequence(Vec<Value>),

    /// Present in the type lattice only; not serializable.
    Relation,

    /// Present in the type lattice only; not serializable.
    Matrix,

    /// Present in the type lattice only; not serializable.
    Procedure,
}

impl Value {
    /// Returns the variant name, for error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Omega => "Omega",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Rational(_) => "Rational",
            Value::Bytes(_) => "Bytes",
            Value::Unicode(_) => "Unicode",
            Value::Set(_) => "Set",
            Value::Tuple(_) => "Tuple",
            Value::Sequence(_) => "Sequence",
            Value::Relation => "Relation",
            Value::Matrix => "Matrix",
            Value::Procedure => "Procedure",
        }
    }

    /// Creates a symbol (a `Bytes` value) from anything byte-like.
    ///
    /// # Example
    ///
    /// ```
    /// use renku_types::Value;
    ///
    /// assert_eq!(Value::symbol("cat"), Value::Bytes(b"cat".to_vec()));
    /// ```
    pub fn symbol(bytes: impl AsRef<[u8]>) -> Value {
        Value::Bytes(bytes.as_ref().to_vec())
    }

    /// Creates a `Unicode` value.
    pub fn text(text: impl Into<String>) -> Value {
        Value::Unicode(text.into())
    }

    /// Creates an `Integer` value.
    pub fn integer(value: impl Into<BigInt>) -> Value {
        Value::Integer(value.into())
    }

    /// Creates a `Rational` value, reduced and with a positive
    /// denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero; the codecs validate
    /// denominators before calling this.
    pub fn rational(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Value {
        Value::Rational(BigRational::new(numerator.into(), denominator.into()))
    }

    pub fn is_omega(&self) -> bool {
        matches!(self, Value::Omega)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_fraction(&self) -> bool {
        matches!(self, Value::Rational(_))
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    pub fn is_unicode(&self) -> bool {
        matches!(self, Value::Unicode(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Value::Relation)
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Value::Matrix)
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self, Value::Procedure)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<BigRational> for Value {
    fn from(value: BigRational) -> Self {
        Value::Rational(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Unicode(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Unicode(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Set> for Value {
    fn from(value: Set) -> Self {
        Value::Set(value)
    }
}

impl From<Tuple> for Value {
    fn from(value: Tuple) -> Self {
        Value::Tuple(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}
