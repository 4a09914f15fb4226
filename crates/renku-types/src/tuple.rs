//! The tuple container: an insertion-ordered mapping from values to
//! values.
//!
//! A tuple's keys fall into two regions the serializers care about: the
//! **positional** run (integer keys 0, 1, 2, … with no gap) and the
//! remaining **named** entries. Equality is order-independent; iteration
//! follows insertion order.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rustc_hash::FxHasher;

use crate::value::Value;

type FxIndexMap<K, V> = IndexMap<K, V, std::hash::BuildHasherDefault<FxHasher>>;

/// An ordered mapping from `Value` keys to `Value` values.
///
/// # Example
///
/// ```
/// use renku_types::{Tuple, Value};
///
/// let mut tuple = Tuple::new();
/// tuple.insert(Value::integer(0), Value::symbol("+"));
/// tuple.insert(Value::integer(1), Value::integer(2));
/// tuple.insert(Value::symbol("then"), Value::Omega);
///
/// assert_eq!(tuple.positional_len(), 2);
/// assert_eq!(tuple.named_entries().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Tuple {
    entries: FxIndexMap<Value, Value>,
}

impl Tuple {
    /// Creates an empty tuple.
    pub fn new() -> Self {
        Self {
            entries: FxIndexMap::default(),
        }
    }

    /// Inserts a key-value pair, returning the previous value bound to
    /// the key, if any.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Looks up the value bound to a key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Looks up the value bound to the integer key `index`.
    pub fn get_positional(&self, index: usize) -> Option<&Value> {
        self.entries.get(&Value::Integer(BigInt::from(index)))
    }

    /// Returns true if the tuple binds the given key.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tuple has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    /// Length of the positional run: the largest `n` such that the
    /// integer keys `0 .. n` are all present.
    pub fn positional_len(&self) -> usize {
        let mut n = 0usize;
        while n < self.entries.len() {
            if !self.contains_key(&Value::Integer(BigInt::from(n))) {
                break;
            }
            n += 1;
        }
        n
    }

    /// The values of the positional run, in index order.
    pub fn positional_values(&self) -> Vec<&Value> {
        (0..self.positional_len())
            .filter_map(|index| self.get_positional(index))
            .collect()
    }

    /// The entries outside the positional run, in insertion order.
    pub fn named_entries(&self) -> Vec<(&Value, &Value)> {
        let run = self.positional_len();
        self.entries
            .iter()
            .filter(|(key, _)| !is_positional_key(key, run))
            .collect()
    }
}

/// Whether `key` is an integer inside the positional run `0 .. run`.
fn is_positional_key(key: &Value, run: usize) -> bool {
    match key {
        Value::Integer(index) => match index.to_usize() {
            Some(index) => index < run,
            None => false,
        },
        _ => false,
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Tuple {}

impl Hash for Tuple {
    /// Order-independent: the hash is a commutative combination of the
    /// per-entry hashes, so it agrees with the order-independent `Eq`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined: u64 = 0;
        for (key, value) in &self.entries {
            let mut entry_hasher = FxHasher::default();
            key.hash(&mut entry_hasher);
            value.hash(&mut entry_hasher);
            combined = combined.wrapping_add(entry_hasher.finish());
        }
        state.write_usize(self.entries.len());
        state.write_u64(combined);
    }
}

impl FromIterator<(Value, Value)> for Tuple {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut tuple = Tuple::new();
        for (key, value) in iter {
            tuple.insert(key, value);
        }
        tuple
    }
}
