//! Canonical-expression serializer.
//!
//! Walks a value tree and emits the unique byte encoding: atoms are
//! length-prefixed octet strings, every non-symbol variant is a bracketed
//! tuple whose first atom names the type, and anything order-dependent
//! (set elements, named tuple keys) is sorted by its own canonical
//! encoding so equal values always produce identical bytes.

use num_bigint::BigInt;
use num_traits::Zero;
use renku_types::{Tuple, Value};
use renku_util::{Error, Result};

/// Serializes zero or more values, concatenated.
///
/// Canonical encodings are self-delimiting, so no separator is written
/// between consecutive values.
pub fn dumps(values: &[Value]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for value in values {
        write_value(&mut out, value)?;
    }
    Ok(out)
}

/// Serializes values into a byte-oriented sink.
pub fn dump<W: std::io::Write>(sink: &mut W, values: &[Value]) -> Result<()> {
    let bytes = dumps(values)?;
    sink.write_all(&bytes)?;
    Ok(())
}

/// The canonical encoding of a single value.
///
/// This doubles as the sort key for anything the codecs must order:
/// set elements and named tuple keys compare by these bytes.
pub fn encoding_of(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Omega => write_atom(out, &[]),
        Value::Boolean(true) => out.extend_from_slice(b"[4:true]"),
        Value::Boolean(false) => out.extend_from_slice(b"[5:false]"),
        Value::Integer(integer) => {
            out.push(b'[');
            write_atom(out, b"integer");
            write_atom(out, &integer_octets(integer));
            out.push(b']');
        },
        Value::Rational(rational) => {
            out.push(b'[');
            write_atom(out, b"rational");
            write_value(out, &Value::Integer(rational.numer().clone()))?;
            write_value(out, &Value::Integer(rational.denom().clone()))?;
            out.push(b']');
        },
        Value::Unicode(text) => {
            out.push(b'[');
            write_atom(out, b"string");
            write_atom(out, text.as_bytes());
            out.push(b']');
        },
        Value::Bytes(bytes) => write_atom(out, bytes),
        Value::Set(set) => {
            let mut encodings = set
                .iter()
                .map(encoding_of)
                .collect::<Result<Vec<_>>>()?;
            encodings.sort();
            out.push(b'[');
            write_atom(out, b"set");
            for encoding in encodings {
                out.extend_from_slice(&encoding);
            }
            out.push(b']');
        },
        Value::Tuple(tuple) => write_tuple(out, tuple)?,
        Value::Sequence(elements) => {
            out.push(b'(');
            for element in elements {
                write_value(out, element)?;
            }
            out.push(b')');
        },
        other => return Err(Error::unserializable(other.variant_name())),
    }
    Ok(())
}

fn write_tuple(out: &mut Vec<u8>, tuple: &Tuple) -> Result<()> {
    if let Some((marker, inner)) = special_form(tuple) {
        out.push(marker);
        return write_value(out, inner);
    }

    out.push(b'[');
    for value in tuple.positional_values() {
        write_value(out, value)?;
    }

    let mut named = Vec::new();
    for (key, value) in tuple.named_entries() {
        named.push((encoding_of(key)?, encoding_of(value)?));
    }
    named.sort();
    for (key, value) in named {
        out.push(b'=');
        out.extend_from_slice(&key);
        out.extend_from_slice(&value);
    }

    out.push(b']');
    Ok(())
}

/// Recognizes the two-entry quote shapes, which always serialize as a
/// one-byte prefix; a bracketed rendering of the same tuple would break
/// byte-uniqueness.
fn special_form(tuple: &Tuple) -> Option<(u8, &Value)> {
    if tuple.len() != 2 || tuple.positional_len() != 2 {
        return None;
    }
    let head = tuple.get_positional(0)?;
    let inner = tuple.get_positional(1)?;
    let marker = match head {
        Value::Bytes(name) if name.as_slice() == b"quote" => b'\'',
        Value::Bytes(name) if name.as_slice() == b"unquote" => b',',
        Value::Bytes(name) if name.as_slice() == b"unquote-splice" => b'`',
        _ => return None,
    };
    Some((marker, inner))
}

/// Minimal-length big-endian two's-complement octets; empty for zero.
fn integer_octets(integer: &BigInt) -> Vec<u8> {
    if integer.is_zero() {
        Vec::new()
    } else {
        integer.to_signed_bytes_be()
    }
}

fn write_atom(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use renku_types::Set;

    fn encode(value: &Value) -> Vec<u8> {
        encoding_of(value).expect("value should serialize")
    }

    #[test]
    fn test_omega_is_the_empty_atom() {
        assert_eq!(encode(&Value::Omega), b"0:");
    }

    #[test]
    fn test_booleans() {
        assert_eq!(encode(&Value::Boolean(true)), b"[4:true]");
        assert_eq!(encode(&Value::Boolean(false)), b"[5:false]");
    }

    #[test]
    fn test_small_integer() {
        assert_eq!(encode(&Value::integer(3)), b"[7:integer1:\x03]");
    }

    #[test]
    fn test_zero_has_empty_octets() {
        assert_eq!(encode(&Value::integer(0)), b"[7:integer0:]");
    }

    #[test]
    fn test_negative_integer() {
        assert_eq!(encode(&Value::integer(-1)), b"[7:integer1:\xff]");
    }

    #[test]
    fn test_positive_high_bit_gets_sign_octet() {
        assert_eq!(encode(&Value::integer(255)), b"[7:integer2:\x00\xff]");
    }

    #[test]
    fn test_symbol_is_a_bare_atom() {
        assert_eq!(encode(&Value::symbol("cat")), b"3:cat");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(encode(&Value::text("hi")), b"[6:string2:hi]");
    }

    #[test]
    fn test_rational() {
        assert_eq!(
            encode(&Value::rational(1, 2)),
            b"[8:rational[7:integer1:\x01][7:integer1:\x02]]"
        );
    }

    #[test]
    fn test_sequence() {
        let value = Value::Sequence(vec![Value::symbol("a"), Value::symbol("b")]);
        assert_eq!(encode(&value), b"(1:a1:b)");
    }

    #[test]
    fn test_set_elements_are_sorted_by_encoding() {
        let forward: Set = vec![Value::symbol("a"), Value::symbol("b")]
            .into_iter()
            .collect();
        let backward: Set = vec![Value::symbol("b"), Value::symbol("a")]
            .into_iter()
            .collect();

        assert_eq!(encode(&Value::Set(forward.clone())), b"[3:set1:a1:b]");
        assert_eq!(encode(&Value::Set(forward)), encode(&Value::Set(backward)));
    }

    #[test]
    fn test_tuple_positional_then_named() {
        let mut tuple = Tuple::new();
        tuple.insert(Value::integer(0), Value::symbol("f"));
        tuple.insert(Value::symbol("k"), Value::integer(0));

        assert_eq!(
            encode(&Value::Tuple(tuple)),
            b"[1:f=1:k[7:integer0:]]"
        );
    }

    #[test]
    fn test_named_keys_sorted_by_encoding() {
        let mut forward = Tuple::new();
        forward.insert(Value::symbol("a"), Value::integer(1));
        forward.insert(Value::symbol("b"), Value::integer(2));

        let mut backward = Tuple::new();
        backward.insert(Value::symbol("b"), Value::integer(2));
        backward.insert(Value::symbol("a"), Value::integer(1));

        assert_eq!(
            encode(&Value::Tuple(forward)),
            encode(&Value::Tuple(backward))
        );
    }

    #[test]
    fn test_quote_shape_uses_prefix_marker() {
        let mut tuple = Tuple::new();
        tuple.insert(Value::integer(0), Value::symbol("quote"));
        tuple.insert(Value::integer(1), Value::symbol("x"));

        assert_eq!(encode(&Value::Tuple(tuple)), b"'1:x");
    }

    #[test]
    fn test_unquote_and_splice_markers() {
        let mut unquote = Tuple::new();
        unquote.insert(Value::integer(0), Value::symbol("unquote"));
        unquote.insert(Value::integer(1), Value::symbol("x"));
        assert_eq!(encode(&Value::Tuple(unquote)), b",1:x");

        let mut splice = Tuple::new();
        splice.insert(Value::integer(0), Value::symbol("unquote-splice"));
        splice.insert(Value::integer(1), Value::symbol("x"));
        assert_eq!(encode(&Value::Tuple(splice)), b"`1:x");
    }

    #[test]
    fn test_three_entry_quote_tuple_is_not_a_special_form() {
        let mut tuple = Tuple::new();
        tuple.insert(Value::integer(0), Value::symbol("quote"));
        tuple.insert(Value::integer(1), Value::symbol("x"));
        tuple.insert(Value::integer(2), Value::symbol("y"));

        assert_eq!(encode(&Value::Tuple(tuple)), b"[5:quote1:x1:y]");
    }

    #[test]
    fn test_procedure_is_unserializable() {
        let error = encoding_of(&Value::Procedure).unwrap_err();
        assert!(matches!(
            error,
            Error::Unserializable {
                variant: "Procedure"
            }
        ));
    }

    #[test]
    fn test_multi_value_dumps_concatenates() {
        let bytes = dumps(&[Value::symbol("a"), Value::integer(3)]).unwrap();
        assert_eq!(bytes, b"1:a[7:integer1:\x03]");
    }

    #[test]
    fn test_dumps_of_nothing_is_empty() {
        assert_eq!(dumps(&[]).unwrap(), b"");
    }
}
