//! Simple-expression serializer.
//!
//! Walks a value tree and renders the human-readable notation. Output is
//! deterministic: named tuple entries and set elements are emitted in
//! the canonical sort order of the underlying values, which is the
//! lexicographic order of their canonical byte encodings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use renku_types::{Set, Tuple, Value};
use renku_util::{Error, Result};

use crate::token::is_identifier_text;

/// Serializes zero or more values, joined by single spaces.
pub fn dumps(values: &[Value]) -> Result<String> {
    let rendered = values
        .iter()
        .map(|value| {
            let mut out = String::new();
            write_value(&mut out, value)?;
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(" "))
}

fn write_value(out: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Omega => out.push_str("#nil"),
        Value::Boolean(true) => out.push_str("#t"),
        Value::Boolean(false) => out.push_str("#f"),
        Value::Integer(integer) => out.push_str(&integer.to_string()),
        Value::Rational(rational) => {
            out.push_str("[rational ");
            out.push_str(&rational.numer().to_string());
            out.push(' ');
            out.push_str(&rational.denom().to_string());
            out.push(']');
        },
        Value::Unicode(text) => write_string(out, text),
        Value::Bytes(bytes) => write_bytes(out, bytes),
        Value::Set(set) => write_set(out, set)?,
        Value::Tuple(tuple) => write_tuple(out, tuple)?,
        Value::Sequence(elements) => {
            out.push('(');
            for (index, element) in elements.iter().enumerate() {
                if index > 0 {
                    out.push(' ');
                }
                write_value(out, element)?;
            }
            out.push(')');
        },
        other => return Err(Error::unserializable(other.variant_name())),
    }
    Ok(())
}

/// Double-quoted, with `"` and `\` escaped; everything else passes
/// through untouched.
fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
}

/// A symbol spelling renders verbatim; anything else becomes a
/// `[byte-array …]` form with standard base-64 payload.
fn write_bytes(out: &mut String, bytes: &[u8]) {
    match std::str::from_utf8(bytes) {
        Ok(text) if is_identifier_text(text) => out.push_str(text),
        _ => {
            out.push_str("[byte-array ");
            out.push_str(&STANDARD.encode(bytes));
            out.push(']');
        },
    }
}

fn write_set(out: &mut String, set: &Set) -> Result<()> {
    out.push_str("[set");
    for (_, rendered) in sorted_renderings(set.iter())? {
        out.push(' ');
        out.push_str(&rendered);
    }
    out.push(']');
    Ok(())
}

fn write_tuple(out: &mut String, tuple: &Tuple) -> Result<()> {
    out.push('[');

    let mut first = true;
    for value in tuple.positional_values() {
        if !first {
            out.push(' ');
        }
        write_value(out, value)?;
        first = false;
    }

    let mut named = Vec::new();
    for (key, value) in tuple.named_entries() {
        let sort_key = renku_canon::encoding_of(key)?;
        let mut rendered = String::new();
        write_value(&mut rendered, key)?;
        rendered.push(':');
        write_value(&mut rendered, value)?;
        named.push((sort_key, rendered));
    }
    named.sort();
    for (_, rendered) in named {
        if !first {
            out.push(' ');
        }
        out.push_str(&rendered);
        first = false;
    }

    out.push(']');
    Ok(())
}

/// Renders each value alongside its canonical sort key.
fn sorted_renderings<'a>(
    values: impl Iterator<Item = &'a Value>,
) -> Result<Vec<(Vec<u8>, String)>> {
    let mut renderings = Vec::new();
    for value in values {
        let sort_key = renku_canon::encoding_of(value)?;
        let mut rendered = String::new();
        write_value(&mut rendered, value)?;
        renderings.push((sort_key, rendered));
    }
    renderings.sort();
    Ok(renderings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use renku_types::BigInt;

    fn render(value: &Value) -> String {
        dumps(std::slice::from_ref(value)).expect("value should serialize")
    }

    #[test]
    fn test_constants() {
        assert_eq!(render(&Value::Omega), "#nil");
        assert_eq!(render(&Value::Boolean(true)), "#t");
        assert_eq!(render(&Value::Boolean(false)), "#f");
    }

    #[test]
    fn test_integers() {
        assert_eq!(render(&Value::integer(42)), "42");
        assert_eq!(render(&Value::integer(-17)), "-17");
        let huge = -(BigInt::from(1) << 65usize);
        assert_eq!(render(&Value::Integer(huge)), "-36893488147419103232");
    }

    #[test]
    fn test_rational() {
        assert_eq!(render(&Value::rational(1, 2)), "[rational 1 2]");
    }

    #[test]
    fn test_rational_renders_reduced() {
        assert_eq!(render(&Value::rational(2, 4)), "[rational 1 2]");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(render(&Value::text("tschüss!")), "\"tschüss!\"");
        assert_eq!(render(&Value::text("a\"b")), r#""a\"b""#);
        assert_eq!(render(&Value::text("a\\b")), r#""a\\b""#);
    }

    #[test]
    fn test_identifier_bytes_render_verbatim() {
        assert_eq!(render(&Value::symbol("abc")), "abc");
        assert_eq!(render(&Value::symbol("+")), "+");
        assert_eq!(render(&Value::symbol("byte-array")), "byte-array");
    }

    #[test]
    fn test_non_identifier_bytes_render_as_byte_array() {
        assert_eq!(
            render(&Value::Bytes(vec![1, 2, 3])),
            "[byte-array AQID]"
        );
    }

    #[test]
    fn test_byte_array_keeps_padding() {
        assert_eq!(
            render(&Value::symbol("no spaces!?")),
            "[byte-array bm8gc3BhY2VzIT8=]"
        );
    }

    #[test]
    fn test_number_like_bytes_do_not_render_verbatim() {
        // "+1" would re-lex as a number, so it must not render bare.
        assert_eq!(render(&Value::symbol("+1")), "[byte-array KzE=]");
    }

    #[test]
    fn test_sequence() {
        let value = Value::Sequence(vec![
            Value::symbol("a"),
            Value::symbol("b"),
            Value::symbol("c"),
        ]);
        assert_eq!(render(&value), "(a b c)");
        assert_eq!(render(&Value::Sequence(vec![])), "()");
    }

    #[test]
    fn test_set_sorted() {
        let set: Set = vec![Value::symbol("b"), Value::symbol("a")]
            .into_iter()
            .collect();
        assert_eq!(render(&Value::Set(set)), "[set a b]");
        assert_eq!(render(&Value::Set(Set::new())), "[set]");
    }

    #[test]
    fn test_tuple_positional_then_named() {
        let mut tuple = Tuple::new();
        tuple.insert(Value::integer(0), Value::symbol("if"));
        tuple.insert(Value::symbol("then"), Value::Omega);
        tuple.insert(Value::integer(1), Value::integer(3));

        assert_eq!(render(&Value::Tuple(tuple)), "[if 3 then:#nil]");
    }

    #[test]
    fn test_named_keys_sorted_canonically() {
        let mut forward = Tuple::new();
        forward.insert(Value::symbol("b"), Value::integer(2));
        forward.insert(Value::symbol("a"), Value::integer(1));

        assert_eq!(render(&Value::Tuple(forward)), "[a:1 b:2]");
    }

    #[test]
    fn test_empty_tuple() {
        assert_eq!(render(&Value::Tuple(Tuple::new())), "[]");
    }

    #[test]
    fn test_nested_containers() {
        let mut inner = Tuple::new();
        inner.insert(Value::integer(0), Value::symbol("="));
        inner.insert(Value::integer(1), Value::integer(1));

        let mut outer = Tuple::new();
        outer.insert(Value::integer(0), Value::symbol("if"));
        outer.insert(Value::integer(1), Value::Tuple(inner));

        assert_eq!(render(&Value::Tuple(outer)), "[if [= 1]]");
    }

    #[test]
    fn test_unserializable_variants() {
        for value in [Value::Relation, Value::Matrix, Value::Procedure] {
            assert!(matches!(
                dumps(&[value]),
                Err(Error::Unserializable { .. })
            ));
        }
    }

    #[test]
    fn test_multi_value_dumps_joins_with_spaces() {
        let rendered = dumps(&[Value::symbol("a"), Value::integer(1)]).unwrap();
        assert_eq!(rendered, "a 1");
    }

    #[test]
    fn test_dumps_of_nothing_is_empty() {
        assert_eq!(dumps(&[]).unwrap(), "");
    }
}
