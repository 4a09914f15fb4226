//! Edge case tests for renku-simple

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use crate::tokenizer::Tokenizer;
    use crate::{loads, Parser};
    use renku_types::{Tuple, Value};
    use renku_util::Result;

    fn lex_all(source: &str) -> Vec<Token> {
        Tokenizer::new(source)
            .collect::<Result<Vec<_>>>()
            .expect("source should tokenize")
    }

    fn parse(source: &str) -> Value {
        Parser::new(Tokenizer::new(source))
            .parse()
            .expect("source should parse")
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_single_char_symbol() {
        assert_eq!(lex_all("x"), vec![Token::Literal(Value::symbol("x"))]);
    }

    #[test]
    fn test_edge_long_symbol() {
        let name = "a".repeat(10000);
        let tokens = lex_all(&name);
        assert_eq!(tokens, vec![Token::Literal(Value::symbol(&name))]);
    }

    #[test]
    fn test_edge_deep_nesting() {
        let depth = 500;
        let source = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
        let mut value = parse(&source);
        for _ in 0..depth {
            value = match value {
                Value::Tuple(tuple) => tuple
                    .get_positional(0)
                    .expect("each level holds one entry")
                    .clone(),
                other => panic!("expected tuple, got {:?}", other),
            };
        }
        assert_eq!(value, Value::symbol("x"));
    }

    #[test]
    fn test_edge_symbol_adjacent_to_bracket() {
        let tokens = lex_all("a[b]");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Literal(Value::symbol("a")));
    }

    #[test]
    fn test_edge_empty_containers() {
        assert_eq!(
            parse("[] ()"),
            {
                let mut top = Tuple::new();
                top.insert(Value::integer(0), Value::Tuple(Tuple::new()));
                top.insert(Value::integer(1), Value::Sequence(vec![]));
                Value::Tuple(top)
            }
        );
    }

    #[test]
    fn test_edge_empty_eval_data() {
        // {} => [quote []]
        let value = parse("{}");
        let tuple = match value {
            Value::Tuple(top) => match top.get_positional(0) {
                Some(Value::Tuple(tuple)) => tuple.clone(),
                other => panic!("expected tuple, got {:?}", other),
            },
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.get_positional(0), Some(&Value::symbol("quote")));
        assert_eq!(
            tuple.get_positional(1),
            Some(&Value::Tuple(Tuple::new()))
        );
    }

    #[test]
    fn test_edge_adjacent_constants() {
        assert_eq!(
            lex_all("#t#f"),
            vec![
                Token::Literal(Value::Boolean(true)),
                Token::Literal(Value::Boolean(false)),
            ]
        );
    }

    #[test]
    fn test_edge_empty_string_literal() {
        assert_eq!(lex_all("\"\""), vec![Token::Literal(Value::text(""))]);
    }

    #[test]
    fn test_edge_multiline_string() {
        assert_eq!(
            lex_all("\"a\nb\""),
            vec![Token::Literal(Value::text("a\nb"))]
        );
    }

    #[test]
    fn test_edge_non_ascii_symbol_is_rejected() {
        let result: Result<Vec<_>> = Tokenizer::new("α").collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_edge_crlf_comment() {
        assert_eq!(
            lex_all(";c\r\nabc"),
            vec![Token::Literal(Value::symbol("abc"))]
        );
    }

    #[test]
    fn test_edge_zero_variants() {
        assert_eq!(lex_all("0"), vec![Token::Literal(Value::integer(0))]);
        assert_eq!(lex_all("-0"), vec![Token::Literal(Value::integer(0))]);
        assert_eq!(lex_all("000"), vec![Token::Literal(Value::integer(0))]);
    }

    #[test]
    fn test_edge_rational_everywhere_a_number_fits() {
        let value = parse("[1/2 k:3/4]");
        let tuple = match value {
            Value::Tuple(top) => match top.get_positional(0) {
                Some(Value::Tuple(tuple)) => tuple.clone(),
                other => panic!("expected tuple, got {:?}", other),
            },
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.get_positional(0), Some(&Value::rational(1, 2)));
        assert_eq!(
            tuple.get(&Value::symbol("k")),
            Some(&Value::rational(3, 4))
        );
    }

    #[test]
    fn test_edge_integer_key_written_positionally() {
        // An explicit 0: key fills the positional run.
        let value = loads("[0:a]").unwrap();
        let tuple = match value {
            Value::Tuple(top) => match top.get_positional(0) {
                Some(Value::Tuple(tuple)) => tuple.clone(),
                other => panic!("expected tuple, got {:?}", other),
            },
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(tuple.positional_len(), 1);
    }

    #[test]
    fn test_edge_whitespace_varieties() {
        assert_eq!(lex_all(" \t\r\n\u{00A0}\u{3000} "), vec![]);
    }

    #[test]
    fn test_edge_quote_chain_across_containers() {
        // '['(a)] wraps the tuple, which holds a quoted sequence.
        let value = parse("'['(a)]");
        let quoted = match value {
            Value::Tuple(top) => top.get_positional(0).expect("entry 0").clone(),
            other => panic!("expected tuple, got {:?}", other),
        };
        let outer = match quoted {
            Value::Tuple(tuple) => tuple,
            other => panic!("expected tuple, got {:?}", other),
        };
        assert_eq!(outer.get_positional(0), Some(&Value::symbol("quote")));
    }
}
