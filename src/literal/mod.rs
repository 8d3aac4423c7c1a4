//! Restricted literal-expression parsing.
//!
//! Proxy rule lists arrive as text such as
//! `[['/api','http://localhost:3000',undefined,{ ws: false }]]`. That text is
//! an expression literal rather than JSON: single-quoted strings, unquoted
//! object keys, `undefined` and trailing commas all appear in practice.
//! [`parse`] accepts arrays, objects, strings, numbers, booleans, `null` and
//! `undefined`, and rejects everything else. No part of the input is ever
//! executed.

mod parser;
mod value;

pub use parser::MAX_DEPTH;
pub use value::Literal;

use crate::error::LiteralError;

/// Parse `text` as a single literal value.
pub fn parse(text: &str) -> Result<Literal, LiteralError> {
    parser::Parser::new(text).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiteralErrorKind;

    fn s(v: &str) -> Literal {
        Literal::String(v.into())
    }

    #[test]
    fn parses_single_quoted_rule_list() {
        let lit = parse("[['/api','http://localhost:3000','/backend']]").unwrap();
        assert_eq!(
            lit,
            Literal::Array(vec![Literal::Array(vec![
                s("/api"),
                s("http://localhost:3000"),
                s("/backend"),
            ])])
        );
    }

    #[test]
    fn parses_undefined_and_object_options() {
        let lit = parse("[['/api','http://localhost:3000',undefined,{ ws: false }]]").unwrap();
        let rule = &lit.as_array().unwrap()[0];
        let items = rule.as_array().unwrap();
        assert_eq!(items[2], Literal::Undefined);
        assert_eq!(
            items[3],
            Literal::Object(vec![("ws".into(), Literal::Bool(false))])
        );
    }

    #[test]
    fn elisions_and_trailing_commas() {
        let lit = parse("['a',,'b',]").unwrap();
        assert_eq!(
            lit,
            Literal::Array(vec![s("a"), Literal::Undefined, s("b")])
        );
        assert_eq!(parse("[,]").unwrap(), Literal::Array(vec![Literal::Undefined]));
        assert_eq!(parse("{a: 1,}").unwrap().as_object().unwrap().len(), 1);
    }

    #[test]
    fn numbers() {
        assert_eq!(parse("42").unwrap(), Literal::Number(42.0));
        assert_eq!(parse("-1.5e2").unwrap(), Literal::Number(-150.0));
        assert_eq!(parse(".5").unwrap(), Literal::Number(0.5));
        assert_eq!(parse("0xff").unwrap(), Literal::Number(255.0));
        assert_eq!(parse("0b101").unwrap(), Literal::Number(5.0));
        assert_eq!(parse("1_000").unwrap(), Literal::Number(1000.0));
        assert_eq!(parse("-Infinity").unwrap(), Literal::Number(f64::NEG_INFINITY));
        assert!(matches!(parse("NaN").unwrap(), Literal::Number(n) if n.is_nan()));
    }

    #[test]
    fn stacked_signs_need_separation() {
        assert_eq!(parse("- -5").unwrap(), Literal::Number(5.0));
        assert_eq!(parse("-+5").unwrap(), Literal::Number(-5.0));

        let err = parse("--5").unwrap_err();
        assert_eq!(err.kind, LiteralErrorKind::UnexpectedChar('-'));
        assert_eq!(err.offset, 1);
        assert!(parse("[++5]").is_err());
    }

    #[test]
    fn string_escapes() {
        assert_eq!(parse(r"'it\'s'").unwrap(), s("it's"));
        assert_eq!(parse(r#""a\tb\n""#).unwrap(), s("a\tb\n"));
        assert_eq!(parse(r"'\x41B\u{43}'").unwrap(), s("ABC"));
        assert_eq!(parse(r"'😀'").unwrap(), s("\u{1F600}"));
        assert_eq!(parse("`multi\nline`").unwrap(), s("multi\nline"));
        assert_eq!(parse("'a\\\nb'").unwrap(), s("ab"));
    }

    #[test]
    fn comments_and_parentheses_are_trivia() {
        let lit = parse("( /* rules */ [ // first\n ['/a', 'http://a'] ] );").unwrap();
        assert_eq!(lit.as_array().unwrap().len(), 1);
    }

    #[test]
    fn object_keys_may_be_quoted_or_numeric() {
        let lit = parse(r#"{ 'x-a': 1, "b": 2, 3: 'c', $d_1: true }"#).unwrap();
        let keys: Vec<&str> = lit
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["x-a", "b", "3", "$d_1"]);
    }

    #[test]
    fn rejects_code() {
        let err = parse("this is invalid javascript and will throw").unwrap_err();
        assert_eq!(err.kind, LiteralErrorKind::UnknownIdentifier("this".into()));
        assert_eq!(err.offset, 0);

        assert!(parse("process.exit(1)").is_err());
        assert!(parse("[1 + 2]").is_err());
        assert!(parse("{ ws }").is_err());
        assert_eq!(
            parse("`${x}`").unwrap_err().kind,
            LiteralErrorKind::TemplateInterpolation
        );
    }

    #[test]
    fn reports_unterminated_input() {
        assert_eq!(
            parse("[['/api'").unwrap_err().kind,
            LiteralErrorKind::UnexpectedEnd {
                expected: "',' or ']'"
            }
        );
        assert_eq!(
            parse("'open").unwrap_err().kind,
            LiteralErrorKind::UnterminatedString
        );
        assert_eq!(parse("[] []").unwrap_err().kind, LiteralErrorKind::TrailingInput);
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(matches!(
            parse("10n").unwrap_err().kind,
            LiteralErrorKind::InvalidNumber(_)
        ));
        assert!(matches!(
            parse("1e").unwrap_err().kind,
            LiteralErrorKind::InvalidNumber(_)
        ));
        assert!(parse("-'a'").is_err());
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&ok).is_ok());

        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse(&deep).unwrap_err().kind,
            LiteralErrorKind::TooDeep { limit: MAX_DEPTH }
        );
    }

    #[test]
    fn display_output_parses_back() {
        let lit = parse("[['/a','http://a',undefined,{ ws: false, 'x-y': [1, null] }]]").unwrap();
        assert_eq!(parse(&lit.to_string()).unwrap(), lit);
    }

    #[test]
    fn unicode_identifier_keys() {
        let lit = parse("{ éclair: true, ñ_1: 2 }").unwrap();
        let keys: Vec<&str> = lit
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["éclair", "ñ_1"]);
        assert_eq!(lit.to_string(), "{ éclair: true, ñ_1: 2 }");
        assert_eq!(parse(&lit.to_string()).unwrap(), lit);
    }
}
