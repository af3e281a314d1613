//! Error recovery: malformed input always yields a usable tree
//!
//! Covers lexical anomalies (UNKNOWN leaves), discarded material (ERROR
//! nodes) and synthesized tokens (MISSING nodes), plus termination on
//! adversarial input.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::*;
use chsyntax::parser::SyntaxKind::*;
use chsyntax::parser::SyntaxNodeExt;
use chsyntax::{ErrorCode, TextRange, TextSize, parse};
use rstest::rstest;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::new(start), TextSize::new(end))
}

#[test]
fn test_truncated_select_has_missing_expression() {
    let parse = parse("SELECT");
    assert_well_formed(&parse);
    let root = parse.syntax();
    let statement = root.first_child().unwrap();
    assert_eq!(statement.kind(), SELECT_STATEMENT);

    let missing = statement
        .descendants()
        .find(|node| node.is_missing())
        .unwrap();
    assert_eq!(missing.text_range(), TextRange::empty(TextSize::new(6)));
    let error = &parse.errors()[0];
    assert_eq!(error.code, ErrorCode::E0406);
    assert_eq!(error.range, TextRange::empty(TextSize::new(6)));
}

#[test]
fn test_unbalanced_paren_keeps_partial_statement() {
    let parse = parse("SELECT 1 FROM (");
    assert_well_formed(&parse);
    let statement = parse.syntax().first_child().unwrap();
    assert_eq!(statement.kind(), SELECT_STATEMENT);
    assert_eq!(child_kinds(&statement), vec![SELECT_CLAUSE, FROM_CLAUSE]);

    let error = find_node(&parse.syntax(), ERROR).unwrap();
    assert_eq!(error.text_range(), range(14, 15));
    assert!(!parse.ok());
}

#[test]
fn test_control_byte_inside_identifier() {
    let parse = parse("SELECT ab\u{1}cd FROM t");
    assert_well_formed(&parse);
    let leaves: Vec<_> = parse
        .syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| (7..12).contains(&u32::from(token.text_range().start())))
        .map(|token| (token.kind(), token.text().to_string()))
        .collect();
    assert_eq!(
        leaves,
        vec![
            (IDENT, "ab".to_string()),
            (UNKNOWN, "\u{1}".to_string()),
            (IDENT, "cd".to_string()),
        ]
    );
    let unknown = parse
        .errors()
        .iter()
        .find(|error| error.code == ErrorCode::E0101)
        .unwrap();
    assert_eq!(unknown.range, range(9, 10));
}

#[test]
fn test_discarded_control_byte_is_escaped_in_message() {
    let parse = parse("SELECT 1 \u{1}x FROM t");
    assert_well_formed(&parse);
    let lexical = parse
        .errors()
        .iter()
        .find(|error| error.code == ErrorCode::E0101)
        .unwrap();
    assert_eq!(lexical.range, range(9, 10));
    let discarded = parse
        .errors()
        .iter()
        .find(|error| error.code == ErrorCode::E0201)
        .unwrap();
    assert!(discarded.message.contains("\"\\u{1}\""), "{}", discarded.message);
    assert!(!discarded.message.contains('\u{1}'));
}

#[test]
fn test_lone_unknown_adds_no_syntax_error() {
    let parse = parse("SELECT 1 \u{1}");
    assert_well_formed(&parse);
    let codes: Vec<_> = parse.errors().iter().map(|error| error.code).collect();
    assert_eq!(codes, vec![ErrorCode::E0101]);
}

#[rstest]
#[case("SELECT 'oops FROM t", ErrorCode::E0102)]
#[case("SELECT 1 /* never closed", ErrorCode::E0103)]
#[case("SELECT `never closed", ErrorCode::E0104)]
#[case("SELECT count(x FROM t", ErrorCode::E0203)]
#[case("SELECT [1, 2 FROM t", ErrorCode::E0204)]
#[case("SELECT 1 FROM t WHERE", ErrorCode::E0406)]
#[case("SELECT ) 1", ErrorCode::E0201)]
fn test_error_codes(#[case] text: &str, #[case] code: ErrorCode) {
    let parse = parse(text);
    assert_well_formed(&parse);
    assert!(
        parse.errors().iter().any(|error| error.code == code),
        "expected {code:?} for {text:?}, got {:?}",
        parse.errors()
    );
}

#[test]
fn test_unclosed_paren_points_at_opener() {
    let parse = parse("SELECT f((1), 2");
    assert_well_formed(&parse);
    let error = parse
        .errors()
        .iter()
        .find(|error| error.code == ErrorCode::E0203)
        .unwrap();
    assert_eq!(error.range, TextRange::empty(TextSize::new(15)));
    assert!(error.has_related());
    assert_eq!(error.related[0].range, range(8, 9));
}

#[test]
fn test_recovery_resumes_at_next_statement() {
    let parse = parse("SELECT , FROM t; SELECT 2");
    assert_well_formed(&parse);
    assert!(!parse.ok());
    let last = parse
        .syntax()
        .children()
        .filter(|node| node.kind() == SELECT_STATEMENT)
        .last()
        .unwrap();
    assert_eq!(last.text().to_string(), "SELECT 2");
    assert!(!last.has_errors());
}

#[test]
fn test_error_inside_parens_does_not_leak() {
    let parse = parse("SELECT f(1 +) , 2 FROM t");
    assert_well_formed(&parse);
    let from = find_node(&parse.syntax(), FROM_CLAUSE).unwrap();
    assert!(!from.has_errors());
}

#[test]
fn test_malformed_input_terminates() {
    for text in MALFORMED {
        let parse = parse(text);
        assert_well_formed(&parse);
        assert!(!parse.ok(), "{text:?} should report errors");
    }
}

#[test]
fn test_deep_nesting_terminates() {
    let text = format!("SELECT {}1", "(".repeat(500));
    let parse = parse(&text);
    assert_well_formed(&parse);
    assert!(!parse.errors().is_empty());
    assert!(find_node(&parse.syntax(), ERROR).is_some());
}

#[test]
fn test_long_operator_chain_on_large_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let text = format!("SELECT 1{}", " + 1".repeat(50_000));
            let parse = parse(&text);
            assert!(parse.ok(), "{:?}", parse.errors());
            assert_eq!(parse.syntax().text_range().len(), TextSize::of(text.as_str()));
            let depth = parse
                .syntax()
                .descendants()
                .filter(|node| node.kind() == BINARY_EXPRESSION)
                .count();
            assert_eq!(depth, 50_000);
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn test_only_delimiters() {
    for text in ["()", "[]", "(,)", ";"] {
        let parse = parse(text);
        assert_well_formed(&parse);
        assert!(!parse.ok());
    }
}

#[test]
fn test_empty_and_trivia_only_input() {
    for text in ["", "   ", "-- just a comment", "/* c */\n"] {
        let parse = parse(text);
        assert_well_formed(&parse);
        assert!(parse.ok(), "{text:?}: {:?}", parse.errors());
    }
}
