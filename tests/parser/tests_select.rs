//! SELECT statement parsing through the public API
//!
//! These tests cover:
//! - The clause sequence (WITH, SELECT, FROM, WHERE, GROUP BY, ORDER BY, LIMIT)
//! - Subqueries and common table expressions
//! - Statement lists separated by `;`

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::*;
use chsyntax::parser::SyntaxKind::{self, *};
use chsyntax::parser::ast::*;
use chsyntax::{TextRange, TextSize, parse};
use rstest::rstest;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::new(start), TextSize::new(end))
}

fn parse_ok(text: &str) -> SourceFile {
    let parse = parse(text);
    assert!(parse.ok(), "errors for {text:?}: {:?}", parse.errors());
    assert_well_formed(&parse);
    SourceFile::cast(parse.syntax()).unwrap()
}

fn select(text: &str) -> SelectStatement {
    match parse_ok(text).statements().next() {
        Some(Statement::Select(select)) => select,
        other => panic!("expected SELECT, got {other:?}"),
    }
}

// ============================================================================
// Accepted inputs
// ============================================================================

#[rstest]
#[case::literal("SELECT 1")]
#[case::wildcard("SELECT *")]
#[case::alias("SELECT a, b AS c FROM t")]
#[case::qualified_table("SELECT count(*) FROM db.events GROUP BY user_id, day")]
#[case::boolean_where("SELECT a FROM t WHERE a > 1 AND b LIKE 'x%' OR c IS NULL")]
#[case::order_limit("SELECT a FROM t ORDER BY a ASC, b DESC LIMIT 100")]
#[case::subquery("SELECT a FROM (SELECT a FROM t)")]
#[case::cte("WITH x AS (SELECT 1) SELECT * FROM x")]
#[case::cse("WITH 10 AS n SELECT n")]
#[case::lambda("SELECT arrayMap(x -> x * 2, [1, 2, 3])")]
#[case::cast("SELECT CAST(a AS UInt32) FROM t")]
#[case::interval("SELECT now() - INTERVAL 1 DAY")]
#[case::tuple_in("SELECT (1, 'a') IN ((1, 'a'), (2, 'b'))")]
#[case::unary("SELECT -a + +b % 3")]
#[case::not("SELECT NOT a = b")]
#[case::quoted("SELECT `select`, \"text\" FROM t")]
#[case::numbers("SELECT 1_000, 0xFF, 0b101, 1.5e3")]
#[case::heredoc("SELECT $tag$raw 'text'$tag$")]
#[case::trailing_comment("SELECT a FROM t -- trailing\n")]
#[case::leading_block_comment("/* lead */ SELECT 1")]
#[case::soft_keywords_as_names("SELECT key, format, comment FROM settings")]
#[case::lowercase_keywords("select a from t where a = 1")]
fn test_select_parses(#[case] text: &str) {
    parse_ok(text);
}

#[rstest]
#[case(SIMPLE_SELECT)]
#[case(ANALYTICS_QUERY)]
#[case(MULTI_STATEMENT)]
fn test_fixture_parses(#[case] text: &str) {
    parse_ok(text);
}

// ============================================================================
// Tree shape
// ============================================================================

#[test]
fn test_select_literal_tree() {
    let parse = parse("SELECT 1");
    let statement = parse.syntax().first_child().unwrap();
    assert_eq!(statement.kind(), SELECT_STATEMENT);
    assert_eq!(statement.text_range(), range(0, 8));

    let leaves: Vec<(SyntaxKind, TextRange)> = statement
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .map(|token| (token.kind(), token.text_range()))
        .collect();
    assert_eq!(
        leaves,
        vec![
            (SELECT_KW, range(0, 6)),
            (WHITESPACE, range(6, 7)),
            (NUMBER, range(7, 8)),
        ]
    );
}

#[test]
fn test_clause_order() {
    let statement = select(ANALYTICS_QUERY);
    assert_eq!(
        child_kinds(statement.syntax()),
        vec![
            WITH_CLAUSE,
            SELECT_CLAUSE,
            FROM_CLAUSE,
            WHERE_CLAUSE,
            GROUP_BY_CLAUSE,
            ORDER_BY_CLAUSE,
            LIMIT_CLAUSE,
        ]
    );
    assert_eq!(statement.limit_clause().unwrap().limit(), Some(7));
    assert_eq!(statement.doc_comment().as_deref(), Some("daily active users"));
}

#[test]
fn test_select_items() {
    let items: Vec<_> = select("SELECT *, a AS b, c + 1")
        .select_clause()
        .unwrap()
        .items()
        .collect();
    assert_eq!(items.len(), 3);
    assert!(matches!(items[0], SelectItem::Wildcard(_)));
    assert!(matches!(items[1], SelectItem::Aliased(_)));
    assert!(matches!(items[2], SelectItem::Expr(Expr::Binary(_))));
}

#[test]
fn test_subquery_in_from() {
    let outer = select("SELECT a FROM (SELECT a FROM inner_t WHERE a > 0)");
    let from = outer.from_clause().unwrap();
    assert!(from.table().is_none());
    let inner = from.subquery().unwrap();
    let table = inner.from_clause().unwrap().table().unwrap();
    assert_eq!(table.table().unwrap().text(), "inner_t");
    assert!(inner.where_clause().is_some());
}

#[test]
fn test_statement_list() {
    let root = parse_ok("SELECT 1; SELECT 2;\nSELECT 3");
    let statements: Vec<_> = root.statements().collect();
    assert_eq!(statements.len(), 3);
    assert!(statements[0].has_semicolon());
    assert!(statements[1].has_semicolon());
    assert!(!statements[2].has_semicolon());
}

#[test]
fn test_soft_keyword_reads_as_identifier() {
    let parse = parse("SELECT key FROM t");
    let tokens = significant_tokens(&parse.syntax());
    assert_eq!(tokens[1], (IDENT, "key".to_string()));
}

#[test]
fn test_keywords_are_case_insensitive() {
    let upper = parse("SELECT a FROM t");
    let lower = parse("select a from t");
    let kinds = |parse: &chsyntax::Parse| -> Vec<SyntaxKind> {
        significant_tokens(&parse.syntax())
            .into_iter()
            .map(|(kind, _)| kind)
            .collect()
    };
    assert_eq!(kinds(&upper), kinds(&lower));
}
