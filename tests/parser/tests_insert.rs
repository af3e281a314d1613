#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::*;
use chsyntax::parse;
use chsyntax::parser::ast::*;
use rstest::rstest;

fn insert(text: &str) -> InsertStatement {
    let parse = parse(text);
    assert!(parse.ok(), "errors for {text:?}: {:?}", parse.errors());
    assert_well_formed(&parse);
    let root = SourceFile::cast(parse.syntax()).unwrap();
    match root.statements().next() {
        Some(Statement::Insert(insert)) => insert,
        other => panic!("expected INSERT, got {other:?}"),
    }
}

#[test]
fn test_insert_values() {
    let statement = insert(INSERT_VALUES);
    assert_eq!(statement.table().unwrap().text(), "events");
    let columns: Vec<_> = statement.columns().unwrap().names().map(|n| n.name()).collect();
    assert_eq!(columns, vec!["id", "user_id"]);

    let rows: Vec<Vec<String>> = statement
        .values()
        .unwrap()
        .rows()
        .map(|row| row.values().map(|value| value.text()).collect())
        .collect();
    assert_eq!(rows, vec![vec!["1", "10"], vec!["2", "20"]]);
}

#[test]
fn test_insert_select() {
    let statement = insert("INSERT INTO archive (a, b) SELECT a, b FROM events WHERE a < 10");
    assert!(statement.values().is_none());
    let query = statement.query().unwrap();
    assert!(query.where_clause().is_some());
}

#[rstest]
#[case("INSERT INTO t FORMAT CSV", "CSV")]
#[case("INSERT INTO t (a) FORMAT JSONEachRow", "JSONEachRow")]
fn test_insert_format(#[case] text: &str, #[case] format: &str) {
    let statement = insert(text);
    assert_eq!(statement.format().unwrap().format_name().unwrap().text(), format);
}

#[rstest]
#[case("INSERT INTO t VALUES (1)")]
#[case("INSERT INTO t VALUES (-1, 'x', NULL, [1, 2], (3, 4))")]
#[case("INSERT INTO t VALUES (now(), today() - 1)")]
#[case("insert into `odd name` values (1)")]
fn test_insert_value_shapes(#[case] text: &str) {
    let statement = insert(text);
    assert_eq!(statement.values().unwrap().rows().count(), 1);
}

#[test]
fn test_quoted_table_name() {
    let statement = insert("INSERT INTO `odd name` VALUES (1)");
    assert_eq!(statement.table().unwrap().name(), "odd name");
}
