//! Incremental reparsing must be indistinguishable from parsing from scratch
//!
//! The sweeps below apply small edits at every character boundary of a
//! document and compare the reparsed tree with a fresh parse of the edited
//! text, node for node.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::*;
use chsyntax::parser::SyntaxKind::*;
use chsyntax::{Parse, TextEdit, TextRange, TextSize, parse};
use rstest::rstest;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::new(start), TextSize::new(end))
}

fn boundaries(text: &str) -> impl Iterator<Item = u32> + '_ {
    (0..=text.len())
        .filter(|&offset| text.is_char_boundary(offset))
        .map(|offset| offset as u32)
}

/// Reparse `old` with `edit` and compare against a fresh parse
fn check_edit(old: &Parse, edit: &TextEdit) -> Parse {
    let expected_text = edit.apply(old.text()).unwrap();
    let new = old.reparse(edit);
    assert_eq!(new.text(), expected_text);
    assert_well_formed(&new);
    assert_same_tree(&new, &parse(&expected_text));
    new
}

// ============================================================================
// Example edits
// ============================================================================

#[test]
fn test_replace_literal_reuses_leading_keyword() {
    let old = parse("SELECT 1");
    let new = check_edit(&old, &TextEdit::new(range(7, 8), "42"));
    assert_eq!(new.text(), "SELECT 42");

    let old_root = old.syntax();
    let new_root = new.syntax();
    let old_select = old_root.first_token().unwrap();
    let new_select = new_root.first_token().unwrap();
    assert_eq!(new_select.kind(), SELECT_KW);
    assert!(std::ptr::eq(old_select.green(), new_select.green()));
}

#[rstest]
#[case::insert_column("SELECT a FROM t", TextEdit::insert(TextSize::new(8), ", b"))]
#[case::delete_where(
    "SELECT a FROM t WHERE a = 1",
    TextEdit::delete(range(15, 27))
)]
#[case::rename_table("SELECT a FROM events", TextEdit::new(range(14, 20), "logs"))]
#[case::break_statement("SELECT a FROM t", TextEdit::delete(range(9, 13)))]
#[case::fix_statement("SELECT a t", TextEdit::insert(TextSize::new(9), "FROM "))]
#[case::open_string("SELECT a, b FROM t", TextEdit::insert(TextSize::new(7), "'"))]
#[case::close_string("SELECT 'a, b FROM t", TextEdit::insert(TextSize::new(9), "'"))]
#[case::open_comment("SELECT a, b FROM t", TextEdit::insert(TextSize::new(10), "/*"))]
#[case::comment_out_line(
    "SELECT a\nFROM t\nWHERE x = 1",
    TextEdit::insert(TextSize::new(16), "-- ")
)]
#[case::join_identifiers("SELECT ab cd", TextEdit::delete(range(9, 10)))]
#[case::split_identifier("SELECT abcd", TextEdit::insert(TextSize::new(9), " "))]
#[case::keyword_to_identifier("SELECT a FROM t", TextEdit::insert(TextSize::new(13), "x"))]
#[case::add_statement("SELECT 1;", TextEdit::insert(TextSize::new(9), " SELECT 2"))]
#[case::replace_everything("SELECT 1", TextEdit::new(range(0, 8), "INSERT INTO t VALUES (1)"))]
#[case::delete_everything("SELECT 1 FROM t", TextEdit::delete(range(0, 15)))]
#[case::operator_after_error("SELECT a VALUES b c", TextEdit::new(range(18, 19), "IN d"))]
#[case::tokens_after_missing("SELECT 1 FROM (", TextEdit::insert(TextSize::new(15), "SELECT x ) AS y"))]
#[case::close_after_discard("SELECT f(1 +) , 2", TextEdit::insert(TextSize::new(12), " 3"))]
#[case::type_to_name(
    "CREATE TABLE t (a UInt8) ENGINE = Memory",
    TextEdit::new(range(18, 23), "UInt8, b UInt16")
)]
fn test_edit_matches_fresh_parse(#[case] text: &str, #[case] edit: TextEdit) {
    check_edit(&parse(text), &edit);
}

#[test]
fn test_old_parse_is_untouched() {
    let old = parse("SELECT a FROM t");
    let before = old.debug_tree();
    let new = old.reparse(&TextEdit::insert(TextSize::new(8), ", b"));
    assert_eq!(old.debug_tree(), before);
    assert_eq!(old.text(), "SELECT a FROM t");
    assert!(old.last_edit().is_none());
    assert_eq!(new.last_edit().unwrap().insert, ", b");
}

#[test]
fn test_chained_edits() {
    let mut current = parse("SELECT 1");
    for (offset, insert) in [(8, " FROM t"), (15, " WHERE"), (21, " a > 1"), (7, "x, ")] {
        current = check_edit(&current, &TextEdit::insert(TextSize::new(offset), insert));
    }
    assert_eq!(current.text(), "SELECT x, 1 FROM t WHERE a > 1");
    assert!(current.ok(), "{:?}", current.errors());
}

#[test]
fn test_large_document_reuses_untouched_statements() {
    let statements: Vec<String> = (0..50)
        .map(|i| format!("SELECT a{i}, b{i} FROM t{i} WHERE a{i} > {i};\n"))
        .collect();
    let text = statements.concat();
    let old = parse(&text);
    assert!(old.ok());

    let offset = statements[..25].iter().map(String::len).sum::<usize>() + 7;
    let new = check_edit(&old, &TextEdit::insert(TextSize::new(offset as u32), "x"));
    let stats = new.stats();
    assert!(stats.reused_nodes >= 40, "{stats:?}");
    assert!(stats.relexed_tokens < 10, "{stats:?}");
}

// ============================================================================
// Sweeps
// ============================================================================

#[test]
fn test_noop_edit_is_identity_everywhere() {
    for text in [SIMPLE_SELECT, INSERT_VALUES, MULTI_STATEMENT, "SELECT ( FROM"] {
        let old = parse(text);
        for offset in boundaries(text) {
            let edit = TextEdit::insert(TextSize::new(offset), "");
            assert!(edit.is_noop());
            let new = old.reparse(&edit);
            assert_same_tree(&new, &old);
        }
    }
}

#[rstest]
#[case(ANALYTICS_QUERY)]
#[case(EVENTS_TABLE)]
#[case(MULTI_STATEMENT)]
#[case("SELECT f(1 +) , 2 FROM t; SELECT 'open")]
fn test_single_character_edits_everywhere(#[case] text: &str) {
    let old = parse(text);
    for offset in boundaries(text) {
        for insert in [" ", "x", "(", ")", "'", ",", "1"] {
            check_edit(&old, &TextEdit::insert(TextSize::new(offset), insert));
        }
    }
    let offsets: Vec<u32> = boundaries(text).collect();
    for pair in offsets.windows(2) {
        check_edit(&old, &TextEdit::delete(range(pair[0], pair[1])));
    }
}

#[test]
fn test_single_character_edits_around_errors() {
    for text in MALFORMED {
        let old = parse(text);
        for offset in boundaries(text) {
            for insert in [" ", "x", ")", "IN d", "; SELECT 1"] {
                check_edit(&old, &TextEdit::insert(TextSize::new(offset), insert));
            }
        }
        let offsets: Vec<u32> = boundaries(text).collect();
        for pair in offsets.windows(2) {
            check_edit(&old, &TextEdit::delete(range(pair[0], pair[1])));
        }
    }
}

#[test]
fn test_chained_edits_after_error_region() {
    let mut current = parse("SELECT a VALUES b");
    for (offset, insert) in [(17, " c"), (19, " IN"), (22, " d"), (9, "x ")] {
        current = check_edit(&current, &TextEdit::insert(TextSize::new(offset), insert));
    }
    assert_eq!(current.text(), "SELECT a x VALUES b c IN d");
}

#[test]
fn test_multi_byte_text_edits() {
    let text = "SELECT 'héllo', `naïve` FROM t";
    let old = parse(text);
    for offset in boundaries(text) {
        check_edit(&old, &TextEdit::insert(TextSize::new(offset), "é"));
    }
}
