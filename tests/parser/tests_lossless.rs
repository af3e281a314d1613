//! Losslessness and coverage over arbitrary input
//!
//! Whatever the input, the tree's leaves spell it back exactly and every
//! node's children tile its range.

#![allow(clippy::unwrap_used)]

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::*;
use chsyntax::parser::SyntaxKind::*;
use chsyntax::parser::{DoubleQuotes, LexMode, tokenize, tokenize_with_mode};
use chsyntax::{LineIndex, ParseOptions, Position, get_grammar, parse, parse_batch};
use rstest::rstest;

#[rstest]
#[case(SIMPLE_SELECT)]
#[case(ANALYTICS_QUERY)]
#[case(EVENTS_TABLE)]
#[case(INSERT_VALUES)]
#[case(MULTI_STATEMENT)]
fn test_fixtures_are_lossless(#[case] text: &str) {
    let parse = parse(text);
    assert!(parse.ok(), "{:?}", parse.errors());
    assert_well_formed(&parse);
}

#[rstest]
#[case("\0")]
#[case("SELECT\r\n1\r\n")]
#[case("SELECT 'ünïcödé', `名前` FROM t")]
#[case("SELECT 🦀")]
#[case("''''")]
#[case("$$")]
#[case("/* /* nested */")]
#[case("SELECT 1 -- trailing")]
#[case("\u{feff}SELECT 1")]
#[case("((((((((")]
#[case(";;;;")]
#[case("SELECT SELECT SELECT")]
fn test_odd_input_is_lossless(#[case] text: &str) {
    assert_well_formed(&parse(text));
}

#[test]
fn test_malformed_input_is_lossless() {
    for text in MALFORMED {
        assert_well_formed(&parse(text));
    }
}

#[test]
fn test_every_prefix_is_lossless() {
    for text in [ANALYTICS_QUERY, EVENTS_TABLE] {
        for end in (0..=text.len()).filter(|&end| text.is_char_boundary(end)) {
            assert_well_formed(&parse(&text[..end]));
        }
    }
}

#[rstest]
#[case(EVENTS_TABLE)]
#[case("SELECT 'open\n\u{1}€ /* x")]
fn test_tokens_tile_the_input(#[case] text: &str) {
    let tokens = tokenize(text);
    let joined: String = tokens.iter().map(|token| token.text).collect();
    assert_eq!(joined, text);
    for pair in tokens.windows(2) {
        assert_eq!(pair[0].range().end(), pair[1].offset);
    }
}

#[test]
fn test_lexer_reads_heredocs_and_nested_comments() {
    let kinds: Vec<_> = tokenize("$q$ it's $$ $q$ /* a /* b */ c */")
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(kinds, vec![STRING, WHITESPACE, BLOCK_COMMENT]);
}

#[rstest]
#[case(DoubleQuotes::String, STRING)]
#[case(DoubleQuotes::Identifier, QUOTED_IDENT)]
fn test_double_quote_mode(#[case] double_quotes: DoubleQuotes, #[case] kind: chsyntax::SyntaxKind) {
    let mode = LexMode { double_quotes };
    let tokens = tokenize_with_mode("\"a b\"", mode);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, kind);

    let parse = get_grammar().parse_with("SELECT \"a b\" FROM t", ParseOptions { double_quotes });
    assert!(parse.ok(), "{:?}", parse.errors());
    assert_well_formed(&parse);
    assert_eq!(parse.options().double_quotes, double_quotes);
}

#[test]
fn test_batch_keeps_input_order() {
    let texts = [SIMPLE_SELECT, "SELECT (", EVENTS_TABLE, "", INSERT_VALUES];
    let parses = parse_batch(&texts);
    assert_eq!(parses.len(), texts.len());
    for (parse, text) in parses.iter().zip(texts) {
        assert_eq!(parse.text(), text);
        assert_same_tree(parse, &chsyntax::parse(text));
    }
}

#[test]
fn test_error_positions_through_line_index() {
    let text = "SELECT a\nFROM t\nWHERE";
    let parse = parse(text);
    let index = LineIndex::new(text);
    let error = &parse.errors()[0];
    assert_eq!(index.position(error.range.start()), Position::new(2, 5));
}
