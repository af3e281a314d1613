//! Structural assertions over parse results.

use chsyntax::parser::{SyntaxElement, SyntaxKind, SyntaxNode};
use chsyntax::{Parse, TextRange};

/// Concatenated leaf text equals the source text.
pub fn assert_lossless(parse: &Parse) {
    let leaves: String = parse
        .syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .map(|token| token.text().to_string())
        .collect();
    assert_eq!(leaves, parse.text(), "leaves do not reconstruct the input");
}

/// Every node's children tile its range with no gaps or overlaps.
pub fn assert_spans_cover(root: &SyntaxNode) {
    for node in root.descendants() {
        let range = node.text_range();
        let mut cursor = range.start();
        for child in node.children_with_tokens() {
            let child_range = child.text_range();
            assert_eq!(
                child_range.start(),
                cursor,
                "gap or overlap before {:?} in {:?}",
                child.kind(),
                node.kind()
            );
            cursor = child_range.end();
        }
        assert_eq!(cursor, range.end(), "children of {:?} stop short", node.kind());
    }
}

/// Both invariants at once, plus diagnostics within bounds and ordered.
pub fn assert_well_formed(parse: &Parse) {
    assert_lossless(parse);
    assert_spans_cover(&parse.syntax());
    let len = TextRange::up_to(parse.syntax().text_range().end());
    let mut previous = None;
    for error in parse.errors() {
        assert!(len.contains_range(error.range), "{error:?} outside input");
        if let Some(previous) = previous {
            assert!(previous <= error.range.start(), "errors out of order");
        }
        previous = Some(error.range.start());
    }
}

/// A fresh parse and a reparse agree on every node and token.
pub fn assert_same_tree(actual: &Parse, expected: &Parse) {
    assert_eq!(
        actual.debug_tree(),
        expected.debug_tree(),
        "trees differ for {:?}",
        expected.text()
    );
    let codes = |parse: &Parse| {
        parse
            .errors()
            .iter()
            .map(|error| (error.code, error.range))
            .collect::<Vec<_>>()
    };
    assert_eq!(codes(actual), codes(expected), "diagnostics differ");
}

pub fn find_node(root: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    root.descendants().find(|node| node.kind() == kind)
}

pub fn child_kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.children().map(|child| child.kind()).collect()
}

/// Kinds and texts of the non-trivia leaves
pub fn significant_tokens(root: &SyntaxNode) -> Vec<(SyntaxKind, String)> {
    root.descendants_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .filter(|token| !token.kind().is_trivia())
        .map(|token| (token.kind(), token.text().to_string()))
        .collect()
}
