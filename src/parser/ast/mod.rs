//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode of one kind and provides accessors for its
//! children. Accessors return `None` (or skip) where error recovery left a
//! `MISSING` or `ERROR` node instead of the expected child.
//!
//! Expressions are special: identifiers and literals are leaves spliced
//! directly into their parent, so [`Expr`] is cast from a `SyntaxElement`
//! rather than a node.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxElement, SyntaxNode, SyntaxToken};

// ============================================================================
// Helper utilities
// ============================================================================

/// Check if a syntax node has a direct child token of the specified kind.
#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// Direct child elements after the first token of `kind`
fn elements_after(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxElement> {
    node.children_with_tokens()
        .skip_while(move |e| e.as_token().is_none_or(|t| t.kind() != kind))
        .skip(1)
}

/// Direct child elements before the first token of `kind`
fn elements_before(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxElement> {
    node.children_with_tokens()
        .take_while(move |e| e.as_token().is_none_or(|t| t.kind() != kind))
}

/// Expressions among the direct children of a node
fn child_exprs(node: &SyntaxNode) -> impl Iterator<Item = Expr> {
    node.children_with_tokens().filter_map(Expr::cast_element)
}

fn first_ident(elements: impl Iterator<Item = SyntaxElement>) -> Option<Ident> {
    elements
        .filter_map(|e| e.into_token())
        .find_map(Ident::cast)
}

/// Strip the delimiters of a quoted identifier or string and undo doubled
/// delimiters inside it.
fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '`' | '"' | '\'') => {
            let doubled: String = [open, open].iter().collect();
            chars.as_str().replace(&doubled, &open.to_string())
        }
        _ => text.to_string(),
    }
}

/// Macro to generate boolean property methods that check for a specific token kind.
macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

/// Macro to generate a method that finds the first child of a specific AST type.
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

/// Macro to generate a method that returns an iterator over children of a specific AST type.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Macro to generate a method that maps token kinds to enum variants.
macro_rules! token_to_enum_method {
    ($name:ident, $enum_type:ident, [$($token:ident => $variant:ident),+ $(,)?]) => {
        pub fn $name(&self) -> Option<$enum_type> {
            for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
                match token.kind() {
                    $(SyntaxKind::$token => return Some($enum_type::$variant),)+
                    _ => {}
                }
            }
            None
        }
    };
}

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Find all descendant nodes of a specific AST type
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }

    /// Comment immediately preceding this node (separated only by whitespace).
    fn doc_comment(&self) -> Option<String> {
        extract_doc_comment(self.syntax())
    }
}

/// Extract the comment preceding a syntax node.
///
/// Consecutive `--` line comments are joined; a `/* ... */` block comment is
/// taken on its own.
pub fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut comments = Vec::new();
    let mut current = node.prev_sibling_or_token();

    while let Some(rowan::NodeOrToken::Token(t)) = current {
        match t.kind() {
            SyntaxKind::WHITESPACE => {
                // A blank line ends the comment block
                if t.text().matches('\n').count() > 1 {
                    break;
                }
            }
            SyntaxKind::BLOCK_COMMENT => {
                let content = t
                    .text()
                    .strip_prefix("/*")
                    .and_then(|s| s.strip_suffix("*/"))
                    .map(clean_doc_comment)
                    .unwrap_or_default();
                if !content.is_empty() {
                    comments.push(content);
                }
                break;
            }
            SyntaxKind::LINE_COMMENT => {
                let text = t.text();
                let content = text.strip_prefix("--").unwrap_or(text).trim();
                if !content.is_empty() {
                    comments.push(content.to_string());
                }
            }
            _ => break,
        }
        current = t.prev_sibling_or_token();
    }

    if comments.is_empty() {
        return None;
    }

    // Reverse because we collected bottom-up
    comments.reverse();
    Some(comments.join("\n"))
}

/// Clean up comment content by removing leading asterisks and normalizing whitespace.
fn clean_doc_comment(s: &str) -> String {
    s.lines()
        .map(|line| {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('*') {
                rest.trim_start().to_string()
            } else {
                trimmed.to_string()
            }
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trait for AST tokens that wrap a SyntaxToken
pub trait AstToken: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(token: SyntaxToken) -> Option<Self>;
    fn syntax(&self) -> &SyntaxToken;
    fn text(&self) -> &str {
        self.syntax().text()
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! ast_token {
    ($name:ident, [$($kind:ident),+ $(,)?]) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxToken);

        impl AstToken for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(token: SyntaxToken) -> Option<Self> {
                if Self::can_cast(token.kind()) {
                    Some(Self(token))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxToken {
                &self.0
            }
        }
    };
}

// ============================================================================
// Tokens
// ============================================================================

ast_token!(Ident, [IDENT, QUOTED_IDENT]);

impl Ident {
    /// The identifier without backticks or double quotes
    pub fn name(&self) -> String {
        unquote(self.0.text())
    }
}

// Declared after the macros so they are in scope
mod definitions;
mod expressions;
mod statements;

pub use self::definitions::*;
pub use self::expressions::*;
pub use self::statements::*;
