//! Table-driven incremental parser for ClickHouse SQL
//!
//! This module provides a lossless, incremental parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//! - an LALR(1) table generated from a declarative grammar
//!
//! Every byte of the input ends up in exactly one leaf of the tree, including
//! whitespace, comments, and material the parser could not place.
//!
//! ## Architecture
//!
//! ```text
//! Grammar rules (grammar::clickhouse)
//!     ↓
//! LALR(1) generator → action/goto tables (built once, shared)
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parse engine → GreenNode tree + SyntaxErrors (never fails)
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, [`Parse::reparse`]:
//! 1. Relexes a bounded window around the edit, keeping tokens on both sides
//! 2. Reruns the engine, grafting old subtrees wherever the parser state and
//!    lookahead prove they would be rebuilt identically
//! 3. Shares untouched green nodes and tokens with the old tree

#[allow(clippy::module_inception)]
mod parser;

mod incremental;
mod lexer;
mod syntax_kind;

pub mod ast;
pub mod errors;
pub mod grammar;
pub mod keywords;

pub use errors::{ErrorCode, SyntaxError};
pub use grammar::{Grammar, get_grammar};
pub use incremental::{ReuseStats, TextEdit};
pub use lexer::{DoubleQuotes, LexMode, Lexer, Token, tokenize, tokenize_with_mode};
pub use parser::{LexedToken, Parse, ParseOptions, parse, parse_batch};
pub use syntax_kind::{
    ClickHouseLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxNodeExt,
    SyntaxToken, kind_to_name,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
