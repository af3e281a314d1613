//! # clickhouse-syntax
//!
//! Lossless, incremental syntax analysis for the ClickHouse SQL dialect.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! parser    → Grammar tables, logos lexer, parse engine, incremental reuse, AST views
//!   ↓
//! base      → Primitives (TextRange, LineIndex)
//! ```
//!
//! ## Example
//!
//! ```
//! use chsyntax::{TextEdit, TextSize, parse};
//!
//! let old = parse("SELECT a FROM t");
//! assert!(old.ok());
//!
//! let edit = TextEdit::insert(TextSize::new(8), ", b");
//! let new = old.reparse(&edit);
//! assert_eq!(new.text(), "SELECT a, b FROM t");
//! assert_eq!(new.syntax().to_string(), new.text());
//! ```

// ============================================================================
// MODULES (dependency order: base → parser)
// ============================================================================

/// Foundation types: TextRange, LineIndex
pub mod base;

/// Parser: grammar tables, logos lexer, parse engine, incremental reparsing
pub mod parser;

// Re-export commonly needed items
pub use parser::keywords;
pub use parser::{
    ErrorCode, Grammar, Parse, ParseOptions, SyntaxError, SyntaxKind, SyntaxNode, TextEdit,
    get_grammar, parse, parse_batch,
};

// Re-export foundation types
pub use base::{LineIndex, Position, Span, TextRange, TextSize};
