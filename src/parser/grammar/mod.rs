//! Grammar table for the ClickHouse parser
//!
//! The grammar is described with tree-sitter style combinators ([`rule`]),
//! flattened into plain productions ([`GrammarBuilder`]) and compiled into an
//! LALR(1) action/goto table ([`Grammar`]):
//! - `rule` - Description combinators (`seq`, `choice`, `repeat`, `prec_left`, ...)
//! - `builder` - Flattening of rule expressions into productions
//! - `lalr` - LR(0) collection and LALR(1) lookahead computation
//! - `table` - Action table with precedence-based conflict resolution
//! - `clickhouse` - The ClickHouse SQL grammar and the shared [`get_grammar`]
//!
//! Conflicts that precedence and associativity do not settle are reported by
//! [`GrammarBuilder::build`]; a built [`Grammar`] is deterministic.

mod builder;
mod clickhouse;
mod error;
mod lalr;
pub mod rule;
mod table;

use std::fmt;

use crate::parser::SyntaxKind;

pub use builder::GrammarBuilder;
pub use clickhouse::{clickhouse_grammar, get_grammar, precedence};
pub use error::{ConflictKind, GrammarError};
pub use rule::{Assoc, Rule};
pub use table::{Action, Grammar, ProductionId, StateId};

/// Index of a nonterminal in a [`Grammar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminal(pub(crate) u16);

impl NonTerminal {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A grammar symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(SyntaxKind),
    NonTerminal(NonTerminal),
}

/// A flattened production `lhs → rhs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: NonTerminal,
    pub rhs: Vec<Symbol>,
    pub precedence: i32,
    pub assoc: Assoc,
}

impl Production {
    pub fn arity(&self) -> usize {
        self.rhs.len()
    }
}

/// Metadata for a nonterminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminalInfo {
    pub name: String,
    /// Node kind produced on reduction; `None` for hidden rules
    pub kind: Option<SyntaxKind>,
    /// Generated for a `repeat`
    pub auxiliary: bool,
}

impl NonTerminalInfo {
    pub fn is_hidden(&self) -> bool {
        self.kind.is_none()
    }

    /// Name for diagnostics: `_data_type` reads as "data type".
    pub fn display_name(&self) -> String {
        match self.kind {
            Some(kind) => crate::parser::kind_to_name(kind).to_string(),
            None => self.name.trim_start_matches('_').replace('_', " "),
        }
    }
}

impl fmt::Display for NonTerminalInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
