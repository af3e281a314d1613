//! Errors raised while generating parse tables

use std::fmt;
use thiserror::Error;

use crate::parser::SyntaxKind;

/// Kind of an unresolved LR conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShiftReduce => f.write_str("shift/reduce"),
            Self::ReduceReduce => f.write_str("reduce/reduce"),
        }
    }
}

/// Errors that can occur while building a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The builder holds no rules, so there is no start symbol.
    #[error("grammar `{0}` has no rules")]
    Empty(&'static str),

    /// A rule refers to a nonterminal that is never defined.
    #[error("rule `{0}` is referenced but never defined")]
    Undefined(String),

    /// Two rules share a name.
    #[error("rule `{0}` is defined more than once")]
    Duplicate(String),

    /// A syntax kind was used in a role it cannot play.
    #[error("{kind:?} cannot be used as a {role}")]
    InvalidKind { kind: SyntaxKind, role: &'static str },

    /// The automaton has an action conflict that precedence does not settle.
    #[error(
        "unresolved {kind} conflict in state {state} on {lookahead}: {}",
        .productions.join(" | ")
    )]
    Conflict {
        kind: ConflictKind,
        state: u32,
        lookahead: String,
        productions: Vec<String>,
    },
}

impl GrammarError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
