//! Grammar description combinators
//!
//! Rules are written as nested values and flattened into plain productions by
//! [`GrammarBuilder`](super::GrammarBuilder):
//!
//! ```ignore
//! g.node(SyntaxKind::WHERE_CLAUSE, seq([token(WHERE_KW), sym("_expression")]));
//! ```

use crate::parser::SyntaxKind;

/// Associativity used to break shift/reduce ties at equal precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Assoc {
    /// No associativity: an equal-precedence tie is a grammar conflict
    #[default]
    None,
    /// Reduce on ties (`a - b - c` is `(a - b) - c`)
    Left,
    /// Shift on ties (`a -> b -> c` is `a -> (b -> c)`)
    Right,
    /// Ties are a parse error
    NonAssoc,
}

/// A grammar rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A terminal
    Token(SyntaxKind),
    /// A visible nonterminal, producing a node of this kind
    Node(SyntaxKind),
    /// A hidden nonterminal, whose children are spliced into the parent
    Hidden(&'static str),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    Optional(Box<Rule>),
    Repeat(Box<Rule>),
    Repeat1(Box<Rule>),
    Prec {
        level: i32,
        assoc: Assoc,
        rule: Box<Rule>,
    },
}

pub fn token(kind: SyntaxKind) -> Rule {
    Rule::Token(kind)
}

/// Reference to a visible rule
pub fn node(kind: SyntaxKind) -> Rule {
    Rule::Node(kind)
}

/// Reference to a hidden rule
pub fn sym(name: &'static str) -> Rule {
    Rule::Hidden(name)
}

pub fn seq(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(rules.into_iter().collect())
}

pub fn choice(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice(rules.into_iter().collect())
}

pub fn optional(rule: Rule) -> Rule {
    Rule::Optional(Box::new(rule))
}

pub fn repeat(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn repeat1(rule: Rule) -> Rule {
    Rule::Repeat1(Box::new(rule))
}

/// `rule (, rule)*`
pub fn comma_sep1(rule: Rule) -> Rule {
    seq([rule.clone(), repeat(seq([token(SyntaxKind::COMMA), rule]))])
}

/// `[rule (, rule)*]`
pub fn comma_sep(rule: Rule) -> Rule {
    optional(comma_sep1(rule))
}

pub fn prec(level: i32, rule: Rule) -> Rule {
    Rule::Prec {
        level,
        assoc: Assoc::None,
        rule: Box::new(rule),
    }
}

pub fn prec_left(level: i32, rule: Rule) -> Rule {
    Rule::Prec {
        level,
        assoc: Assoc::Left,
        rule: Box::new(rule),
    }
}

pub fn prec_right(level: i32, rule: Rule) -> Rule {
    Rule::Prec {
        level,
        assoc: Assoc::Right,
        rule: Box::new(rule),
    }
}

pub fn prec_nonassoc(level: i32, rule: Rule) -> Rule {
    Rule::Prec {
        level,
        assoc: Assoc::NonAssoc,
        rule: Box::new(rule),
    }
}
