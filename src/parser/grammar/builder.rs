//! Flattening of rule expressions into productions
//!
//! - `choice` and `optional` expand into one production per alternative
//!   (cross product across a `seq`)
//! - `repeat`/`repeat1` become hidden left-recursive auxiliary nonterminals
//!   (`aux → aux body | body`)
//! - `prec*` annotations attach to every production generated inside them

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::error::GrammarError;
use super::rule::{Assoc, Rule};
use super::table::Grammar;
use super::{NonTerminal, NonTerminalInfo, Production, Symbol};
use crate::parser::SyntaxKind;

/// Name under which a rule is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RuleName {
    Node(SyntaxKind),
    Hidden(&'static str),
}

impl RuleName {
    fn describe(self) -> String {
        match self {
            Self::Node(kind) => format!("{kind:?}").to_lowercase(),
            Self::Hidden(name) => name.to_string(),
        }
    }
}

/// Collects rule definitions and compiles them into a [`Grammar`]
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: &'static str,
    rules: Vec<(RuleName, Rule)>,
}

/// Productions and nonterminals after flattening.
///
/// Production 0 is the augmented start production `__start → start`.
#[derive(Debug, Clone)]
pub(crate) struct FlatGrammar {
    pub nonterminals: Vec<NonTerminalInfo>,
    pub productions: Vec<Production>,
}

impl FlatGrammar {
    pub fn productions_of(&self) -> Vec<Vec<usize>> {
        let mut by_lhs = vec![Vec::new(); self.nonterminals.len()];
        for (id, production) in self.productions.iter().enumerate() {
            by_lhs[production.lhs.index()].push(id);
        }
        by_lhs
    }

    pub fn symbol_name(&self, symbol: Symbol) -> String {
        match symbol {
            Symbol::Terminal(kind) => crate::parser::kind_to_name(kind).to_string(),
            Symbol::NonTerminal(nt) => self.nonterminals[nt.index()].name.clone(),
        }
    }

    pub fn describe_production(&self, id: usize) -> String {
        let production = &self.productions[id];
        let mut text = format!("{} →", self.nonterminals[production.lhs.index()].name);
        if production.rhs.is_empty() {
            text.push_str(" ε");
        }
        for &symbol in &production.rhs {
            text.push(' ');
            text.push_str(&self.symbol_name(symbol));
        }
        text
    }
}

impl GrammarBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Define a visible rule. The first rule defined is the start symbol.
    pub fn node(&mut self, kind: SyntaxKind, rule: Rule) -> &mut Self {
        self.rules.push((RuleName::Node(kind), rule));
        self
    }

    /// Define a hidden rule (conventionally named with a leading `_`).
    pub fn hidden(&mut self, name: &'static str, rule: Rule) -> &mut Self {
        self.rules.push((RuleName::Hidden(name), rule));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Flatten the rules and generate the LALR(1) table.
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        let flat = self.flatten()?;
        debug!(
            grammar = self.name,
            nonterminals = flat.nonterminals.len(),
            productions = flat.productions.len(),
            "flattened grammar"
        );
        Grammar::generate(self.name, flat)
    }

    pub(crate) fn flatten(&self) -> Result<FlatGrammar, GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::Empty(self.name));
        }

        let mut flattener = Flattener::default();
        for &(name, _) in &self.rules {
            if let RuleName::Node(kind) = name {
                if kind.is_token() || matches!(kind, SyntaxKind::ERROR | SyntaxKind::MISSING) {
                    return Err(GrammarError::InvalidKind {
                        kind,
                        role: "node rule",
                    });
                }
            }
            if flattener.ids.contains_key(&name) {
                return Err(GrammarError::Duplicate(name.describe()));
            }
            let id = flattener.add_nonterminal(NonTerminalInfo {
                name: name.describe(),
                kind: match name {
                    RuleName::Node(kind) => Some(kind),
                    RuleName::Hidden(_) => None,
                },
                auxiliary: false,
            });
            flattener.ids.insert(name, id);
        }

        let start = NonTerminal(0);
        let augmented = flattener.add_nonterminal(NonTerminalInfo {
            name: "__start".to_string(),
            kind: None,
            auxiliary: true,
        });
        flattener.productions.push(Production {
            lhs: augmented,
            rhs: vec![Symbol::NonTerminal(start)],
            precedence: 0,
            assoc: Assoc::None,
        });

        for (index, (name, rule)) in self.rules.iter().enumerate() {
            let lhs = NonTerminal(index as u16);
            let owner = name.describe();
            for alternative in flattener.alternatives(rule, &owner)? {
                flattener.add_production(lhs, alternative);
            }
        }

        Ok(FlatGrammar {
            nonterminals: flattener.nonterminals,
            productions: flattener.productions,
        })
    }
}

#[derive(Debug, Clone, Default)]
struct Alternative {
    symbols: Vec<Symbol>,
    prec: Option<(i32, Assoc)>,
}

#[derive(Default)]
struct Flattener {
    ids: FxHashMap<RuleName, NonTerminal>,
    nonterminals: Vec<NonTerminalInfo>,
    productions: Vec<Production>,
    seen: FxHashSet<(NonTerminal, Vec<Symbol>)>,
    repeat_counts: FxHashMap<String, usize>,
}

impl Flattener {
    fn add_nonterminal(&mut self, info: NonTerminalInfo) -> NonTerminal {
        let id = NonTerminal(self.nonterminals.len() as u16);
        self.nonterminals.push(info);
        id
    }

    fn add_production(&mut self, lhs: NonTerminal, alternative: Alternative) {
        // Nested optionals can generate the same production twice.
        if !self.seen.insert((lhs, alternative.symbols.clone())) {
            return;
        }
        let (precedence, assoc) = alternative.prec.unwrap_or((0, Assoc::None));
        self.productions.push(Production {
            lhs,
            rhs: alternative.symbols,
            precedence,
            assoc,
        });
    }

    fn lookup(&self, name: RuleName) -> Result<NonTerminal, GrammarError> {
        self.ids
            .get(&name)
            .copied()
            .ok_or_else(|| GrammarError::Undefined(name.describe()))
    }

    fn alternatives(&mut self, rule: &Rule, owner: &str) -> Result<Vec<Alternative>, GrammarError> {
        let single = |symbol| {
            vec![Alternative {
                symbols: vec![symbol],
                prec: None,
            }]
        };
        Ok(match rule {
            Rule::Token(kind) => {
                if !kind.is_token() || *kind == SyntaxKind::EOF {
                    return Err(GrammarError::InvalidKind {
                        kind: *kind,
                        role: "terminal",
                    });
                }
                single(Symbol::Terminal(*kind))
            }
            Rule::Node(kind) => single(Symbol::NonTerminal(self.lookup(RuleName::Node(*kind))?)),
            Rule::Hidden(name) => single(Symbol::NonTerminal(self.lookup(RuleName::Hidden(*name))?)),
            Rule::Seq(parts) => {
                let mut result = vec![Alternative::default()];
                for part in parts {
                    let tails = self.alternatives(part, owner)?;
                    let mut next = Vec::with_capacity(result.len() * tails.len());
                    for head in &result {
                        for tail in &tails {
                            let mut symbols = head.symbols.clone();
                            symbols.extend_from_slice(&tail.symbols);
                            next.push(Alternative {
                                symbols,
                                prec: head.prec.or(tail.prec),
                            });
                        }
                    }
                    result = next;
                }
                result
            }
            Rule::Choice(options) => {
                let mut result = Vec::new();
                for option in options {
                    result.extend(self.alternatives(option, owner)?);
                }
                result
            }
            Rule::Optional(inner) => {
                let mut result = vec![Alternative::default()];
                result.extend(self.alternatives(inner, owner)?);
                result
            }
            Rule::Repeat(inner) => {
                let aux = self.repeat_nonterminal(inner, owner)?;
                let mut result = vec![Alternative::default()];
                result.extend(single(Symbol::NonTerminal(aux)));
                result
            }
            Rule::Repeat1(inner) => single(Symbol::NonTerminal(self.repeat_nonterminal(inner, owner)?)),
            Rule::Prec { level, assoc, rule } => {
                let mut result = self.alternatives(rule, owner)?;
                for alternative in &mut result {
                    alternative.prec = Some((*level, *assoc));
                }
                result
            }
        })
    }

    /// `aux → aux body | body` for each non-empty alternative of `body`
    fn repeat_nonterminal(&mut self, body: &Rule, owner: &str) -> Result<NonTerminal, GrammarError> {
        let count = self.repeat_counts.entry(owner.to_string()).or_insert(0);
        *count += 1;
        let name = format!("{owner}_repeat{count}");
        let aux = self.add_nonterminal(NonTerminalInfo {
            name,
            kind: None,
            auxiliary: true,
        });

        for alternative in self.alternatives(body, owner)? {
            if alternative.symbols.is_empty() {
                continue;
            }
            let mut recursive = vec![Symbol::NonTerminal(aux)];
            recursive.extend_from_slice(&alternative.symbols);
            self.add_production(
                aux,
                Alternative {
                    symbols: recursive,
                    prec: alternative.prec,
                },
            );
            self.add_production(aux, alternative);
        }
        Ok(aux)
    }
}
