//! LALR(1) action and goto tables
//!
//! Conflicts are settled the way yacc and tree-sitter settle them:
//! - reduce/reduce: the production with the higher precedence wins
//! - shift/reduce: compare the reduce production's precedence with the
//!   highest precedence among the productions that shift the terminal; on a
//!   tie the reduce production's associativity decides (left reduces, right
//!   shifts, non-associative is an error action)
//!
//! Anything else is reported as [`GrammarError::Conflict`].

use tracing::{info, trace};

use super::builder::FlatGrammar;
use super::error::{ConflictKind, GrammarError};
use super::lalr::{Analysis, TermSet};
use super::rule::Assoc;
use super::{NonTerminal, NonTerminalInfo, Production, Symbol};
use crate::parser::SyntaxKind;
use crate::parser::syntax_kind::TOKEN_KIND_COUNT;

/// Automaton state index; state 0 is the start state
pub type StateId = u32;

/// Index into [`Grammar::production`]
pub type ProductionId = u32;

const NO_STATE: u32 = u32::MAX;

/// Parser action for a (state, terminal) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
    Error,
}

/// A compiled grammar: immutable, shareable across threads
#[derive(Debug, Clone)]
pub struct Grammar {
    name: &'static str,
    nonterminals: Vec<NonTerminalInfo>,
    productions: Vec<Production>,
    /// `state * TOKEN_KIND_COUNT + terminal`
    actions: Vec<Action>,
    /// `state * nonterminal count + nonterminal`
    gotos: Vec<u32>,
    /// Nonterminal producing each node kind
    node_rules: Vec<Option<NonTerminal>>,
    /// Nonterminal named in "expected ..." messages, per state
    expected: Vec<Option<NonTerminal>>,
    state_count: usize,
}

impl Grammar {
    pub(crate) fn generate(name: &'static str, flat: FlatGrammar) -> Result<Grammar, GrammarError> {
        let analysis = Analysis::new(&flat);
        let states = analysis.lr0_states();
        let lookaheads = analysis.lalr_lookaheads(&states);
        let nonterminal_count = flat.nonterminals.len();

        let mut actions = vec![Action::Error; states.len() * TOKEN_KIND_COUNT];
        let mut gotos = vec![NO_STATE; states.len() * nonterminal_count];
        let mut expected = Vec::with_capacity(states.len());

        for (s, state) in states.iter().enumerate() {
            let seeds = state
                .kernel
                .iter()
                .copied()
                .zip(lookaheads[s].iter().cloned())
                .collect();
            let closure = analysis.closure1(seeds);

            let mut shift_prec: Vec<Option<i32>> = vec![None; TOKEN_KIND_COUNT];
            let mut reduces: Vec<Vec<usize>> = vec![Vec::new(); TOKEN_KIND_COUNT];
            for (item, lookahead) in &closure {
                let production = &flat.productions[item.production as usize];
                match production.rhs.get(item.dot as usize) {
                    Some(&Symbol::Terminal(kind)) => {
                        let slot = &mut shift_prec[kind as usize];
                        *slot = Some(slot.map_or(production.precedence, |p| p.max(production.precedence)));
                    }
                    Some(Symbol::NonTerminal(_)) => {}
                    None => {
                        for terminal in lookahead.terminals() {
                            if !reduces[terminal].contains(&(item.production as usize)) {
                                reduces[terminal].push(item.production as usize);
                            }
                        }
                    }
                }
            }

            for terminal in 0..TOKEN_KIND_COUNT {
                let kind = SyntaxKind::from(rowan::SyntaxKind(terminal as u16));
                let shift = state.transition(Symbol::Terminal(kind));
                let action = resolve(
                    &flat,
                    s,
                    kind,
                    shift.map(|target| (target, shift_prec[terminal].unwrap_or(0))),
                    &reduces[terminal],
                )?;
                actions[s * TOKEN_KIND_COUNT + terminal] = action;
            }

            for &(symbol, target) in &state.transitions {
                if let Symbol::NonTerminal(nt) = symbol {
                    gotos[s * nonterminal_count + nt.index()] = target as u32;
                }
            }

            expected.push(expected_nonterminal(&flat, &analysis, &closure));
        }

        let mut node_rules = vec![None; SyntaxKind::__LAST as usize];
        for (index, info) in flat.nonterminals.iter().enumerate() {
            if let Some(kind) = info.kind {
                node_rules[kind as usize] = Some(NonTerminal(index as u16));
            }
        }

        info!(
            grammar = name,
            states = states.len(),
            productions = flat.productions.len(),
            "generated LALR(1) table"
        );

        Ok(Grammar {
            name,
            nonterminals: flat.nonterminals,
            productions: flat.productions,
            actions,
            gotos,
            node_rules,
            expected,
            state_count: states.len(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    /// Action for a terminal in a state. Node kinds and out-of-range states
    /// yield [`Action::Error`].
    pub fn action(&self, state: StateId, terminal: SyntaxKind) -> Action {
        let terminal = terminal as usize;
        if terminal >= TOKEN_KIND_COUNT {
            return Action::Error;
        }
        self.actions
            .get(state as usize * TOKEN_KIND_COUNT + terminal)
            .copied()
            .unwrap_or(Action::Error)
    }

    pub fn goto(&self, state: StateId, nonterminal: NonTerminal) -> Option<StateId> {
        let target = *self
            .gotos
            .get(state as usize * self.nonterminals.len() + nonterminal.index())?;
        (target != NO_STATE).then_some(target)
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id as usize]
    }

    /// Node kind built when reducing a production; `None` splices the children
    pub fn production_kind(&self, id: ProductionId) -> Option<SyntaxKind> {
        self.nonterminal(self.production(id).lhs).kind
    }

    pub fn nonterminal(&self, nonterminal: NonTerminal) -> &NonTerminalInfo {
        &self.nonterminals[nonterminal.index()]
    }

    /// The nonterminal whose reduction produces nodes of `kind`
    pub fn nonterminal_for_kind(&self, kind: SyntaxKind) -> Option<NonTerminal> {
        self.node_rules.get(kind as usize).copied().flatten()
    }

    /// The kind of the start rule's node
    pub fn root_kind(&self) -> Option<SyntaxKind> {
        self.nonterminals.first().and_then(|info| info.kind)
    }

    /// Terminals with a non-error action in `state`
    pub fn expected_terminals(&self, state: StateId) -> Vec<SyntaxKind> {
        (0..TOKEN_KIND_COUNT)
            .map(|terminal| SyntaxKind::from(rowan::SyntaxKind(terminal as u16)))
            .filter(|&kind| self.action(state, kind) != Action::Error)
            .collect()
    }

    /// What `state` is waiting for, e.g. "expression"
    pub fn expected_description(&self, state: StateId) -> Option<String> {
        let nonterminal = (*self.expected.get(state as usize)?)?;
        Some(self.nonterminal(nonterminal).display_name())
    }
}

/// Pick one action for `terminal`, or report the conflict.
fn resolve(
    flat: &FlatGrammar,
    state: usize,
    terminal: SyntaxKind,
    shift: Option<(usize, i32)>,
    reduces: &[usize],
) -> Result<Action, GrammarError> {
    let conflict = |kind, productions: Vec<String>| GrammarError::Conflict {
        kind,
        state: state as u32,
        lookahead: crate::parser::kind_to_name(terminal).to_string(),
        productions,
    };

    let reduce = match reduces {
        [] => None,
        [single] => Some(*single),
        many => {
            let best = many
                .iter()
                .copied()
                .max_by_key(|&id| flat.productions[id].precedence)
                .unwrap_or(many[0]);
            let best_prec = flat.productions[best].precedence;
            let tied: Vec<usize> = many
                .iter()
                .copied()
                .filter(|&id| flat.productions[id].precedence == best_prec)
                .collect();
            if tied.len() > 1 {
                return Err(conflict(
                    ConflictKind::ReduceReduce,
                    tied.iter().map(|&id| flat.describe_production(id)).collect(),
                ));
            }
            trace!(state, ?terminal, "reduce/reduce settled by precedence");
            Some(best)
        }
    };

    let reduce_action = |id: usize| {
        if id == 0 {
            Action::Accept
        } else {
            Action::Reduce(id as ProductionId)
        }
    };

    Ok(match (shift, reduce) {
        (None, None) => Action::Error,
        (Some((target, _)), None) => Action::Shift(target as StateId),
        (None, Some(id)) => reduce_action(id),
        (Some((target, shift_prec)), Some(id)) => {
            let production = &flat.productions[id];
            if production.precedence > shift_prec {
                reduce_action(id)
            } else if production.precedence < shift_prec {
                Action::Shift(target as StateId)
            } else {
                match production.assoc {
                    Assoc::Left => reduce_action(id),
                    Assoc::Right => Action::Shift(target as StateId),
                    Assoc::NonAssoc => Action::Error,
                    Assoc::None => {
                        return Err(conflict(
                            ConflictKind::ShiftReduce,
                            vec![
                                format!("shift {}", crate::parser::kind_to_name(terminal)),
                                flat.describe_production(id),
                            ],
                        ));
                    }
                }
            }
        }
    })
}

/// A category name for "missing ..." messages: hidden rules (such as
/// `_expression`) are preferred over visible ones, auxiliary rules never named.
fn expected_nonterminal(
    flat: &FlatGrammar,
    analysis: &Analysis<'_>,
    closure: &[(super::lalr::Item, TermSet)],
) -> Option<NonTerminal> {
    let mut visible = None;
    for (item, _) in closure {
        let Some(Symbol::NonTerminal(nt)) = analysis.next_symbol(*item) else {
            continue;
        };
        let info = &flat.nonterminals[nt.index()];
        if info.auxiliary {
            continue;
        }
        if info.is_hidden() {
            return Some(nt);
        }
        visible.get_or_insert(nt);
    }
    visible
}
