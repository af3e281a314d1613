//! LR(0) canonical collection and LALR(1) lookaheads
//!
//! Lookaheads are computed by spontaneous generation and propagation over the
//! kernel items of the LR(0) states (the "efficient construction" of LALR
//! tables). A reserved terminal index marks propagated lookaheads.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use super::builder::FlatGrammar;
use super::{NonTerminal, Symbol};
use crate::parser::SyntaxKind;
use crate::parser::syntax_kind::TOKEN_KIND_COUNT;

/// Marker for "lookahead of the item this closure was seeded from"
const PROPAGATE: usize = TOKEN_KIND_COUNT;
const TERM_BITS: usize = TOKEN_KIND_COUNT + 1;

/// Fixed-size set of terminal indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TermSet {
    words: Vec<u64>,
}

impl TermSet {
    pub fn new() -> Self {
        Self {
            words: vec![0; TERM_BITS.div_ceil(64)],
        }
    }

    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = (index / 64, 1u64 << (index % 64));
        let added = self.words[word] & bit == 0;
        self.words[word] |= bit;
        added
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Returns whether anything was added
    pub fn union_with(&mut self, other: &TermSet) -> bool {
        let mut changed = false;
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            let merged = *mine | *theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..TERM_BITS).filter(|&index| self.contains(index))
    }

    /// Terminals only, without the propagation marker
    pub fn terminals(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().filter(|&index| index != PROPAGATE)
    }
}

/// `production` with the dot before `rhs[dot]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Item {
    pub production: u32,
    pub dot: u32,
}

impl Item {
    fn advance(self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Lr0State {
    /// Sorted kernel items
    pub kernel: Vec<Item>,
    pub transitions: Vec<(Symbol, usize)>,
}

impl Lr0State {
    pub fn transition(&self, symbol: Symbol) -> Option<usize> {
        self.transitions
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|&(_, target)| target)
    }
}

/// FIRST/nullable analysis over a flattened grammar
pub(crate) struct Analysis<'g> {
    pub grammar: &'g FlatGrammar,
    by_lhs: Vec<Vec<usize>>,
    nullable: Vec<bool>,
    first: Vec<TermSet>,
}

impl<'g> Analysis<'g> {
    pub fn new(grammar: &'g FlatGrammar) -> Self {
        let count = grammar.nonterminals.len();
        let mut nullable = vec![false; count];
        let mut first = vec![TermSet::new(); count];

        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let lhs = production.lhs.index();
                let mut all_nullable = true;
                for &symbol in &production.rhs {
                    match symbol {
                        Symbol::Terminal(kind) => {
                            changed |= first[lhs].insert(kind as usize);
                            all_nullable = false;
                        }
                        Symbol::NonTerminal(nt) => {
                            if nt.index() != lhs {
                                let other = first[nt.index()].clone();
                                changed |= first[lhs].union_with(&other);
                            }
                            if !nullable[nt.index()] {
                                all_nullable = false;
                            }
                        }
                    }
                    if !all_nullable {
                        break;
                    }
                }
                if all_nullable && !nullable[lhs] {
                    nullable[lhs] = true;
                    changed = true;
                }
            }
        }

        Self {
            grammar,
            by_lhs: grammar.productions_of(),
            nullable,
            first,
        }
    }

    pub fn is_nullable(&self, nt: NonTerminal) -> bool {
        self.nullable[nt.index()]
    }

    pub fn next_symbol(&self, item: Item) -> Option<Symbol> {
        self.grammar.productions[item.production as usize]
            .rhs
            .get(item.dot as usize)
            .copied()
    }

    /// FIRST(symbols · follow)
    fn first_of(&self, symbols: &[Symbol], follow: &TermSet) -> TermSet {
        let mut result = TermSet::new();
        for &symbol in symbols {
            match symbol {
                Symbol::Terminal(kind) => {
                    result.insert(kind as usize);
                    return result;
                }
                Symbol::NonTerminal(nt) => {
                    result.union_with(&self.first[nt.index()]);
                    if !self.is_nullable(nt) {
                        return result;
                    }
                }
            }
        }
        result.union_with(follow);
        result
    }

    fn closure0(&self, kernel: &[Item]) -> Vec<Item> {
        let mut items = kernel.to_vec();
        let mut expanded = vec![false; self.grammar.nonterminals.len()];
        let mut i = 0;
        while i < items.len() {
            if let Some(Symbol::NonTerminal(nt)) = self.next_symbol(items[i]) {
                if !expanded[nt.index()] {
                    expanded[nt.index()] = true;
                    for &production in &self.by_lhs[nt.index()] {
                        items.push(Item {
                            production: production as u32,
                            dot: 0,
                        });
                    }
                }
            }
            i += 1;
        }
        items
    }

    /// LR(1) closure over lookahead sets
    pub fn closure1(&self, seeds: Vec<(Item, TermSet)>) -> Vec<(Item, TermSet)> {
        let mut items: Vec<(Item, TermSet)> = Vec::new();
        let mut index: FxHashMap<Item, usize> = FxHashMap::default();
        let mut queue = Vec::new();

        for (item, lookahead) in seeds {
            match index.get(&item) {
                Some(&i) => {
                    items[i].1.union_with(&lookahead);
                }
                None => {
                    index.insert(item, items.len());
                    items.push((item, lookahead));
                    queue.push(items.len() - 1);
                }
            }
        }

        while let Some(i) = queue.pop() {
            let (item, lookahead) = items[i].clone();
            let production = &self.grammar.productions[item.production as usize];
            let Some(&Symbol::NonTerminal(nt)) = production.rhs.get(item.dot as usize) else {
                continue;
            };
            let follow = self.first_of(&production.rhs[item.dot as usize + 1..], &lookahead);
            for &id in &self.by_lhs[nt.index()] {
                let new_item = Item {
                    production: id as u32,
                    dot: 0,
                };
                match index.get(&new_item) {
                    Some(&j) => {
                        if items[j].1.union_with(&follow) {
                            queue.push(j);
                        }
                    }
                    None => {
                        index.insert(new_item, items.len());
                        items.push((new_item, follow.clone()));
                        queue.push(items.len() - 1);
                    }
                }
            }
        }
        items
    }

    /// LR(0) canonical collection; state 0 holds `__start → · start`.
    pub fn lr0_states(&self) -> Vec<Lr0State> {
        let mut kernels: IndexSet<Vec<Item>> = IndexSet::new();
        kernels.insert(vec![Item {
            production: 0,
            dot: 0,
        }]);

        let mut states = Vec::new();
        let mut i = 0;
        while i < kernels.len() {
            let kernel = kernels[i].clone();
            let mut groups: IndexMap<Symbol, Vec<Item>> = IndexMap::new();
            for item in self.closure0(&kernel) {
                if let Some(symbol) = self.next_symbol(item) {
                    groups.entry(symbol).or_default().push(item.advance());
                }
            }

            let mut transitions = Vec::with_capacity(groups.len());
            for (symbol, mut items) in groups {
                items.sort();
                items.dedup();
                let (target, _) = kernels.insert_full(items);
                transitions.push((symbol, target));
            }
            states.push(Lr0State {
                kernel,
                transitions,
            });
            i += 1;
        }
        states
    }

    /// Lookahead sets for every kernel item of every state
    pub fn lalr_lookaheads(&self, states: &[Lr0State]) -> Vec<Vec<TermSet>> {
        let mut lookaheads: Vec<Vec<TermSet>> = states
            .iter()
            .map(|state| vec![TermSet::new(); state.kernel.len()])
            .collect();
        lookaheads[0][0].insert(SyntaxKind::EOF as usize);

        let mut edges: Vec<((usize, usize), (usize, usize))> = Vec::new();
        for (s, state) in states.iter().enumerate() {
            for (k, &item) in state.kernel.iter().enumerate() {
                let mut marker = TermSet::new();
                marker.insert(PROPAGATE);
                for (closure_item, lookahead) in self.closure1(vec![(item, marker)]) {
                    let Some(symbol) = self.next_symbol(closure_item) else {
                        continue;
                    };
                    let Some(target) = state.transition(symbol) else {
                        continue;
                    };
                    let advanced = closure_item.advance();
                    let Ok(tk) = states[target].kernel.binary_search(&advanced) else {
                        continue;
                    };
                    for terminal in lookahead.iter() {
                        if terminal == PROPAGATE {
                            edges.push(((s, k), (target, tk)));
                        } else {
                            lookaheads[target][tk].insert(terminal);
                        }
                    }
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &((from_state, from_item), (to_state, to_item)) in &edges {
                let source = lookaheads[from_state][from_item].clone();
                changed |= lookaheads[to_state][to_item].union_with(&source);
            }
        }
        lookaheads
    }
}
