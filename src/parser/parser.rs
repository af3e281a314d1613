//! Table-driven shift/reduce parse engine
//!
//! Drives a [`Grammar`]'s action table over the lexed tokens and assembles the
//! rowan green tree bottom-up. Trivia never reaches the automaton; it is
//! attached in front of the next symbol pushed onto the stack, and hoisted out
//! again when a node is reduced so that node spans start at their first
//! significant token.
//!
//! Error recovery never fails the parse. In order of preference the engine
//! 1. inserts a zero-width `MISSING` token that lets the lookahead proceed,
//! 2. on a synchronization token, pops abandoned stack material into an
//!    `ERROR` node until an enclosing state accepts the token,
//! 3. discards tokens into an `ERROR` node.

use std::sync::Arc;

use rayon::prelude::*;
use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};
use tracing::{debug, trace};

use super::errors::{ErrorCode, SyntaxError};
use super::grammar::{Action, Grammar, StateId, get_grammar};
use super::incremental::{ReuseContext, ReuseStats, TextEdit};
use super::keywords;
use super::lexer::{DoubleQuotes, LexMode, Lexer, Token, unknown_token_error};
use super::syntax_kind::{SyntaxKind, SyntaxNode, kind_to_name};

pub(crate) type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Terminals the engine may synthesize as `MISSING`, in order of preference
const INSERTABLE: &[SyntaxKind] = &[
    SyntaxKind::IDENT,
    SyntaxKind::NUMBER,
    SyntaxKind::TYPE_IDENT,
    SyntaxKind::ENGINE_IDENT,
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::EQ,
];

/// Safe restart points for error recovery
const SYNC: &[SyntaxKind] = &[
    SyntaxKind::SELECT_KW,
    SyntaxKind::INSERT_KW,
    SyntaxKind::CREATE_KW,
    SyntaxKind::WITH_KW,
    SyntaxKind::SEMICOLON,
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::EOF,
];

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseOptions {
    /// Whether `"..."` is a string literal or a quoted identifier
    pub double_quotes: DoubleQuotes,
}

impl ParseOptions {
    pub fn lex_mode(&self) -> LexMode {
        LexMode {
            double_quotes: self.double_quotes,
        }
    }
}

/// A lexed token as recorded with a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedToken {
    pub kind: SyntaxKind,
    pub range: TextRange,
    /// State the token was shifted in
    pub(crate) state: Option<StateId>,
    /// Leaf built for the token, shared with later parses
    pub(crate) green: Option<GreenToken>,
}

impl LexedToken {
    pub fn new(kind: SyntaxKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            state: None,
            green: None,
        }
    }

    /// Automaton state in which the parse shifted this token, if it did
    pub fn state(&self) -> Option<StateId> {
        self.state
    }
}

impl From<Token<'_>> for LexedToken {
    fn from(token: Token<'_>) -> Self {
        LexedToken::new(token.kind, token.range())
    }
}

/// The result of parsing: an immutable green tree plus what is needed to
/// reparse it after an edit
///
/// Building the tree is iterative, but dropping it recurses once per level
/// of nesting. A left-deep chain of tens of thousands of operators needs a
/// thread stack larger than the 2 MiB default to be dropped.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    text: Arc<str>,
    tokens: Arc<[LexedToken]>,
    errors: Arc<[SyntaxError]>,
    options: ParseOptions,
    last_edit: Option<Arc<TextEdit>>,
    stats: ReuseStats,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Diagnostics, ordered by position
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every lexed token, trivia included, in source order
    pub fn tokens(&self) -> &[LexedToken] {
        &self.tokens
    }

    pub(crate) fn shared_tokens(&self) -> Arc<[LexedToken]> {
        Arc::clone(&self.tokens)
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// The edit this parse was derived with, if it came from a reparse
    pub fn last_edit(&self) -> Option<&TextEdit> {
        self.last_edit.as_deref()
    }

    pub fn stats(&self) -> ReuseStats {
        self.stats
    }

    /// Apply `edit` and reparse incrementally with the ClickHouse grammar.
    pub fn reparse(&self, edit: &TextEdit) -> Parse {
        get_grammar().reparse(self, edit)
    }

    /// Indented dump of the tree with kinds, ranges and token text
    pub fn debug_tree(&self) -> String {
        format!("{:#?}", self.syntax())
    }
}

/// Parse ClickHouse SQL with the shared grammar
///
/// See [`Parse`] for the stack needed to drop very deeply nested trees.
pub fn parse(text: &str) -> Parse {
    get_grammar().parse(text)
}

/// Parse independent documents in parallel
pub fn parse_batch<S: AsRef<str> + Sync>(texts: &[S]) -> Vec<Parse> {
    get_grammar().parse_batch(texts)
}

impl Grammar {
    pub fn parse(&self, text: &str) -> Parse {
        self.parse_with(text, ParseOptions::default())
    }

    pub fn parse_with(&self, text: &str, options: ParseOptions) -> Parse {
        let tokens: Vec<LexedToken> = Lexer::with_mode(text, 0, options.lex_mode())
            .map(LexedToken::from)
            .collect();
        let stats = ReuseStats {
            relexed_tokens: tokens.len(),
            ..ReuseStats::default()
        };
        let output = Engine::new(self, text, tokens, options, None).run();
        output.into_parse(text, options, None, stats)
    }

    /// Parse several documents on the rayon pool; results keep input order.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Parse> {
        texts
            .par_iter()
            .map(|text| self.parse(text.as_ref()))
            .collect()
    }
}

/// What a run of the engine produced
pub(crate) struct EngineOutput {
    pub green: GreenNode,
    pub tokens: Vec<LexedToken>,
    pub errors: Vec<SyntaxError>,
    pub reused_nodes: usize,
}

impl EngineOutput {
    pub(crate) fn into_parse(
        self,
        text: &str,
        options: ParseOptions,
        last_edit: Option<TextEdit>,
        mut stats: ReuseStats,
    ) -> Parse {
        stats.reused_nodes = self.reused_nodes;
        Parse {
            green: self.green,
            text: Arc::from(text),
            tokens: Arc::from(self.tokens),
            errors: Arc::from(self.errors),
            options,
            last_edit: last_edit.map(Arc::new),
            stats,
        }
    }
}

/// Diagnostics for the `UNKNOWN` tokens of a token stream
fn lexical_errors(text: &str, tokens: &[LexedToken], mode: LexMode) -> Vec<SyntaxError> {
    tokens
        .iter()
        .filter(|token| token.kind == SyntaxKind::UNKNOWN)
        .map(|token| {
            let view = Token {
                kind: token.kind,
                text: &text[token.range],
                offset: token.range.start(),
            };
            unknown_token_error(&view, mode)
        })
        .collect()
}

fn element_len(element: &GreenElement) -> TextSize {
    match element {
        NodeOrToken::Node(node) => node.text_len(),
        NodeOrToken::Token(token) => token.text_len(),
    }
}

/// Trivia tokens and `ERROR` nodes, which are hoisted out of reduced nodes
fn is_extra(element: &GreenElement) -> bool {
    match element {
        NodeOrToken::Node(node) => SyntaxKind::from(node.kind()) == SyntaxKind::ERROR,
        NodeOrToken::Token(token) => SyntaxKind::from(token.kind()).is_trivia(),
    }
}

fn owned_children(node: &GreenNode) -> impl Iterator<Item = GreenElement> + '_ {
    node.children().map(|child| match child {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    })
}

/// A stack entry; its symbol and any extras before it are
/// `elements[start..next.start]`
#[derive(Debug, Clone, Copy)]
struct Frame {
    state: StateId,
    start: usize,
}

/// A copy-on-write view of the stack for trying actions without committing
struct SimStack<'a> {
    grammar: &'a Grammar,
    frames: &'a [Frame],
    base: usize,
    extra: Vec<StateId>,
}

impl<'a> SimStack<'a> {
    fn new(grammar: &'a Grammar, frames: &'a [Frame]) -> Self {
        Self {
            grammar,
            frames,
            base: frames.len(),
            extra: Vec::new(),
        }
    }

    fn top(&self) -> StateId {
        match self.extra.last() {
            Some(&state) => state,
            None => self.frames[..self.base].last().map_or(0, |frame| frame.state),
        }
    }

    fn pop(&mut self, count: usize) {
        let from_extra = count.min(self.extra.len());
        self.extra.truncate(self.extra.len() - from_extra);
        self.base = self.base.saturating_sub(count - from_extra);
    }

    /// Run reductions until `terminal` is shifted, accepted, or rejected.
    fn settle(&mut self, terminal: SyntaxKind) -> Action {
        loop {
            match self.grammar.action(self.top(), terminal) {
                Action::Reduce(id) => {
                    let production = self.grammar.production(id);
                    self.pop(production.arity());
                    match self.grammar.goto(self.top(), production.lhs) {
                        Some(target) => self.extra.push(target),
                        None => return Action::Error,
                    }
                }
                action => return action,
            }
        }
    }

    fn shift(&mut self, terminal: SyntaxKind) -> bool {
        match self.settle(terminal) {
            Action::Shift(target) => {
                self.extra.push(target);
                true
            }
            _ => false,
        }
    }
}

pub(crate) struct Engine<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    tokens: Vec<LexedToken>,
    reuse: Option<ReuseContext>,
    /// Next token not yet consumed, trivia included
    pos: usize,
    stack: Vec<Frame>,
    elements: Vec<GreenElement>,
    /// Consumed extras waiting for the next pushed symbol
    pending: Vec<GreenElement>,
    errors: Vec<SyntaxError>,
    last_error_at: Option<usize>,
    reused_nodes: usize,
}

impl<'g, 't> Engine<'g, 't> {
    pub(crate) fn new(
        grammar: &'g Grammar,
        text: &'t str,
        tokens: Vec<LexedToken>,
        options: ParseOptions,
        reuse: Option<ReuseContext>,
    ) -> Self {
        let errors = lexical_errors(text, &tokens, options.lex_mode());
        Self {
            grammar,
            text,
            tokens,
            reuse,
            pos: 0,
            stack: vec![Frame { state: 0, start: 0 }],
            elements: Vec::new(),
            pending: Vec::new(),
            errors,
            last_error_at: None,
            reused_nodes: 0,
        }
    }

    pub(crate) fn run(mut self) -> EngineOutput {
        loop {
            let index = self.lookahead();
            let (terminal, leaf) = self.classify(index);
            let top = self.top_state();
            match self.grammar.action(top, terminal) {
                Action::Shift(target) => {
                    if !self.reuse_node(index, top, leaf) {
                        self.shift(index, top, target, leaf);
                    }
                }
                Action::Reduce(id) => {
                    if !self.reduce(id) {
                        return self.finish(None);
                    }
                }
                Action::Accept => return self.accept(),
                Action::Error => {
                    if !self.recover(index, terminal) {
                        return self.finish(None);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn top_state(&self) -> StateId {
        self.stack.last().map_or(0, |frame| frame.state)
    }

    /// Index of the next significant token; `tokens.len()` is end of input.
    fn lookahead(&self) -> usize {
        let mut index = self.pos;
        while index < self.tokens.len() && self.tokens[index].kind.is_trivia() {
            index += 1;
        }
        index
    }

    fn token_text(&self, index: usize) -> &'t str {
        &self.text[self.tokens[index].range]
    }

    /// End of the text consumed so far
    fn consumed_end(&self) -> TextSize {
        match self.pos {
            0 => TextSize::new(0),
            pos => self.tokens[pos - 1].range.end(),
        }
    }

    /// The terminal the automaton sees for a token and the kind of its leaf.
    ///
    /// Identifiers may be read as type or engine names and soft keywords as
    /// identifiers, but only when the lexed reading cannot proceed here.
    fn classify(&self, index: usize) -> (SyntaxKind, SyntaxKind) {
        let Some(token) = self.tokens.get(index) else {
            return (SyntaxKind::EOF, SyntaxKind::EOF);
        };
        let primary = token.kind.terminal();
        let alternative = if token.kind == SyntaxKind::IDENT {
            keywords::contextual_kind(self.token_text(index))
        } else if token.kind.is_soft_keyword() {
            Some(SyntaxKind::IDENT)
        } else {
            None
        };
        match alternative {
            Some(alternative)
                if !self.accepts(self.stack.len(), None, primary)
                    && self.accepts(self.stack.len(), None, alternative) =>
            {
                (alternative, alternative)
            }
            _ => (primary, token.kind),
        }
    }

    /// Whether `terminal` can be shifted or accepted after keeping `depth`
    /// frames and optionally shifting `inserted` first.
    fn accepts(&self, depth: usize, inserted: Option<SyntaxKind>, terminal: SyntaxKind) -> bool {
        let mut sim = SimStack::new(self.grammar, &self.stack[..depth]);
        if let Some(inserted) = inserted {
            if !sim.shift(inserted) {
                return false;
            }
        }
        matches!(sim.settle(terminal), Action::Shift(_) | Action::Accept)
    }

    fn describe_token(&self, index: usize) -> String {
        let Some(token) = self.tokens.get(index) else {
            return kind_to_name(SyntaxKind::EOF).to_string();
        };
        match token.kind {
            SyntaxKind::IDENT | SyntaxKind::QUOTED_IDENT | SyntaxKind::NUMBER | SyntaxKind::STRING => {
                format!("{} `{}`", kind_to_name(token.kind), self.token_text(index))
            }
            // Escaped, as the character may be a control byte
            SyntaxKind::UNKNOWN => {
                format!("{} {:?}", kind_to_name(token.kind), self.token_text(index))
            }
            kind => kind_to_name(kind).to_string(),
        }
    }

    // =========================================================================
    // Tree building
    // =========================================================================

    /// Leaf for a token, sharing the previous parse's leaf when it matches.
    fn leaf(&mut self, index: usize, kind: SyntaxKind) -> GreenElement {
        let raw: rowan::SyntaxKind = kind.into();
        let token = &mut self.tokens[index];
        if let Some(green) = &token.green {
            if green.kind() == raw {
                return NodeOrToken::Token(green.clone());
            }
        }
        let green = GreenToken::new(raw, &self.text[token.range]);
        token.green = Some(green.clone());
        NodeOrToken::Token(green)
    }

    /// Move `pending` and the trivia before `index` into the elements.
    fn attach_extras(&mut self, index: usize) {
        self.elements.append(&mut self.pending);
        for i in self.pos..index {
            let kind = self.tokens[i].kind;
            let leaf = self.leaf(i, kind);
            self.elements.push(leaf);
        }
    }

    fn shift(&mut self, index: usize, state: StateId, target: StateId, leaf: SyntaxKind) {
        let start = self.elements.len();
        self.attach_extras(index);
        let element = self.leaf(index, leaf);
        self.elements.push(element);
        self.tokens[index].state = Some(state);
        self.stack.push(Frame {
            state: target,
            start,
        });
        self.pos = index + 1;
    }

    /// Push a whole subtree of the previous parse in place of a shift.
    fn reuse_node(&mut self, index: usize, state: StateId, leaf: SyntaxKind) -> bool {
        let Some(reuse) = &self.reuse else {
            return false;
        };
        let Some(found) = reuse.find(self.grammar, state, index, leaf) else {
            return false;
        };
        let Some(target) = self.grammar.goto(state, found.nonterminal) else {
            return false;
        };
        trace!(
            kind = ?found.green.kind(),
            token = index,
            next = found.next,
            "reusing node"
        );
        let start = self.elements.len();
        self.attach_extras(index);
        self.elements.push(NodeOrToken::Node(found.green));
        self.stack.push(Frame {
            state: target,
            start,
        });
        self.pos = found.next;
        self.reused_nodes += 1;
        true
    }

    /// Returns false if the table has no goto for the reduced symbol.
    fn reduce(&mut self, id: u32) -> bool {
        let grammar = self.grammar;
        let production = grammar.production(id);
        let base = self.stack.len().saturating_sub(production.arity()).max(1);
        let start = match self.stack.get(base) {
            Some(frame) if production.arity() > 0 => frame.start,
            _ => self.elements.len(),
        };
        self.stack.truncate(base);

        let Some(target) = grammar.goto(self.top_state(), production.lhs) else {
            debug!(production = id, "no goto after reduce");
            return false;
        };

        if let Some(kind) = grammar.production_kind(id) {
            let mut children = self.elements.split_off(start);
            let leading = children.iter().take_while(|child| is_extra(child)).count();
            let inner = children.split_off(leading);
            self.elements.append(&mut children);
            self.elements
                .push(NodeOrToken::Node(GreenNode::new(kind.into(), inner)));
        }
        self.stack.push(Frame {
            state: target,
            start,
        });
        true
    }

    fn accept(mut self) -> EngineOutput {
        let root_kind: rowan::SyntaxKind = self.root_kind().into();
        let root = match self.elements.last() {
            Some(NodeOrToken::Node(node)) if node.kind() == root_kind => self.elements.pop(),
            _ => None,
        };
        let mut children = std::mem::take(&mut self.elements);
        if let Some(NodeOrToken::Node(root)) = root {
            children.extend(owned_children(&root));
        }
        self.finish(Some(children))
    }

    fn root_kind(&self) -> SyntaxKind {
        self.grammar.root_kind().unwrap_or(SyntaxKind::SOURCE_FILE)
    }

    /// Assemble the root. Without `children` everything still on the stack is
    /// spliced in as is.
    fn finish(mut self, children: Option<Vec<GreenElement>>) -> EngineOutput {
        let mut children = children.unwrap_or_else(|| std::mem::take(&mut self.elements));
        children.append(&mut self.pending);
        for i in self.pos..self.tokens.len() {
            let kind = self.tokens[i].kind;
            let leaf = self.leaf(i, kind);
            children.push(leaf);
        }
        self.errors.sort_by_key(|error| error.range.start());
        EngineOutput {
            green: GreenNode::new(self.root_kind().into(), children),
            tokens: self.tokens,
            errors: self.errors,
            reused_nodes: self.reused_nodes,
        }
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    /// Returns false when the input cannot be completed at all.
    fn recover(&mut self, index: usize, terminal: SyntaxKind) -> bool {
        let repeated = self.last_error_at == Some(index);
        self.last_error_at = Some(index);

        if !repeated {
            let depth = self.stack.len();
            if let Some(kind) = self.insertion(depth, terminal) {
                debug!(token = index, inserted = ?kind, "recovering by insertion");
                self.insert_missing(kind);
                return true;
            }
            if SYNC.contains(&terminal) {
                if let Some((keep, inserted)) = self.sync_plan(terminal) {
                    self.unwind(keep, index);
                    if let Some(kind) = inserted {
                        self.insert_missing(kind);
                    }
                    return true;
                }
            }
        }
        self.discard(index)
    }

    /// First insertable terminal after which `terminal` can proceed
    fn insertion(&self, depth: usize, terminal: SyntaxKind) -> Option<SyntaxKind> {
        INSERTABLE
            .iter()
            .copied()
            .find(|&kind| self.accepts(depth, Some(kind), terminal))
    }

    /// Deepest stack prefix (with an optional insertion) accepting `terminal`
    fn sync_plan(&self, terminal: SyntaxKind) -> Option<(usize, Option<SyntaxKind>)> {
        (1..=self.stack.len()).rev().find_map(|keep| {
            if self.accepts(keep, None, terminal) {
                Some((keep, None))
            } else {
                self.insertion(keep, terminal).map(|kind| (keep, Some(kind)))
            }
        })
    }

    /// Pop frames above `keep`, wrapping their material in an `ERROR` node.
    fn unwind(&mut self, keep: usize, index: usize) {
        if keep >= self.stack.len() {
            return;
        }
        let start = self.stack[keep].start;
        self.stack.truncate(keep);
        let mut content = self.elements.split_off(start);
        content.append(&mut self.pending);

        let leading = content
            .iter()
            .take_while(|element| matches!(element, NodeOrToken::Token(_)) && is_extra(element))
            .count();
        let body = content.split_off(leading);
        self.pending = content;

        let abandoned = body.iter().any(|element| !is_extra(element));
        let mut flat = Vec::with_capacity(body.len());
        for element in body {
            match element {
                NodeOrToken::Node(node) if SyntaxKind::from(node.kind()) == SyntaxKind::ERROR => {
                    flat.extend(owned_children(&node));
                }
                element => flat.push(element),
            }
        }
        if flat.is_empty() {
            return;
        }

        let len: TextSize = flat.iter().map(element_len).sum();
        let end = self.consumed_end();
        let range = TextRange::new(end - len, end);
        debug!(keep, ?range, "unwinding to synchronize");
        if abandoned {
            self.errors.push(
                SyntaxError::new(
                    format!(
                        "could not complete this input before {}",
                        self.describe_token(index)
                    ),
                    range,
                    ErrorCode::E0201,
                )
                .with_hint("the enclosing construct is incomplete"),
            );
        }
        self.pending
            .push(NodeOrToken::Node(GreenNode::new(SyntaxKind::ERROR.into(), flat)));
    }

    /// Reduce as `kind` requires, then push a zero-width `MISSING` leaf.
    fn insert_missing(&mut self, kind: SyntaxKind) {
        let state = self.top_state();
        let description = self.grammar.expected_description(state);
        loop {
            match self.grammar.action(self.top_state(), kind) {
                Action::Reduce(id) => {
                    if !self.reduce(id) {
                        return;
                    }
                }
                Action::Shift(target) => {
                    let start = self.elements.len();
                    self.elements.append(&mut self.pending);
                    let token = GreenToken::new(kind.into(), "");
                    self.elements.push(NodeOrToken::Node(GreenNode::new(
                        SyntaxKind::MISSING.into(),
                        [NodeOrToken::Token(token)],
                    )));
                    self.stack.push(Frame {
                        state: target,
                        start,
                    });
                    break;
                }
                Action::Accept | Action::Error => return,
            }
        }

        let offset = self.consumed_end();
        let error = match kind {
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => {
                let (open, code, message, hint) = if kind == SyntaxKind::R_PAREN {
                    (SyntaxKind::L_PAREN, ErrorCode::E0203, "unclosed parenthesis", "add a closing `)`")
                } else {
                    (SyntaxKind::L_BRACKET, ErrorCode::E0204, "unclosed bracket", "add a closing `]`")
                };
                let mut builder = SyntaxError::builder(code)
                    .message(message)
                    .at_offset(offset)
                    .hint(hint);
                if let Some(range) = self.unmatched_opener(open, kind) {
                    builder = builder.related("opened here", range);
                }
                builder.build()
            }
            _ if description.as_deref() == Some("expression") => {
                SyntaxError::at_offset("expected expression", offset, ErrorCode::E0406)
            }
            _ => SyntaxError::at_offset(
                format!("missing {}", kind_to_name(kind)),
                offset,
                ErrorCode::E0202,
            ),
        };
        self.errors.push(error);
    }

    /// The nearest consumed `open` token not balanced by a `close`
    fn unmatched_opener(&self, open: SyntaxKind, close: SyntaxKind) -> Option<TextRange> {
        let mut depth = 0usize;
        for token in self.tokens[..self.pos].iter().rev() {
            if token.kind == close {
                depth += 1;
            } else if token.kind == open {
                if depth == 0 {
                    return Some(token.range);
                }
                depth -= 1;
            }
        }
        None
    }

    /// Skip tokens from `index` into an `ERROR` node until the lookahead fits
    /// the current state or a synchronization point takes over.
    fn discard(&mut self, index: usize) -> bool {
        if index >= self.tokens.len() {
            return false;
        }

        // Trivia before the first skipped token stays outside the node
        for i in self.pos..index {
            let kind = self.tokens[i].kind;
            let leaf = self.leaf(i, kind);
            self.pending.push(leaf);
        }
        self.pos = index;

        let hint = self
            .grammar
            .expected_description(self.top_state())
            .map(|description| format!("expected {description}"));
        let message = format!("unexpected {}", self.describe_token(index));
        let mut content = Vec::new();
        let mut only_unknown = true;
        let mut current = index;

        let (resumed, plan) = loop {
            for i in self.pos..=current {
                let kind = self.tokens[i].kind;
                let leaf = self.leaf(i, kind);
                content.push(leaf);
            }
            only_unknown &= self.tokens[current].kind == SyntaxKind::UNKNOWN;
            self.tokens[current].state = None;
            self.pos = current + 1;

            let next = self.lookahead();
            let (terminal, _) = self.classify(next);
            if self.accepts(self.stack.len(), None, terminal) {
                break (true, None);
            }
            if SYNC.contains(&terminal) {
                if let Some(plan) = self.sync_plan(terminal) {
                    break (true, Some((plan, next)));
                }
                if next >= self.tokens.len() {
                    break (false, None);
                }
            }
            current = next;
        };

        let end = self.consumed_end();
        let range = TextRange::new(self.tokens[index].range.start(), end);
        debug!(?range, "discarding tokens");
        if !only_unknown {
            let mut error = SyntaxError::new(message, range, ErrorCode::E0201);
            if let Some(hint) = hint {
                error = error.with_hint(hint);
            }
            self.errors.push(error);
        }
        self.pending
            .push(NodeOrToken::Node(GreenNode::new(SyntaxKind::ERROR.into(), content)));

        if let Some(((keep, inserted), next)) = plan {
            self.unwind(keep, next);
            if let Some(kind) = inserted {
                self.insert_missing(kind);
            }
        }
        resumed
    }
}
