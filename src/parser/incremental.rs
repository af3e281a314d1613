//! Incremental reparsing
//!
//! A reparse re-lexes only a window around the edit and reuses everything
//! else from the previous [`Parse`]:
//! - tokens before the window are kept as they were, with their leaves
//! - tokens after it are kept with shifted ranges, also with their leaves
//! - whole subtrees in either region are pushed onto the parse stack when the
//!   automaton is in the state they were built from
//!
//! The result is node-for-node equal to a fresh parse of the new text.

use std::sync::Arc;

use rowan::{GreenNode, TextRange, TextSize};
use tracing::{debug, warn};

use super::grammar::{Grammar, NonTerminal, StateId};
use super::lexer::{Lexer, is_unterminated_opener};
use super::parser::{Engine, LexedToken, Parse};
use super::syntax_kind::{SyntaxKind, SyntaxNode};

/// A replacement of `delete` with `insert`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub delete: TextRange,
    pub insert: String,
}

impl TextEdit {
    pub fn new(delete: TextRange, insert: impl Into<String>) -> Self {
        Self {
            delete,
            insert: insert.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }

    /// Length of the inserted text
    pub fn new_len(&self) -> TextSize {
        TextSize::of(self.insert.as_str())
    }

    /// Change in document length
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_len())) - i64::from(u32::from(self.delete.len()))
    }

    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }

    /// The edited text, or `None` if `delete` is out of bounds or splits a
    /// character.
    pub fn apply(&self, text: &str) -> Option<String> {
        let start = usize::from(self.delete.start());
        let end = usize::from(self.delete.end());
        let before = text.get(..start)?;
        let after = text.get(end..)?;
        let mut result = String::with_capacity(before.len() + self.insert.len() + after.len());
        result.push_str(before);
        result.push_str(&self.insert);
        result.push_str(after);
        Some(result)
    }
}

/// How much of the previous parse a reparse could keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReuseStats {
    /// Subtrees pushed whole onto the parse stack
    pub reused_nodes: usize,
    /// Tokens carried over without lexing
    pub reused_tokens: usize,
    /// Tokens produced by the lexer
    pub relexed_tokens: usize,
}

fn shift_range(range: TextRange, delta: i64) -> TextRange {
    let shift = |offset: TextSize| TextSize::new((i64::from(u32::from(offset)) + delta) as u32);
    TextRange::new(shift(range.start()), shift(range.end()))
}

impl Grammar {
    /// Parse `old`'s text with `edit` applied, reusing what the edit did not
    /// touch.
    ///
    /// An edit that does not fit the old text leaves the parse unchanged.
    pub fn reparse(&self, old: &Parse, edit: &TextEdit) -> Parse {
        let Some(text) = edit.apply(old.text()) else {
            warn!(delete = ?edit.delete, len = old.text().len(), "edit does not fit the text");
            return old.clone();
        };
        let options = old.options();
        let old_tokens = old.shared_tokens();
        let edit_start = edit.delete.start();
        let insert_end = edit_start + edit.new_len();
        let delta = edit.delta();

        // Restart at whitespace before the edit, or earlier at an opener whose
        // closing delimiter may be in the edit.
        let mut restart = old_tokens
            .iter()
            .rposition(|token| {
                token.kind == SyntaxKind::WHITESPACE && token.range.start() < edit_start
            })
            .unwrap_or(0);
        if let Some(opener) = old_tokens.iter().position(|token| {
            token.kind == SyntaxKind::UNKNOWN
                && token.range.start() < edit_start
                && is_unterminated_opener(&old.text()[token.range])
        }) {
            restart = restart.min(opener);
        }
        let restart_offset = old_tokens
            .get(restart)
            .map_or(0, |token| usize::from(token.range.start()));

        let mut tokens: Vec<LexedToken> = old_tokens[..restart].to_vec();
        let mut suffix_start = None;
        for token in Lexer::with_mode(&text, restart_offset, options.lex_mode()) {
            if token.offset >= insert_end {
                let old_offset = TextSize::new((i64::from(u32::from(token.offset)) - delta) as u32);
                if let Ok(index) =
                    old_tokens.binary_search_by_key(&old_offset, |old| old.range.start())
                {
                    suffix_start = Some(index);
                    break;
                }
            }
            tokens.push(LexedToken::from(token));
        }

        let relexed = tokens.len() - restart;
        let suffix_new_start = tokens.len();
        let suffix_old_start = suffix_start.unwrap_or(old_tokens.len());
        tokens.extend(old_tokens[suffix_old_start..].iter().map(|old| LexedToken {
            range: shift_range(old.range, delta),
            ..old.clone()
        }));
        debug!(
            restart,
            relexed,
            suffix = old_tokens.len() - suffix_old_start,
            "relexed edit window"
        );

        let stats = ReuseStats {
            reused_nodes: 0,
            reused_tokens: tokens.len() - relexed,
            relexed_tokens: relexed,
        };
        let reuse = ReuseContext::new(
            old,
            old_tokens,
            restart,
            suffix_new_start,
            suffix_old_start,
        );
        let output = Engine::new(self, &text, tokens, options, Some(reuse)).run();
        output.into_parse(&text, options, Some(edit.clone()), stats)
    }
}

/// A subtree of the previous parse found reusable
pub(crate) struct ReusedNode {
    pub green: GreenNode,
    pub nonterminal: NonTerminal,
    /// Token index just past the subtree in the new stream
    pub next: usize,
}

/// The previous parse as seen from the engine during a reparse
pub(crate) struct ReuseContext {
    old_root: SyntaxNode,
    old_tokens: Arc<[LexedToken]>,
    /// New token indices below this are old tokens at the same index
    prefix_end: usize,
    /// New token index of the first token after the relexed window
    suffix_new_start: usize,
    /// Old token index of that same token
    suffix_old_start: usize,
    /// Sorted ranges of old errors, `ERROR` nodes and `MISSING` nodes
    error_spans: Vec<TextRange>,
}

impl ReuseContext {
    fn new(
        old: &Parse,
        old_tokens: Arc<[LexedToken]>,
        prefix_end: usize,
        suffix_new_start: usize,
        suffix_old_start: usize,
    ) -> Self {
        let old_root = old.syntax();
        let mut error_spans: Vec<TextRange> = old.errors().iter().map(|error| error.range).collect();
        error_spans.extend(
            old_root
                .descendants()
                .filter(|node| matches!(node.kind(), SyntaxKind::ERROR | SyntaxKind::MISSING))
                .map(|node| node.text_range()),
        );
        error_spans.sort_by_key(|range| (range.start(), range.end()));
        Self {
            old_root,
            old_tokens,
            prefix_end,
            suffix_new_start,
            suffix_old_start,
            error_spans,
        }
    }

    /// Old index for a new token index, and whether it lies in the prefix.
    fn old_index(&self, index: usize) -> Option<(usize, bool)> {
        if index < self.prefix_end {
            return Some((index, true));
        }
        if index >= self.suffix_new_start {
            let old = index - self.suffix_new_start + self.suffix_old_start;
            return (old < self.old_tokens.len()).then_some((old, false));
        }
        None
    }

    /// Closed-interval overlap with any old error span
    fn touches_error(&self, range: TextRange) -> bool {
        self.error_spans
            .iter()
            .take_while(|span| span.start() <= range.end())
            .any(|span| range.start() <= span.end())
    }

    /// Old index of the token ending at `end`
    fn token_ending_at(&self, end: TextSize) -> Option<usize> {
        let index = self
            .old_tokens
            .partition_point(|token| token.range.end() < end);
        let token = self.old_tokens.get(index)?;
        (token.range.end() == end).then_some(index)
    }

    fn next_significant(&self, from: usize) -> Option<usize> {
        (from..self.old_tokens.len()).find(|&index| !self.old_tokens[index].kind.is_trivia())
    }

    /// The outermost old node that starts at new token `index` and can be
    /// pushed in `state` in place of shifting that token as `leaf`.
    pub(crate) fn find(
        &self,
        grammar: &Grammar,
        state: StateId,
        index: usize,
        leaf: SyntaxKind,
    ) -> Option<ReusedNode> {
        let (old_index, in_prefix) = self.old_index(index)?;
        let old_token = &self.old_tokens[old_index];
        if old_token.state != Some(state) {
            return None;
        }
        let offset = old_token.range.start();
        let token = self.old_root.token_at_offset(offset).right_biased()?;
        // A contextual word read differently this time starts a different node
        if token.text_range().start() != offset || token.kind() != leaf {
            return None;
        }

        let candidates: Vec<SyntaxNode> = token
            .parent()?
            .ancestors()
            .take_while(|node| node.text_range().start() == offset)
            .filter(|node| node.parent().is_some())
            .collect();

        for node in candidates.iter().rev() {
            let kind = node.kind();
            if matches!(kind, SyntaxKind::ERROR | SyntaxKind::MISSING) {
                continue;
            }
            let range = node.text_range();
            let Some(nonterminal) = grammar.nonterminal_for_kind(kind) else {
                continue;
            };
            if grammar.goto(state, nonterminal).is_none() {
                continue;
            }
            let Some(last) = self.token_ending_at(range.end()) else {
                continue;
            };
            // The token that decided the node's reductions must not have been
            // handled by recovery, which looks further ahead than one token.
            let next = self.next_significant(last + 1);
            let decided_end = next.map_or(range.end(), |next| self.old_tokens[next].range.end());
            if self.touches_error(TextRange::new(range.start(), decided_end)) {
                continue;
            }
            if in_prefix {
                // That token must be unchanged as well
                match next {
                    Some(next) if next < self.prefix_end => {}
                    _ => continue,
                }
            }
            return Some(ReusedNode {
                green: node.green().into_owned(),
                nonterminal,
                next: index + (last - old_index) + 1,
            });
        }
        None
    }
}
