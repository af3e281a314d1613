//! Logos-based lexer for ClickHouse SQL
//!
//! Every byte of the input ends up in exactly one token. Quoted literals,
//! nested block comments and heredocs are scanned by logos callbacks; anything
//! the patterns cannot match becomes a one-character `UNKNOWN` token and
//! lexing resumes right after it.

use super::errors::{ErrorCode, SyntaxError};
use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::{TextRange, TextSize};

/// How double-quoted text is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DoubleQuotes {
    /// `"text"` is a string literal
    #[default]
    String,
    /// `"name"` is a quoted identifier
    Identifier,
}

/// Lexer configuration, carried in the logos extras
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LexMode {
    pub double_quotes: DoubleQuotes,
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    input: &'a str,
    inner: logos::Lexer<'a, LogosToken>,
    /// Byte offset of `inner`'s source within `input`
    base: usize,
    mode: LexMode,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_mode(input, 0, LexMode::default())
    }

    /// Start lexing `input` at byte `offset`, which must be a char boundary.
    pub fn with_mode(input: &'a str, offset: usize, mode: LexMode) -> Self {
        Self {
            input,
            inner: LogosToken::lexer_with_extras(&input[offset..], mode),
            base: offset,
            mode,
        }
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let logos_token = self.inner.next()?;
        let span = self.inner.span();
        let start = self.base + span.start;
        let end = self.base + span.end;

        let (kind, end) = match logos_token {
            Ok(token) => (token.into(), end),
            Err(()) => {
                let char_len = self.input[start..].chars().next().map_or(1, char::len_utf8);
                let char_end = start + char_len;
                if end != char_end {
                    // The failed match covered more than one character: keep
                    // only the first one and rescan from the next.
                    self.restart(char_end);
                }
                (SyntaxKind::UNKNOWN, char_end)
            }
        };

        Some(Token {
            kind,
            text: &self.input[start..end],
            offset: TextSize::new(start as u32),
        })
    }

    fn restart(&mut self, offset: usize) {
        self.inner = LogosToken::lexer_with_extras(&self.input[offset..], self.mode);
        self.base = offset;
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Tokenize with an explicit lexer mode
pub fn tokenize_with_mode(input: &str, mode: LexMode) -> Vec<Token<'_>> {
    Lexer::with_mode(input, 0, mode).collect()
}

/// Check whether an `UNKNOWN` token is the opener of an unterminated construct,
/// whose meaning depends on text arbitrarily far to its right.
pub(crate) fn is_unterminated_opener(text: &str) -> bool {
    matches!(text.as_bytes().first(), Some(b'\'' | b'"' | b'`' | b'/' | b'$'))
}

/// Diagnostic for an `UNKNOWN` token.
pub(crate) fn unknown_token_error(token: &Token<'_>, mode: LexMode) -> SyntaxError {
    let range = token.range();
    match token.text.as_bytes().first() {
        Some(b'\'') => SyntaxError::new("unterminated string literal", range, ErrorCode::E0102)
            .with_hint("add a closing `'`"),
        Some(b'"') if mode.double_quotes == DoubleQuotes::String => {
            SyntaxError::new("unterminated string literal", range, ErrorCode::E0102)
                .with_hint("add a closing `\"`")
        }
        Some(b'"') | Some(b'`') => {
            SyntaxError::new("unterminated quoted identifier", range, ErrorCode::E0104)
        }
        Some(b'$') => SyntaxError::new(
            "unterminated heredoc or stray `$`",
            range,
            ErrorCode::E0102,
        ),
        Some(b'/') => SyntaxError::new("unterminated block comment", range, ErrorCode::E0103)
            .with_hint("add a closing `*/`"),
        _ => SyntaxError::new(
            format!("unexpected character {:?}", token.text),
            range,
            ErrorCode::E0101,
        ),
    }
}

// =============================================================================
// SUB-SCANNERS
// =============================================================================

/// Find the end of a quoted literal body (just past the closing quote).
/// Backslash escapes and doubled quotes are part of the literal.
fn quoted_len(rest: &[u8], quote: u8) -> Option<usize> {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == quote => {
                if rest.get(i + 1) == Some(&quote) {
                    i += 2;
                } else {
                    return Some(i + 1);
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// Find the end of a block comment body. Block comments nest.
fn block_comment_len(rest: &[u8]) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = 0;
    while i + 1 < rest.len() {
        match (rest[i], rest[i + 1]) {
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            }
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            _ => i += 1,
        }
    }
    None
}

fn bump_quoted(lex: &mut logos::Lexer<'_, LogosToken>, quote: u8) -> bool {
    match quoted_len(lex.remainder().as_bytes(), quote) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

fn single_quoted(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    bump_quoted(lex, b'\'')
}

fn backtick_quoted(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    bump_quoted(lex, b'`')
}

fn double_quoted(lex: &mut logos::Lexer<'_, LogosToken>) -> Option<DoubleQuotes> {
    bump_quoted(lex, b'"').then_some(lex.extras.double_quotes)
}

fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    match block_comment_len(lex.remainder().as_bytes()) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// `$tag$ ... $tag$`; the opening delimiter has already been matched.
fn heredoc(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let tag_len = lex.slice().len();
    let found = lex.remainder().find(lex.slice());
    match found {
        Some(pos) => {
            lex.bump(pos + tag_len);
            true
        }
        None => false,
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(extras = LexMode)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\x0B\x0C]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token("`", backtick_quoted)]
    QuotedIdent,

    #[token("\"", double_quoted)]
    DoubleQuoted(DoubleQuotes),

    #[token("'", single_quoted)]
    String,

    #[regex(r"\$[a-zA-Z0-9_]*\$", heredoc)]
    Heredoc,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    #[regex(r"0[bB][01][01_]*")]
    Number,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("->")]
    Arrow,

    #[token("::")]
    ColonColon,

    #[token("!=")]
    #[token("<>")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("==")]
    EqEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("=")]
    Eq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    // =========================================================================
    // RESERVED KEYWORDS
    // =========================================================================
    #[token("and", ignore(ascii_case))]
    AndKw,
    #[token("as", ignore(ascii_case))]
    AsKw,
    #[token("by", ignore(ascii_case))]
    ByKw,
    #[token("create", ignore(ascii_case))]
    CreateKw,
    #[token("from", ignore(ascii_case))]
    FromKw,
    #[token("group", ignore(ascii_case))]
    GroupKw,
    #[token("in", ignore(ascii_case))]
    InKw,
    #[token("insert", ignore(ascii_case))]
    InsertKw,
    #[token("into", ignore(ascii_case))]
    IntoKw,
    #[token("is", ignore(ascii_case))]
    IsKw,
    #[token("like", ignore(ascii_case))]
    LikeKw,
    #[token("limit", ignore(ascii_case))]
    LimitKw,
    #[token("not", ignore(ascii_case))]
    NotKw,
    #[token("null", ignore(ascii_case))]
    NullKw,
    #[token("on", ignore(ascii_case))]
    OnKw,
    #[token("or", ignore(ascii_case))]
    OrKw,
    #[token("order", ignore(ascii_case))]
    OrderKw,
    #[token("select", ignore(ascii_case))]
    SelectKw,
    #[token("where", ignore(ascii_case))]
    WhereKw,
    #[token("with", ignore(ascii_case))]
    WithKw,

    // =========================================================================
    // SOFT KEYWORDS
    // =========================================================================
    #[token("alias", ignore(ascii_case))]
    AliasKw,
    #[token("asc", ignore(ascii_case))]
    AscKw,
    #[token("cast", ignore(ascii_case))]
    CastKw,
    #[token("cluster", ignore(ascii_case))]
    ClusterKw,
    #[token("codec", ignore(ascii_case))]
    CodecKw,
    #[token("comment", ignore(ascii_case))]
    CommentKw,
    #[token("default", ignore(ascii_case))]
    DefaultKw,
    #[token("desc", ignore(ascii_case))]
    DescKw,
    #[token("engine", ignore(ascii_case))]
    EngineKw,
    #[token("ephemeral", ignore(ascii_case))]
    EphemeralKw,
    #[token("exists", ignore(ascii_case))]
    ExistsKw,
    #[token("format", ignore(ascii_case))]
    FormatKw,
    #[token("if", ignore(ascii_case))]
    IfKw,
    #[token("interval", ignore(ascii_case))]
    IntervalKw,
    #[token("key", ignore(ascii_case))]
    KeyKw,
    #[token("materialized", ignore(ascii_case))]
    MaterializedKw,
    #[token("partition", ignore(ascii_case))]
    PartitionKw,
    #[token("primary", ignore(ascii_case))]
    PrimaryKw,
    #[token("sample", ignore(ascii_case))]
    SampleKw,
    #[token("settings", ignore(ascii_case))]
    SettingsKw,
    #[token("table", ignore(ascii_case))]
    TableKw,
    #[token("ttl", ignore(ascii_case))]
    TtlKw,
    #[token("values", ignore(ascii_case))]
    ValuesKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            Ident => SyntaxKind::IDENT,
            QuotedIdent => SyntaxKind::QUOTED_IDENT,
            DoubleQuoted(DoubleQuotes::String) => SyntaxKind::STRING,
            DoubleQuoted(DoubleQuotes::Identifier) => SyntaxKind::QUOTED_IDENT,
            String | Heredoc => SyntaxKind::STRING,
            Number => SyntaxKind::NUMBER,
            Arrow => SyntaxKind::ARROW,
            ColonColon => SyntaxKind::COLON_COLON,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            EqEq | Eq => SyntaxKind::EQ,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Dot => SyntaxKind::DOT,
            Colon => SyntaxKind::COLON,
            Star => SyntaxKind::STAR,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            AndKw => SyntaxKind::AND_KW,
            AsKw => SyntaxKind::AS_KW,
            ByKw => SyntaxKind::BY_KW,
            CreateKw => SyntaxKind::CREATE_KW,
            FromKw => SyntaxKind::FROM_KW,
            GroupKw => SyntaxKind::GROUP_KW,
            InKw => SyntaxKind::IN_KW,
            InsertKw => SyntaxKind::INSERT_KW,
            IntoKw => SyntaxKind::INTO_KW,
            IsKw => SyntaxKind::IS_KW,
            LikeKw => SyntaxKind::LIKE_KW,
            LimitKw => SyntaxKind::LIMIT_KW,
            NotKw => SyntaxKind::NOT_KW,
            NullKw => SyntaxKind::NULL_KW,
            OnKw => SyntaxKind::ON_KW,
            OrKw => SyntaxKind::OR_KW,
            OrderKw => SyntaxKind::ORDER_KW,
            SelectKw => SyntaxKind::SELECT_KW,
            WhereKw => SyntaxKind::WHERE_KW,
            WithKw => SyntaxKind::WITH_KW,
            AliasKw => SyntaxKind::ALIAS_KW,
            AscKw => SyntaxKind::ASC_KW,
            CastKw => SyntaxKind::CAST_KW,
            ClusterKw => SyntaxKind::CLUSTER_KW,
            CodecKw => SyntaxKind::CODEC_KW,
            CommentKw => SyntaxKind::COMMENT_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            DescKw => SyntaxKind::DESC_KW,
            EngineKw => SyntaxKind::ENGINE_KW,
            EphemeralKw => SyntaxKind::EPHEMERAL_KW,
            ExistsKw => SyntaxKind::EXISTS_KW,
            FormatKw => SyntaxKind::FORMAT_KW,
            IfKw => SyntaxKind::IF_KW,
            IntervalKw => SyntaxKind::INTERVAL_KW,
            KeyKw => SyntaxKind::KEY_KW,
            MaterializedKw => SyntaxKind::MATERIALIZED_KW,
            PartitionKw => SyntaxKind::PARTITION_KW,
            PrimaryKw => SyntaxKind::PRIMARY_KW,
            SampleKw => SyntaxKind::SAMPLE_KW,
            SettingsKw => SyntaxKind::SETTINGS_KW,
            TableKw => SyntaxKind::TABLE_KW,
            TtlKw => SyntaxKind::TTL_KW,
            ValuesKw => SyntaxKind::VALUES_KW,
        }
    }
}
