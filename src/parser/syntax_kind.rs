//! Syntax kinds for the ClickHouse SQL syntax tree
//!
//! Token kinds come first (the grammar table uses them directly as terminal
//! columns), node kinds follow `SOURCE_FILE`.

/// All syntax kinds: tokens and nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    /// Backtick (or, in identifier mode, double-quote) delimited identifier
    QUOTED_IDENT,
    NUMBER,
    STRING,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    COMMA,
    SEMICOLON,
    DOT,
    COLON,
    COLON_COLON,
    STAR,
    PLUS,
    MINUS,
    SLASH,
    PERCENT,
    EQ,
    BANG_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    ARROW,

    // =========================================================================
    // RESERVED KEYWORDS
    // =========================================================================
    AND_KW,
    AS_KW,
    BY_KW,
    CREATE_KW,
    FROM_KW,
    GROUP_KW,
    IN_KW,
    INSERT_KW,
    INTO_KW,
    IS_KW,
    LIKE_KW,
    LIMIT_KW,
    NOT_KW,
    NULL_KW,
    ON_KW,
    OR_KW,
    ORDER_KW,
    SELECT_KW,
    WHERE_KW,
    WITH_KW,

    // =========================================================================
    // SOFT KEYWORDS (usable as identifiers)
    // =========================================================================
    ALIAS_KW,
    ASC_KW,
    CAST_KW,
    CLUSTER_KW,
    CODEC_KW,
    COMMENT_KW,
    DEFAULT_KW,
    DESC_KW,
    ENGINE_KW,
    EPHEMERAL_KW,
    EXISTS_KW,
    FORMAT_KW,
    IF_KW,
    INTERVAL_KW,
    KEY_KW,
    MATERIALIZED_KW,
    PARTITION_KW,
    PRIMARY_KW,
    SAMPLE_KW,
    SETTINGS_KW,
    TABLE_KW,
    TTL_KW,
    VALUES_KW,

    // =========================================================================
    // CONTEXTUAL WORDS (identifiers reinterpreted by the parser)
    // =========================================================================
    TYPE_IDENT,
    ARRAY_KW,
    TUPLE_KW,
    MAP_KW,
    NESTED_KW,
    NULLABLE_KW,
    ENGINE_IDENT,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    /// Unrecognized character or the opener of an unterminated construct
    UNKNOWN,
    /// End of input; never materialized as a leaf
    EOF,

    // =========================================================================
    // NODES: STATEMENTS
    // =========================================================================
    SOURCE_FILE,
    CREATE_TABLE_STATEMENT,
    ON_CLUSTER_CLAUSE,
    SELECT_STATEMENT,
    WITH_CLAUSE,
    CTE,
    CSE,
    SELECT_CLAUSE,
    FROM_CLAUSE,
    WHERE_CLAUSE,
    GROUP_BY_CLAUSE,
    ORDER_BY_CLAUSE,
    ORDER_BY_ITEM,
    LIMIT_CLAUSE,
    ALIASED_EXPRESSION,
    WILDCARD,
    INSERT_STATEMENT,
    COLUMN_LIST,
    VALUES_CLAUSE,
    VALUE_LIST,
    FORMAT_CLAUSE,

    // =========================================================================
    // NODES: TABLE DEFINITIONS
    // =========================================================================
    QUALIFIED_TABLE_NAME,
    COLUMN_DEFINITION,
    NULL_CONSTRAINT,
    COLUMN_MODIFIER,
    PRIMITIVE_TYPE,
    COMPLEX_TYPE,
    ENGINE_NAME,
    ENGINE_PARAMETERS,
    TABLE_CLAUSE,
    SETTINGS_LIST,
    SETTING_PAIR,
    CODEC_EXPRESSION,

    // =========================================================================
    // NODES: EXPRESSIONS
    // =========================================================================
    BINARY_EXPRESSION,
    UNARY_EXPRESSION,
    FUNCTION_CALL,
    LAMBDA_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    ARRAY_EXPRESSION,
    CAST_EXPRESSION,
    INTERVAL_EXPRESSION,

    // =========================================================================
    // ERROR RECOVERY
    // =========================================================================
    /// Material the parser could not fit into the grammar
    ERROR,
    /// Zero-width marker for a token the parser synthesized
    MISSING,

    #[doc(hidden)]
    __LAST,
}

/// Number of token kinds; every token kind is a valid terminal column.
pub(crate) const TOKEN_KIND_COUNT: usize = SyntaxKind::SOURCE_FILE as usize;

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword (reserved or soft)
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::AND_KW as u16) && (self as u16) <= (Self::VALUES_KW as u16)
    }

    /// Check if this keyword may also be read as an identifier
    pub fn is_soft_keyword(self) -> bool {
        (self as u16) >= (Self::ALIAS_KW as u16) && (self as u16) <= (Self::VALUES_KW as u16)
    }

    /// Check if this kind is only produced by reinterpreting an identifier
    pub fn is_contextual(self) -> bool {
        (self as u16) >= (Self::TYPE_IDENT as u16) && (self as u16) <= (Self::ENGINE_IDENT as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::ARROW as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::IDENT | Self::QUOTED_IDENT | Self::NUMBER | Self::STRING)
    }

    /// Check if this is a token kind (as opposed to a node kind)
    pub fn is_token(self) -> bool {
        (self as usize) < TOKEN_KIND_COUNT
    }

    /// The terminal the grammar sees for a lexed token of this kind.
    pub fn terminal(self) -> SyntaxKind {
        match self {
            Self::QUOTED_IDENT => Self::IDENT,
            kind => kind,
        }
    }
}

/// Human readable name of a kind, used in diagnostics.
pub fn kind_to_name(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        WHITESPACE => "whitespace",
        LINE_COMMENT | BLOCK_COMMENT => "comment",
        IDENT => "identifier",
        QUOTED_IDENT => "quoted identifier",
        NUMBER => "number",
        STRING => "string literal",

        L_PAREN => "'('",
        R_PAREN => "')'",
        L_BRACKET => "'['",
        R_BRACKET => "']'",
        COMMA => "','",
        SEMICOLON => "';'",
        DOT => "'.'",
        COLON => "':'",
        COLON_COLON => "'::'",
        STAR => "'*'",
        PLUS => "'+'",
        MINUS => "'-'",
        SLASH => "'/'",
        PERCENT => "'%'",
        EQ => "'='",
        BANG_EQ => "'!='",
        LT => "'<'",
        GT => "'>'",
        LT_EQ => "'<='",
        GT_EQ => "'>='",
        ARROW => "'->'",

        AND_KW => "'AND'",
        AS_KW => "'AS'",
        BY_KW => "'BY'",
        CREATE_KW => "'CREATE'",
        FROM_KW => "'FROM'",
        GROUP_KW => "'GROUP'",
        IN_KW => "'IN'",
        INSERT_KW => "'INSERT'",
        INTO_KW => "'INTO'",
        IS_KW => "'IS'",
        LIKE_KW => "'LIKE'",
        LIMIT_KW => "'LIMIT'",
        NOT_KW => "'NOT'",
        NULL_KW => "'NULL'",
        ON_KW => "'ON'",
        OR_KW => "'OR'",
        ORDER_KW => "'ORDER'",
        SELECT_KW => "'SELECT'",
        WHERE_KW => "'WHERE'",
        WITH_KW => "'WITH'",
        ALIAS_KW => "'ALIAS'",
        ASC_KW => "'ASC'",
        CAST_KW => "'CAST'",
        CLUSTER_KW => "'CLUSTER'",
        CODEC_KW => "'CODEC'",
        COMMENT_KW => "'COMMENT'",
        DEFAULT_KW => "'DEFAULT'",
        DESC_KW => "'DESC'",
        ENGINE_KW => "'ENGINE'",
        EPHEMERAL_KW => "'EPHEMERAL'",
        EXISTS_KW => "'EXISTS'",
        FORMAT_KW => "'FORMAT'",
        IF_KW => "'IF'",
        INTERVAL_KW => "'INTERVAL'",
        KEY_KW => "'KEY'",
        MATERIALIZED_KW => "'MATERIALIZED'",
        PARTITION_KW => "'PARTITION'",
        PRIMARY_KW => "'PRIMARY'",
        SAMPLE_KW => "'SAMPLE'",
        SETTINGS_KW => "'SETTINGS'",
        TABLE_KW => "'TABLE'",
        TTL_KW => "'TTL'",
        VALUES_KW => "'VALUES'",

        TYPE_IDENT => "type name",
        ARRAY_KW => "'Array'",
        TUPLE_KW => "'Tuple'",
        MAP_KW => "'Map'",
        NESTED_KW => "'Nested'",
        NULLABLE_KW => "'Nullable'",
        ENGINE_IDENT => "engine name",

        UNKNOWN => "unknown character",
        EOF => "end of input",

        SOURCE_FILE => "source file",
        CREATE_TABLE_STATEMENT => "CREATE TABLE statement",
        ON_CLUSTER_CLAUSE => "ON CLUSTER clause",
        SELECT_STATEMENT => "SELECT statement",
        WITH_CLAUSE => "WITH clause",
        CTE => "common table expression",
        CSE => "common scalar expression",
        SELECT_CLAUSE => "SELECT clause",
        FROM_CLAUSE => "FROM clause",
        WHERE_CLAUSE => "WHERE clause",
        GROUP_BY_CLAUSE => "GROUP BY clause",
        ORDER_BY_CLAUSE => "ORDER BY clause",
        ORDER_BY_ITEM => "ORDER BY item",
        LIMIT_CLAUSE => "LIMIT clause",
        ALIASED_EXPRESSION => "aliased expression",
        WILDCARD => "wildcard",
        INSERT_STATEMENT => "INSERT statement",
        COLUMN_LIST => "column list",
        VALUES_CLAUSE => "VALUES clause",
        VALUE_LIST => "value list",
        FORMAT_CLAUSE => "FORMAT clause",
        QUALIFIED_TABLE_NAME => "table name",
        COLUMN_DEFINITION => "column definition",
        NULL_CONSTRAINT => "null constraint",
        COLUMN_MODIFIER => "column modifier",
        PRIMITIVE_TYPE => "primitive type",
        COMPLEX_TYPE => "complex type",
        ENGINE_NAME => "engine name",
        ENGINE_PARAMETERS => "engine parameters",
        TABLE_CLAUSE => "table clause",
        SETTINGS_LIST => "settings list",
        SETTING_PAIR => "setting",
        CODEC_EXPRESSION => "codec expression",
        BINARY_EXPRESSION => "binary expression",
        UNARY_EXPRESSION => "unary expression",
        FUNCTION_CALL => "function call",
        LAMBDA_EXPRESSION => "lambda expression",
        PARENTHESIZED_EXPRESSION => "parenthesized expression",
        ARRAY_EXPRESSION => "array expression",
        CAST_EXPRESSION => "cast expression",
        INTERVAL_EXPRESSION => "interval expression",

        ERROR => "error",
        MISSING => "missing",
        __LAST => "<invalid>",
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: the enum is repr(u16) with contiguous discriminants and the
        // bound is checked above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClickHouseLanguage {}

impl rowan::Language for ClickHouseLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ClickHouseLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ClickHouseLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ClickHouseLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<ClickHouseLanguage>;

/// Recovery-aware helpers on syntax nodes
pub trait SyntaxNodeExt {
    /// Node wraps material discarded during error recovery
    fn is_error(&self) -> bool;
    /// Node is a zero-width synthesized token
    fn is_missing(&self) -> bool;
    /// Node or any descendant is an `ERROR` or `MISSING` node
    fn has_errors(&self) -> bool;
}

impl SyntaxNodeExt for SyntaxNode {
    fn is_error(&self) -> bool {
        self.kind() == SyntaxKind::ERROR
    }

    fn is_missing(&self) -> bool {
        self.kind() == SyntaxKind::MISSING
    }

    fn has_errors(&self) -> bool {
        self.descendants()
            .any(|node| matches!(node.kind(), SyntaxKind::ERROR | SyntaxKind::MISSING))
    }
}
