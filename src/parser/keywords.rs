//! Keyword and contextual word tables for the ClickHouse dialect
//!
//! SQL keywords are case-insensitive and are recognized by the lexer. Type
//! names and engine names are case-sensitive and stay identifiers until the
//! parser finds that only the contextual reading fits (see [`contextual_kind`]).

use super::syntax_kind::SyntaxKind;

/// Keywords that can never be used as bare identifiers
pub const RESERVED_KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("AND", SyntaxKind::AND_KW),
    ("AS", SyntaxKind::AS_KW),
    ("BY", SyntaxKind::BY_KW),
    ("CREATE", SyntaxKind::CREATE_KW),
    ("FROM", SyntaxKind::FROM_KW),
    ("GROUP", SyntaxKind::GROUP_KW),
    ("IN", SyntaxKind::IN_KW),
    ("INSERT", SyntaxKind::INSERT_KW),
    ("INTO", SyntaxKind::INTO_KW),
    ("IS", SyntaxKind::IS_KW),
    ("LIKE", SyntaxKind::LIKE_KW),
    ("LIMIT", SyntaxKind::LIMIT_KW),
    ("NOT", SyntaxKind::NOT_KW),
    ("NULL", SyntaxKind::NULL_KW),
    ("ON", SyntaxKind::ON_KW),
    ("OR", SyntaxKind::OR_KW),
    ("ORDER", SyntaxKind::ORDER_KW),
    ("SELECT", SyntaxKind::SELECT_KW),
    ("WHERE", SyntaxKind::WHERE_KW),
    ("WITH", SyntaxKind::WITH_KW),
];

/// Keywords that read as identifiers wherever a keyword does not fit
pub const SOFT_KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("ALIAS", SyntaxKind::ALIAS_KW),
    ("ASC", SyntaxKind::ASC_KW),
    ("CAST", SyntaxKind::CAST_KW),
    ("CLUSTER", SyntaxKind::CLUSTER_KW),
    ("CODEC", SyntaxKind::CODEC_KW),
    ("COMMENT", SyntaxKind::COMMENT_KW),
    ("DEFAULT", SyntaxKind::DEFAULT_KW),
    ("DESC", SyntaxKind::DESC_KW),
    ("ENGINE", SyntaxKind::ENGINE_KW),
    ("EPHEMERAL", SyntaxKind::EPHEMERAL_KW),
    ("EXISTS", SyntaxKind::EXISTS_KW),
    ("FORMAT", SyntaxKind::FORMAT_KW),
    ("IF", SyntaxKind::IF_KW),
    ("INTERVAL", SyntaxKind::INTERVAL_KW),
    ("KEY", SyntaxKind::KEY_KW),
    ("MATERIALIZED", SyntaxKind::MATERIALIZED_KW),
    ("PARTITION", SyntaxKind::PARTITION_KW),
    ("PRIMARY", SyntaxKind::PRIMARY_KW),
    ("SAMPLE", SyntaxKind::SAMPLE_KW),
    ("SETTINGS", SyntaxKind::SETTINGS_KW),
    ("TABLE", SyntaxKind::TABLE_KW),
    ("TTL", SyntaxKind::TTL_KW),
    ("VALUES", SyntaxKind::VALUES_KW),
];

/// Scalar type names (case-sensitive)
pub const PRIMITIVE_TYPES: &[&str] = &[
    "UInt8",
    "UInt16",
    "UInt32",
    "UInt64",
    "UInt128",
    "UInt256",
    "Int8",
    "Int16",
    "Int32",
    "Int64",
    "Int128",
    "Int256",
    "Float32",
    "Float64",
    "String",
    "FixedString",
    "Date",
    "Date32",
    "DateTime64",
    "UUID",
    "IPv4",
    "IPv6",
    "Bool",
    "Boolean",
    "Decimal",
    "Decimal32",
    "Decimal64",
    "Decimal128",
    "Decimal256",
    "Enum8",
    "Enum16",
];

/// Type names compared without regard to ASCII case
const CASE_INSENSITIVE_TYPES: &[&str] = &["DateTime"];

/// Parameterized type constructors (case-sensitive)
pub const COMPLEX_TYPES: &[(&str, SyntaxKind)] = &[
    ("Array", SyntaxKind::ARRAY_KW),
    ("Tuple", SyntaxKind::TUPLE_KW),
    ("Map", SyntaxKind::MAP_KW),
    ("Nested", SyntaxKind::NESTED_KW),
    ("Nullable", SyntaxKind::NULLABLE_KW),
];

/// Table engine names (case-sensitive). `Null` lexes as the `NULL` keyword.
pub const ENGINES: &[&str] = &[
    "MergeTree",
    "ReplacingMergeTree",
    "SummingMergeTree",
    "AggregatingMergeTree",
    "CollapsingMergeTree",
    "VersionedCollapsingMergeTree",
    "GraphiteMergeTree",
    "TinyLog",
    "Log",
    "StripeLog",
    "Memory",
    "Set",
    "Join",
    "Buffer",
    "Dictionary",
    "Distributed",
    "MaterializedView",
    "View",
    "File",
    "URL",
    "MySQL",
    "ODBC",
    "JDBC",
    "S3",
    "Kafka",
    "RabbitMQ",
    "PostgreSQL",
    "SQLite",
    "HDFS",
];

/// Look up the keyword kind for an identifier-shaped word (case-insensitive).
pub fn keyword_kind(word: &str) -> Option<SyntaxKind> {
    RESERVED_KEYWORDS
        .iter()
        .chain(SOFT_KEYWORDS)
        .find(|(keyword, _)| keyword.eq_ignore_ascii_case(word))
        .map(|&(_, kind)| kind)
}

/// Check if a word is a reserved keyword
pub fn is_reserved(word: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|(keyword, _)| keyword.eq_ignore_ascii_case(word))
}

/// The contextual reading of an identifier, if it names a type or an engine.
pub fn contextual_kind(word: &str) -> Option<SyntaxKind> {
    if PRIMITIVE_TYPES.contains(&word)
        || CASE_INSENSITIVE_TYPES
            .iter()
            .any(|name| name.eq_ignore_ascii_case(word))
    {
        return Some(SyntaxKind::TYPE_IDENT);
    }
    if let Some(&(_, kind)) = COMPLEX_TYPES.iter().find(|(name, _)| *name == word) {
        return Some(kind);
    }
    if ENGINES.contains(&word) {
        return Some(SyntaxKind::ENGINE_IDENT);
    }
    None
}
