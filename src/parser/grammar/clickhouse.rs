//! The ClickHouse SQL grammar
//!
//! Covers `CREATE TABLE`, `SELECT` and `INSERT` statements with the expression
//! language they share. Type and engine names are contextual terminals
//! (`TYPE_IDENT`, `ARRAY_KW`, `ENGINE_IDENT`, ...) that the parse engine reads
//! out of identifiers when the state calls for them.

use std::sync::LazyLock;

use super::builder::GrammarBuilder;
use super::rule::*;
use super::table::Grammar;
use crate::parser::SyntaxKind::{self, *};

/// Operator precedence levels, lowest first
pub mod precedence {
    /// `x -> body`, right associative
    pub const LAMBDA: i32 = 1;
    pub const OR: i32 = 2;
    pub const AND: i32 = 3;
    /// Prefix `NOT`
    pub const NOT: i32 = 4;
    /// `= != < > <= >= LIKE IN IS` and `IS NOT`
    pub const COMPARE: i32 = 5;
    pub const ADDITIVE: i32 = 6;
    pub const MULTIPLICATIVE: i32 = 7;
    /// Prefix `+` and `-`
    pub const UNARY: i32 = 8;
}

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    clickhouse_grammar()
        .build()
        .unwrap_or_else(|err| panic!("built-in ClickHouse grammar is invalid: {err}"))
});

/// The process-wide ClickHouse grammar, generated on first use.
pub fn get_grammar() -> &'static Grammar {
    &GRAMMAR
}

fn expr() -> Rule {
    sym("_expression")
}

fn data_type() -> Rule {
    sym("_data_type")
}

fn parens(inner: Rule) -> Rule {
    seq([token(L_PAREN), inner, token(R_PAREN)])
}

fn binary(level: i32, operator: Rule) -> Rule {
    prec_left(level, seq([expr(), operator, expr()]))
}

/// Rule set of the ClickHouse grammar; `source_file` is the start rule.
pub fn clickhouse_grammar() -> GrammarBuilder {
    let mut g = GrammarBuilder::new("clickhouse");

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    g.node(SOURCE_FILE, repeat(sym("_statement")));
    g.hidden(
        "_statement",
        seq([
            choice([
                node(CREATE_TABLE_STATEMENT),
                node(SELECT_STATEMENT),
                node(INSERT_STATEMENT),
            ]),
            optional(token(SEMICOLON)),
        ]),
    );

    g.node(
        CREATE_TABLE_STATEMENT,
        seq([
            token(CREATE_KW),
            token(TABLE_KW),
            optional(seq([token(IF_KW), token(NOT_KW), token(EXISTS_KW)])),
            node(QUALIFIED_TABLE_NAME),
            optional(node(ON_CLUSTER_CLAUSE)),
            parens(comma_sep1(node(COLUMN_DEFINITION))),
            token(ENGINE_KW),
            token(EQ),
            node(ENGINE_NAME),
            optional(node(ENGINE_PARAMETERS)),
            repeat(node(TABLE_CLAUSE)),
        ]),
    );
    g.node(
        ON_CLUSTER_CLAUSE,
        seq([token(ON_KW), token(CLUSTER_KW), token(IDENT)]),
    );

    // =========================================================================
    // SELECT
    // =========================================================================

    g.node(
        SELECT_STATEMENT,
        seq([
            optional(node(WITH_CLAUSE)),
            node(SELECT_CLAUSE),
            optional(node(FROM_CLAUSE)),
            optional(node(WHERE_CLAUSE)),
            optional(node(GROUP_BY_CLAUSE)),
            optional(node(ORDER_BY_CLAUSE)),
            optional(node(LIMIT_CLAUSE)),
        ]),
    );
    g.node(
        WITH_CLAUSE,
        seq([token(WITH_KW), comma_sep1(choice([node(CTE), node(CSE)]))]),
    );
    g.node(
        CTE,
        seq([expr(), token(AS_KW), parens(node(SELECT_STATEMENT))]),
    );
    g.node(CSE, seq([expr(), token(AS_KW), token(IDENT)]));
    g.node(
        SELECT_CLAUSE,
        seq([
            token(SELECT_KW),
            comma_sep1(choice([node(WILDCARD), node(ALIASED_EXPRESSION), expr()])),
        ]),
    );
    g.node(
        FROM_CLAUSE,
        seq([
            token(FROM_KW),
            choice([node(QUALIFIED_TABLE_NAME), parens(node(SELECT_STATEMENT))]),
        ]),
    );
    g.node(WHERE_CLAUSE, seq([token(WHERE_KW), expr()]));
    g.node(
        GROUP_BY_CLAUSE,
        seq([token(GROUP_KW), token(BY_KW), comma_sep1(expr())]),
    );
    g.node(
        ORDER_BY_CLAUSE,
        seq([token(ORDER_KW), token(BY_KW), comma_sep1(node(ORDER_BY_ITEM))]),
    );
    g.node(
        ORDER_BY_ITEM,
        seq([expr(), optional(choice([token(ASC_KW), token(DESC_KW)]))]),
    );
    g.node(LIMIT_CLAUSE, seq([token(LIMIT_KW), token(NUMBER)]));
    g.node(
        ALIASED_EXPRESSION,
        seq([expr(), token(AS_KW), token(IDENT)]),
    );
    g.node(WILDCARD, token(STAR));

    // =========================================================================
    // INSERT
    // =========================================================================

    g.node(
        INSERT_STATEMENT,
        seq([
            token(INSERT_KW),
            token(INTO_KW),
            token(IDENT),
            optional(node(COLUMN_LIST)),
            choice([
                node(VALUES_CLAUSE),
                node(SELECT_STATEMENT),
                node(FORMAT_CLAUSE),
            ]),
        ]),
    );
    g.node(COLUMN_LIST, parens(comma_sep1(token(IDENT))));
    g.node(
        VALUES_CLAUSE,
        seq([token(VALUES_KW), comma_sep1(node(VALUE_LIST))]),
    );
    g.node(VALUE_LIST, parens(comma_sep1(expr())));
    g.node(FORMAT_CLAUSE, seq([token(FORMAT_KW), token(IDENT)]));

    // =========================================================================
    // TABLE DEFINITIONS
    // =========================================================================

    g.node(
        QUALIFIED_TABLE_NAME,
        choice([
            seq([token(IDENT), token(DOT), token(IDENT)]),
            token(IDENT),
        ]),
    );
    g.node(
        COLUMN_DEFINITION,
        seq([
            token(IDENT),
            data_type(),
            optional(node(NULL_CONSTRAINT)),
            repeat(choice([
                node(COLUMN_MODIFIER),
                seq([token(COMMENT_KW), token(STRING)]),
            ])),
        ]),
    );
    g.node(
        NULL_CONSTRAINT,
        choice([token(NULL_KW), seq([token(NOT_KW), token(NULL_KW)])]),
    );
    g.node(
        COLUMN_MODIFIER,
        choice([
            seq([
                choice([
                    token(DEFAULT_KW),
                    token(MATERIALIZED_KW),
                    token(EPHEMERAL_KW),
                    token(ALIAS_KW),
                    token(TTL_KW),
                ]),
                expr(),
            ]),
            seq([token(CODEC_KW), node(CODEC_EXPRESSION)]),
        ]),
    );
    g.node(
        CODEC_EXPRESSION,
        parens(comma_sep1(seq([
            token(IDENT),
            optional(parens(comma_sep(expr()))),
        ]))),
    );

    g.hidden(
        "_data_type",
        choice([node(PRIMITIVE_TYPE), node(COMPLEX_TYPE)]),
    );
    g.node(
        PRIMITIVE_TYPE,
        seq([token(TYPE_IDENT), optional(parens(comma_sep1(expr())))]),
    );
    g.node(
        COMPLEX_TYPE,
        choice([
            seq([token(ARRAY_KW), parens(data_type())]),
            seq([token(TUPLE_KW), parens(comma_sep(data_type()))]),
            seq([
                token(MAP_KW),
                parens(seq([data_type(), token(COMMA), data_type()])),
            ]),
            seq([token(NESTED_KW), parens(comma_sep1(node(COLUMN_DEFINITION)))]),
            seq([token(NULLABLE_KW), parens(data_type())]),
        ]),
    );

    g.node(ENGINE_NAME, choice([token(ENGINE_IDENT), token(NULL_KW)]));
    g.node(ENGINE_PARAMETERS, parens(comma_sep(expr())));
    g.node(
        TABLE_CLAUSE,
        choice([
            seq([token(PARTITION_KW), token(BY_KW), expr()]),
            seq([token(ORDER_KW), token(BY_KW), expr()]),
            seq([token(PRIMARY_KW), token(KEY_KW), expr()]),
            seq([token(SAMPLE_KW), token(BY_KW), expr()]),
            seq([token(TTL_KW), expr()]),
            seq([token(SETTINGS_KW), node(SETTINGS_LIST)]),
            seq([token(COMMENT_KW), token(STRING)]),
        ]),
    );
    g.node(
        SETTINGS_LIST,
        seq([
            node(SETTING_PAIR),
            repeat(seq([token(COMMA), node(SETTING_PAIR)])),
        ]),
    );
    g.node(SETTING_PAIR, seq([token(IDENT), token(EQ), expr()]));

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    g.hidden(
        "_expression",
        choice([
            node(BINARY_EXPRESSION),
            node(UNARY_EXPRESSION),
            node(FUNCTION_CALL),
            node(LAMBDA_EXPRESSION),
            node(PARENTHESIZED_EXPRESSION),
            node(ARRAY_EXPRESSION),
            node(CAST_EXPRESSION),
            node(INTERVAL_EXPRESSION),
            token(IDENT),
            token(NUMBER),
            token(STRING),
            token(NULL_KW),
        ]),
    );

    use precedence::*;
    let compare = [EQ, BANG_EQ, LT, GT, LT_EQ, GT_EQ, LIKE_KW, IN_KW, IS_KW];
    let mut binaries = vec![
        binary(OR, token(OR_KW)),
        binary(AND, token(AND_KW)),
        binary(COMPARE, seq([token(IS_KW), token(NOT_KW)])),
        binary(ADDITIVE, choice([token(PLUS), token(MINUS)])),
        binary(MULTIPLICATIVE, choice([token(STAR), token(SLASH), token(PERCENT)])),
    ];
    binaries.extend(compare.map(|kind: SyntaxKind| binary(COMPARE, token(kind))));
    g.node(BINARY_EXPRESSION, choice(binaries));

    g.node(
        UNARY_EXPRESSION,
        choice([
            prec_left(UNARY, seq([choice([token(MINUS), token(PLUS)]), expr()])),
            prec_left(NOT, seq([token(NOT_KW), expr()])),
        ]),
    );
    g.node(
        FUNCTION_CALL,
        seq([
            token(IDENT),
            parens(comma_sep(choice([node(WILDCARD), expr()]))),
        ]),
    );
    g.node(
        LAMBDA_EXPRESSION,
        prec_right(LAMBDA, seq([expr(), token(ARROW), expr()])),
    );
    g.node(
        PARENTHESIZED_EXPRESSION,
        choice([parens(node(SELECT_STATEMENT)), parens(comma_sep1(expr()))]),
    );
    g.node(
        ARRAY_EXPRESSION,
        seq([token(L_BRACKET), comma_sep(expr()), token(R_BRACKET)]),
    );
    g.node(
        CAST_EXPRESSION,
        seq([
            choice([token(CAST_KW), token(COLON_COLON)]),
            parens(seq([expr(), token(AS_KW), data_type()])),
        ]),
    );
    g.node(
        INTERVAL_EXPRESSION,
        seq([token(INTERVAL_KW), token(NUMBER), token(IDENT)]),
    );

    g
}
