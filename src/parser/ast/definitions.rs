use super::*;

// ============================================================================
// Columns
// ============================================================================

ast_node!(ColumnDefinition, COLUMN_DEFINITION);

impl ColumnDefinition {
    pub fn name(&self) -> Option<Ident> {
        first_ident(self.0.children_with_tokens())
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.0.children().find_map(DataType::cast)
    }

    first_child_method!(null_constraint, NullConstraint);
    children_method!(modifiers, ColumnModifier);

    /// Text of the `COMMENT '...'` string, unquoted
    pub fn comment(&self) -> Option<String> {
        elements_after(&self.0, SyntaxKind::COMMENT_KW)
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::STRING)
            .map(|t| unquote(t.text()))
    }
}

ast_node!(NullConstraint, NULL_CONSTRAINT);

impl NullConstraint {
    /// `NULL` rather than `NOT NULL`
    pub fn is_nullable(&self) -> bool {
        !has_token(&self.0, SyntaxKind::NOT_KW)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnModifierKind {
    Default,
    Materialized,
    Ephemeral,
    Alias,
    Ttl,
    Codec,
}

ast_node!(ColumnModifier, COLUMN_MODIFIER);

impl ColumnModifier {
    token_to_enum_method!(kind, ColumnModifierKind, [
        DEFAULT_KW => Default,
        MATERIALIZED_KW => Materialized,
        EPHEMERAL_KW => Ephemeral,
        ALIAS_KW => Alias,
        TTL_KW => Ttl,
        CODEC_KW => Codec,
    ]);

    /// The value expression; `None` for `CODEC(...)`
    pub fn expr(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    first_child_method!(codec, CodecExpression);
}

ast_node!(CodecExpression, CODEC_EXPRESSION);

impl CodecExpression {
    /// Codec names in the chain, e.g. `["Delta", "ZSTD"]`
    pub fn codecs(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut depth = 0usize;
        for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_PAREN => depth = depth.saturating_sub(1),
                SyntaxKind::IDENT | SyntaxKind::QUOTED_IDENT if depth == 1 => {
                    names.push(unquote(token.text()));
                }
                _ => {}
            }
        }
        names
    }
}

// ============================================================================
// Data types
// ============================================================================

/// A column or cast target type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Primitive(PrimitiveType),
    Complex(ComplexType),
}

impl AstNode for DataType {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::PRIMITIVE_TYPE | SyntaxKind::COMPLEX_TYPE)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PRIMITIVE_TYPE => PrimitiveType::cast(node).map(Self::Primitive),
            SyntaxKind::COMPLEX_TYPE => ComplexType::cast(node).map(Self::Complex),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Primitive(n) => n.syntax(),
            Self::Complex(n) => n.syntax(),
        }
    }
}

ast_node!(PrimitiveType, PRIMITIVE_TYPE);

impl PrimitiveType {
    pub fn name(&self) -> Option<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::TYPE_IDENT)
            .map(|t| t.text().to_string())
    }

    /// Arguments such as the `9` of `Decimal(9, 2)`
    pub fn parameters(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexTypeKind {
    Array,
    Tuple,
    Map,
    Nested,
    Nullable,
}

ast_node!(ComplexType, COMPLEX_TYPE);

impl ComplexType {
    token_to_enum_method!(kind, ComplexTypeKind, [
        ARRAY_KW => Array,
        TUPLE_KW => Tuple,
        MAP_KW => Map,
        NESTED_KW => Nested,
        NULLABLE_KW => Nullable,
    ]);

    /// Element types; for `Map` the key then the value
    pub fn element_types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.0.children().filter_map(DataType::cast)
    }

    children_method!(nested_columns, ColumnDefinition);
}

// ============================================================================
// Engine and table clauses
// ============================================================================

ast_node!(EngineName, ENGINE_NAME);

impl EngineName {
    pub fn name(&self) -> Option<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::ENGINE_IDENT | SyntaxKind::NULL_KW))
            .map(|t| t.text().to_string())
    }
}

ast_node!(EngineParameters, ENGINE_PARAMETERS);

impl EngineParameters {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableClauseKind {
    PartitionBy,
    OrderBy,
    PrimaryKey,
    SampleBy,
    Ttl,
    Settings,
    Comment,
}

ast_node!(TableClause, TABLE_CLAUSE);

impl TableClause {
    token_to_enum_method!(kind, TableClauseKind, [
        PARTITION_KW => PartitionBy,
        ORDER_KW => OrderBy,
        PRIMARY_KW => PrimaryKey,
        SAMPLE_KW => SampleBy,
        TTL_KW => Ttl,
        SETTINGS_KW => Settings,
        COMMENT_KW => Comment,
    ]);

    /// The key or TTL expression of the clause
    pub fn expr(&self) -> Option<Expr> {
        match self.kind()? {
            TableClauseKind::Settings | TableClauseKind::Comment => None,
            _ => child_exprs(&self.0).next(),
        }
    }

    first_child_method!(settings, SettingsList);

    pub fn comment(&self) -> Option<String> {
        if self.kind()? != TableClauseKind::Comment {
            return None;
        }
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::STRING)
            .map(|t| unquote(t.text()))
    }
}

ast_node!(SettingsList, SETTINGS_LIST);

impl SettingsList {
    children_method!(pairs, SettingPair);
}

ast_node!(SettingPair, SETTING_PAIR);

impl SettingPair {
    pub fn name(&self) -> Option<Ident> {
        first_ident(elements_before(&self.0, SyntaxKind::EQ))
    }

    pub fn value(&self) -> Option<Expr> {
        elements_after(&self.0, SyntaxKind::EQ).find_map(Expr::cast_element)
    }
}
