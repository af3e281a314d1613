use super::*;

// ============================================================================
// Source file
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Top-level statements in source order
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }
}

/// Any top-level statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    CreateTable(CreateTableStatement),
    Select(SelectStatement),
    Insert(InsertStatement),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::CREATE_TABLE_STATEMENT
                | SyntaxKind::SELECT_STATEMENT
                | SyntaxKind::INSERT_STATEMENT
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::CREATE_TABLE_STATEMENT => {
                CreateTableStatement::cast(node).map(Self::CreateTable)
            }
            SyntaxKind::SELECT_STATEMENT => SelectStatement::cast(node).map(Self::Select),
            SyntaxKind::INSERT_STATEMENT => InsertStatement::cast(node).map(Self::Insert),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::CreateTable(n) => n.syntax(),
            Self::Select(n) => n.syntax(),
            Self::Insert(n) => n.syntax(),
        }
    }
}

impl Statement {
    /// Whether the statement is terminated by `;`
    pub fn has_semicolon(&self) -> bool {
        // The terminator is a sibling in the source file
        self.syntax()
            .siblings_with_tokens(rowan::Direction::Next)
            .skip(1)
            .find(|e| !e.kind().is_trivia())
            .is_some_and(|e| e.kind() == SyntaxKind::SEMICOLON)
    }
}

// ============================================================================
// CREATE TABLE
// ============================================================================

ast_node!(CreateTableStatement, CREATE_TABLE_STATEMENT);

impl CreateTableStatement {
    has_token_method!(if_not_exists, EXISTS_KW);
    first_child_method!(name, QualifiedTableName);
    first_child_method!(on_cluster, OnClusterClause);
    children_method!(columns, ColumnDefinition);
    first_child_method!(engine, EngineName);
    first_child_method!(engine_parameters, EngineParameters);
    children_method!(table_clauses, TableClause);
}

ast_node!(OnClusterClause, ON_CLUSTER_CLAUSE);

impl OnClusterClause {
    pub fn cluster(&self) -> Option<Ident> {
        first_ident(self.0.children_with_tokens())
    }
}

ast_node!(QualifiedTableName, QUALIFIED_TABLE_NAME);

impl QualifiedTableName {
    /// The database part of `db.table`
    pub fn database(&self) -> Option<Ident> {
        if has_token(&self.0, SyntaxKind::DOT) {
            first_ident(elements_before(&self.0, SyntaxKind::DOT))
        } else {
            None
        }
    }

    pub fn table(&self) -> Option<Ident> {
        if has_token(&self.0, SyntaxKind::DOT) {
            first_ident(elements_after(&self.0, SyntaxKind::DOT))
        } else {
            first_ident(self.0.children_with_tokens())
        }
    }
}

// ============================================================================
// SELECT
// ============================================================================

ast_node!(SelectStatement, SELECT_STATEMENT);

impl SelectStatement {
    first_child_method!(with_clause, WithClause);
    first_child_method!(select_clause, SelectClause);
    first_child_method!(from_clause, FromClause);
    first_child_method!(where_clause, WhereClause);
    first_child_method!(group_by_clause, GroupByClause);
    first_child_method!(order_by_clause, OrderByClause);
    first_child_method!(limit_clause, LimitClause);
}

ast_node!(WithClause, WITH_CLAUSE);

impl WithClause {
    children_method!(ctes, Cte);
    children_method!(cses, Cse);
}

ast_node!(Cte, CTE);

impl Cte {
    /// The expression naming the subquery
    pub fn name(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    first_child_method!(query, SelectStatement);
}

ast_node!(Cse, CSE);

impl Cse {
    pub fn expr(&self) -> Option<Expr> {
        elements_before(&self.0, SyntaxKind::AS_KW).find_map(Expr::cast_element)
    }

    pub fn name(&self) -> Option<Ident> {
        first_ident(elements_after(&self.0, SyntaxKind::AS_KW))
    }
}

ast_node!(SelectClause, SELECT_CLAUSE);

impl SelectClause {
    /// The projected items in order
    pub fn items(&self) -> impl Iterator<Item = SelectItem> + '_ {
        self.0.children_with_tokens().filter_map(|element| match element {
            rowan::NodeOrToken::Node(node) => {
                if let Some(wildcard) = Wildcard::cast(node.clone()) {
                    Some(SelectItem::Wildcard(wildcard))
                } else if let Some(aliased) = AliasedExpression::cast(node.clone()) {
                    Some(SelectItem::Aliased(aliased))
                } else {
                    Expr::cast(node).map(SelectItem::Expr)
                }
            }
            token => Expr::cast_element(token).map(SelectItem::Expr),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectItem {
    Wildcard(Wildcard),
    Aliased(AliasedExpression),
    Expr(Expr),
}

ast_node!(Wildcard, WILDCARD);

ast_node!(AliasedExpression, ALIASED_EXPRESSION);

impl AliasedExpression {
    pub fn expr(&self) -> Option<Expr> {
        elements_before(&self.0, SyntaxKind::AS_KW).find_map(Expr::cast_element)
    }

    pub fn alias(&self) -> Option<Ident> {
        first_ident(elements_after(&self.0, SyntaxKind::AS_KW))
    }
}

ast_node!(FromClause, FROM_CLAUSE);

impl FromClause {
    first_child_method!(table, QualifiedTableName);
    first_child_method!(subquery, SelectStatement);
}

ast_node!(WhereClause, WHERE_CLAUSE);

impl WhereClause {
    pub fn condition(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

ast_node!(GroupByClause, GROUP_BY_CLAUSE);

impl GroupByClause {
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.0)
    }
}

ast_node!(OrderByClause, ORDER_BY_CLAUSE);

impl OrderByClause {
    children_method!(items, OrderByItem);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

ast_node!(OrderByItem, ORDER_BY_ITEM);

impl OrderByItem {
    pub fn expr(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    token_to_enum_method!(direction, SortDirection, [
        ASC_KW => Asc,
        DESC_KW => Desc,
    ]);
}

ast_node!(LimitClause, LIMIT_CLAUSE);

impl LimitClause {
    /// The row count, if it is a plain integer
    pub fn limit(&self) -> Option<u64> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::NUMBER)
            .and_then(|t| t.text().parse().ok())
    }
}

// ============================================================================
// INSERT
// ============================================================================

ast_node!(InsertStatement, INSERT_STATEMENT);

impl InsertStatement {
    /// Target table (the identifier after `INTO`)
    pub fn table(&self) -> Option<Ident> {
        first_ident(elements_after(&self.0, SyntaxKind::INTO_KW))
    }

    first_child_method!(columns, ColumnList);
    first_child_method!(values, ValuesClause);
    first_child_method!(query, SelectStatement);
    first_child_method!(format, FormatClause);
}

ast_node!(ColumnList, COLUMN_LIST);

impl ColumnList {
    pub fn names(&self) -> impl Iterator<Item = Ident> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter_map(Ident::cast)
    }
}

ast_node!(ValuesClause, VALUES_CLAUSE);

impl ValuesClause {
    children_method!(rows, ValueList);
}

ast_node!(ValueList, VALUE_LIST);

impl ValueList {
    pub fn values(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.0)
    }
}

ast_node!(FormatClause, FORMAT_CLAUSE);

impl FormatClause {
    pub fn format_name(&self) -> Option<Ident> {
        first_ident(self.0.children_with_tokens())
    }
}
