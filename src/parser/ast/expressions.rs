use super::*;

// ============================================================================
// Expression
// ============================================================================

/// Any expression.
///
/// Names and literals are tokens in the tree; everything else is a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(FunctionCall),
    Lambda(LambdaExpr),
    Paren(ParenthesizedExpr),
    Array(ArrayExpr),
    Cast(CastExpr),
    Interval(IntervalExpr),
    Name(Ident),
    Literal(Literal),
}

impl Expr {
    /// Cast a composite expression node
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::BINARY_EXPRESSION => Self::Binary(BinaryExpr(node)),
            SyntaxKind::UNARY_EXPRESSION => Self::Unary(UnaryExpr(node)),
            SyntaxKind::FUNCTION_CALL => Self::Call(FunctionCall(node)),
            SyntaxKind::LAMBDA_EXPRESSION => Self::Lambda(LambdaExpr(node)),
            SyntaxKind::PARENTHESIZED_EXPRESSION => Self::Paren(ParenthesizedExpr(node)),
            SyntaxKind::ARRAY_EXPRESSION => Self::Array(ArrayExpr(node)),
            SyntaxKind::CAST_EXPRESSION => Self::Cast(CastExpr(node)),
            SyntaxKind::INTERVAL_EXPRESSION => Self::Interval(IntervalExpr(node)),
            _ => return None,
        };
        Some(expr)
    }

    /// Cast a node or a name/literal token
    pub fn cast_element(element: SyntaxElement) -> Option<Self> {
        match element {
            rowan::NodeOrToken::Node(node) => Self::cast(node),
            rowan::NodeOrToken::Token(token) => {
                if let Some(ident) = Ident::cast(token.clone()) {
                    Some(Self::Name(ident))
                } else {
                    Literal::cast(token).map(Self::Literal)
                }
            }
        }
    }

    pub fn syntax(&self) -> SyntaxElement {
        match self {
            Self::Binary(e) => e.0.clone().into(),
            Self::Unary(e) => e.0.clone().into(),
            Self::Call(e) => e.0.clone().into(),
            Self::Lambda(e) => e.0.clone().into(),
            Self::Paren(e) => e.0.clone().into(),
            Self::Array(e) => e.0.clone().into(),
            Self::Cast(e) => e.0.clone().into(),
            Self::Interval(e) => e.0.clone().into(),
            Self::Name(t) => t.syntax().clone().into(),
            Self::Literal(t) => t.syntax().clone().into(),
        }
    }

    pub fn text_range(&self) -> rowan::TextRange {
        self.syntax().text_range()
    }

    /// Source text of the expression, trivia included
    pub fn text(&self) -> String {
        match self.syntax() {
            rowan::NodeOrToken::Node(node) => node.text().to_string(),
            rowan::NodeOrToken::Token(token) => token.text().to_string(),
        }
    }
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number,
    String,
    Null,
}

ast_token!(Literal, [NUMBER, STRING, NULL_KW]);

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self.0.kind() {
            SyntaxKind::NUMBER => LiteralKind::Number,
            SyntaxKind::STRING => LiteralKind::String,
            _ => LiteralKind::Null,
        }
    }

    /// Contents of a string literal without its quotes
    pub fn string_value(&self) -> Option<String> {
        (self.kind() == LiteralKind::String).then(|| unquote(self.0.text()))
    }
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Like,
    In,
    Is,
    IsNot,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

ast_node!(BinaryExpr, BINARY_EXPRESSION);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        child_exprs(&self.0).nth(1)
    }

    pub fn op(&self) -> Option<BinaryOp> {
        let mut tokens = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia());
        let op = tokens.find_map(|t| {
            let op = match t.kind() {
                SyntaxKind::OR_KW => BinaryOp::Or,
                SyntaxKind::AND_KW => BinaryOp::And,
                SyntaxKind::EQ => BinaryOp::Eq,
                SyntaxKind::BANG_EQ => BinaryOp::NotEq,
                SyntaxKind::LT => BinaryOp::Lt,
                SyntaxKind::GT => BinaryOp::Gt,
                SyntaxKind::LT_EQ => BinaryOp::LtEq,
                SyntaxKind::GT_EQ => BinaryOp::GtEq,
                SyntaxKind::LIKE_KW => BinaryOp::Like,
                SyntaxKind::IN_KW => BinaryOp::In,
                SyntaxKind::IS_KW => BinaryOp::Is,
                SyntaxKind::PLUS => BinaryOp::Add,
                SyntaxKind::MINUS => BinaryOp::Sub,
                SyntaxKind::STAR => BinaryOp::Mul,
                SyntaxKind::SLASH => BinaryOp::Div,
                SyntaxKind::PERCENT => BinaryOp::Rem,
                _ => return None,
            };
            Some(op)
        })?;
        if op == BinaryOp::Is && tokens.next().is_some_and(|t| t.kind() == SyntaxKind::NOT_KW) {
            return Some(BinaryOp::IsNot);
        }
        Some(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

ast_node!(UnaryExpr, UNARY_EXPRESSION);

impl UnaryExpr {
    token_to_enum_method!(op, UnaryOp, [
        MINUS => Neg,
        PLUS => Plus,
        NOT_KW => Not,
    ]);

    pub fn operand(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }
}

// ============================================================================
// Calls and compound expressions
// ============================================================================

ast_node!(FunctionCall, FUNCTION_CALL);

impl FunctionCall {
    pub fn name(&self) -> Option<Ident> {
        first_ident(elements_before(&self.0, SyntaxKind::L_PAREN))
    }

    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        elements_after(&self.0, SyntaxKind::L_PAREN).filter_map(Expr::cast_element)
    }

    /// `count(*)`
    pub fn has_wildcard(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::WILDCARD)
    }
}

ast_node!(LambdaExpr, LAMBDA_EXPRESSION);

impl LambdaExpr {
    /// Parameter names: `x -> ...` or `(x, y) -> ...`
    pub fn params(&self) -> Vec<Ident> {
        let head = elements_before(&self.0, SyntaxKind::ARROW).find_map(Expr::cast_element);
        match head {
            Some(Expr::Name(ident)) => vec![ident],
            Some(Expr::Paren(paren)) => paren
                .exprs()
                .filter_map(|e| match e {
                    Expr::Name(ident) => Some(ident),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<Expr> {
        elements_after(&self.0, SyntaxKind::ARROW).find_map(Expr::cast_element)
    }
}

ast_node!(ParenthesizedExpr, PARENTHESIZED_EXPRESSION);

impl ParenthesizedExpr {
    /// One expression, or several for a tuple
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.0)
    }

    first_child_method!(subquery, SelectStatement);

    pub fn is_tuple(&self) -> bool {
        has_token(&self.0, SyntaxKind::COMMA)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPRESSION);

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.0)
    }
}

ast_node!(CastExpr, CAST_EXPRESSION);

impl CastExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_exprs(&self.0).next()
    }

    pub fn target_type(&self) -> Option<DataType> {
        self.0.children().find_map(DataType::cast)
    }
}

ast_node!(IntervalExpr, INTERVAL_EXPRESSION);

impl IntervalExpr {
    pub fn count(&self) -> Option<u64> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::NUMBER)
            .and_then(|t| t.text().parse().ok())
    }

    /// The unit word, e.g. `DAY`
    pub fn unit(&self) -> Option<Ident> {
        first_ident(self.0.children_with_tokens())
    }
}
