//! Expression parsing: operator precedence and associativity
//!
//! Each case renders the parsed expression fully parenthesized so the
//! grouping chosen by the parse tables is visible in the assertion.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use crate::helpers::tree_assertions::*;
use chsyntax::parse;
use chsyntax::parser::ast::*;
use rstest::rstest;

fn first_item(text: &str) -> Expr {
    let parse = parse(text);
    assert!(parse.ok(), "errors for {text:?}: {:?}", parse.errors());
    assert_well_formed(&parse);
    let root = SourceFile::cast(parse.syntax()).unwrap();
    let Some(Statement::Select(select)) = root.statements().next() else {
        panic!("expected SELECT");
    };
    match select.select_clause().unwrap().items().next() {
        Some(SelectItem::Expr(expr)) => expr,
        other => panic!("expected expression, got {other:?}"),
    }
}

fn op_text(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Or => "OR",
        BinaryOp::And => "AND",
        BinaryOp::Eq => "=",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::LtEq => "<=",
        BinaryOp::GtEq => ">=",
        BinaryOp::Like => "LIKE",
        BinaryOp::In => "IN",
        BinaryOp::Is => "IS",
        BinaryOp::IsNot => "IS NOT",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
    }
}

/// Fully parenthesized rendering of an expression
fn render(expr: &Expr) -> String {
    match expr {
        Expr::Binary(binary) => format!(
            "({} {} {})",
            render(&binary.lhs().unwrap()),
            op_text(binary.op().unwrap()),
            render(&binary.rhs().unwrap())
        ),
        Expr::Unary(unary) => {
            let op = match unary.op().unwrap() {
                UnaryOp::Neg => "-",
                UnaryOp::Plus => "+",
                UnaryOp::Not => "NOT ",
            };
            format!("({op}{})", render(&unary.operand().unwrap()))
        }
        Expr::Lambda(lambda) => {
            let params: Vec<_> = lambda.params().iter().map(|p| p.name()).collect();
            format!("({} -> {})", params.join(", "), render(&lambda.body().unwrap()))
        }
        Expr::Paren(paren) => {
            let inner: Vec<_> = paren.exprs().map(|e| render(&e)).collect();
            format!("[{}]", inner.join(", "))
        }
        Expr::Call(call) => {
            let args: Vec<_> = call.args().map(|e| render(&e)).collect();
            format!("{}({})", call.name().unwrap().text(), args.join(", "))
        }
        other => other.text(),
    }
}

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("1 * 2 + 3", "((1 * 2) + 3)")]
#[case("1 - 2 - 3", "((1 - 2) - 3)")]
#[case("8 / 4 % 3", "((8 / 4) % 3)")]
#[case("a OR b AND c", "(a OR (b AND c))")]
#[case("a AND b OR c", "((a AND b) OR c)")]
#[case("NOT a AND b", "((NOT a) AND b)")]
#[case("NOT a = b", "(NOT (a = b))")]
#[case("a = b AND c != d", "((a = b) AND (c != d))")]
#[case("a + 1 > b * 2", "((a + 1) > (b * 2))")]
#[case("-a * b", "((-a) * b)")]
#[case("- -a", "(-(-a))")]
#[case("a IS NOT NULL AND b IS NULL", "((a IS NOT NULL) AND (b IS NULL))")]
#[case("a LIKE 'x%' OR a IN (1, 2)", "((a LIKE 'x%') OR (a IN [1, 2]))")]
#[case("(1 + 2) * 3", "([(1 + 2)] * 3)")]
#[case("f(a + 1, g(b))", "f((a + 1), g(b))")]
#[case("x -> x + 1", "(x -> (x + 1))")]
#[case("x -> y -> x + y", "(x -> (y -> (x + y)))")]
#[case("(a, b) -> a OR b", "(a, b -> (a OR b))")]
fn test_precedence(#[case] text: &str, #[case] expected: &str) {
    let expr = first_item(&format!("SELECT {text}"));
    assert_eq!(render(&expr), expected);
}

#[test]
fn test_array_and_cast() {
    let Expr::Array(array) = first_item("SELECT [1, 2, 3]") else {
        panic!("expected array");
    };
    assert_eq!(array.elements().count(), 3);

    let Expr::Cast(cast) = first_item("SELECT CAST(x AS Nullable(String))") else {
        panic!("expected cast");
    };
    assert_eq!(cast.expr().unwrap().text(), "x");
    assert!(matches!(cast.target_type(), Some(DataType::Complex(_))));
}

#[test]
fn test_interval() {
    let Expr::Interval(interval) = first_item("SELECT INTERVAL 3 HOUR") else {
        panic!("expected interval");
    };
    assert_eq!(interval.count(), Some(3));
    assert_eq!(interval.unit().unwrap().text(), "HOUR");
}

#[test]
fn test_literals() {
    let Expr::Literal(string) = first_item("SELECT 'it''s'") else {
        panic!("expected literal");
    };
    assert_eq!(string.kind(), LiteralKind::String);
    assert_eq!(string.string_value().as_deref(), Some("it's"));

    let Expr::Literal(null) = first_item("SELECT NULL") else {
        panic!("expected literal");
    };
    assert_eq!(null.kind(), LiteralKind::Null);
    assert_eq!(null.string_value(), None);
}

#[test]
fn test_subquery_expression() {
    let Expr::Binary(binary) = first_item("SELECT a IN (SELECT b FROM t)") else {
        panic!("expected binary");
    };
    let Some(Expr::Paren(paren)) = binary.rhs() else {
        panic!("expected parenthesized subquery");
    };
    assert!(paren.subquery().is_some());
    assert_eq!(paren.exprs().count(), 0);
}
