//! Tree-walking interpreter.
//!
//! Evaluation is total: operands that do not fit an operator produce `Null`
//! rather than an error.

use std::cmp::Ordering;

use dds_model::Row;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::value::Value;

pub fn evaluate(expr: &Expr, row: &Row) -> Value {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Field { name, .. } => Value::from_cell(row.get(name)),
        Expr::Unary { op, operand } => unary(*op, evaluate(operand, row)),
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => Value::Bool(evaluate(left, row).is_truthy() && evaluate(right, row).is_truthy()),
        Expr::Binary {
            op: BinaryOp::Or,
            left,
            right,
        } => Value::Bool(evaluate(left, row).is_truthy() || evaluate(right, row).is_truthy()),
        Expr::Binary { op, left, right } => {
            binary(*op, evaluate(left, row), evaluate(right, row))
        }
        Expr::Call { function, args } => {
            function.call(args.iter().map(|arg| evaluate(arg, row)).collect())
        }
    }
}

fn unary(op: UnaryOp, value: Value) -> Value {
    match op {
        UnaryOp::Neg => value
            .as_number()
            .map_or(Value::Null, |n| Value::number(-n)),
        UnaryOp::Plus => value.as_number().map_or(Value::Null, Value::Number),
        UnaryOp::Not if value.is_null() => Value::Null,
        UnaryOp::Not => Value::Bool(!value.is_truthy()),
    }
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Value {
    match op {
        BinaryOp::Concat => Value::Text(left.as_text() + &right.as_text()),
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => left
            .compare(&right)
            .map_or(Value::Null, |ordering| Value::Bool(holds(op, ordering))),
        _ => {
            let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
                return Value::Null;
            };
            arithmetic(op, a, b)
        }
    }
}

fn holds(op: BinaryOp, ordering: Ordering) -> bool {
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => false,
    }
}

fn arithmetic(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::number(a + b),
        BinaryOp::Sub => Value::number(a - b),
        BinaryOp::Mul => Value::number(a * b),
        BinaryOp::Div | BinaryOp::Rem if b == 0.0 => Value::Null,
        BinaryOp::Div => Value::number(a / b),
        BinaryOp::Rem => Value::number(a % b),
        BinaryOp::Pow => Value::number(a.powf(b)),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval(source: &str) -> Value {
        let row: Row = [("qty", "3"), ("price", "1.200"), ("name", "Widget"), ("blank", "")]
            .into_iter()
            .collect();
        evaluate(&parse(source).unwrap(), &row)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval("2 ^ 3 ^ 2"), Value::Number(512.0));
        assert_eq!(eval("-2 ^ 2"), Value::Number(4.0));
        assert_eq!(eval("7 % 4"), Value::Number(3.0));
        assert_eq!(eval("qty * price"), Value::Number(3600.0));
    }

    #[test]
    fn test_division_by_zero_is_null() {
        assert_eq!(eval("1 / 0"), Value::Null);
        assert_eq!(eval("1 % 0"), Value::Null);
        assert_eq!(eval("10 ^ 400"), Value::Null);
    }

    #[test]
    fn test_null_propagation() {
        assert_eq!(eval("blank + 1"), Value::Null);
        assert_eq!(eval("name * 2"), Value::Null);
        assert_eq!(eval("missing = 1"), Value::Null);
        assert_eq!(eval("not null"), Value::Null);
        assert_eq!(eval("coalesce(blank, 0) + 1"), Value::Number(1.0));
    }

    #[test]
    fn test_comparison_and_logic() {
        assert_eq!(eval("qty > 2 and name = 'Widget'"), Value::Bool(true));
        assert_eq!(eval("qty = '3'"), Value::Bool(true));
        assert_eq!(eval("'10' > '9'"), Value::Bool(true));
        assert_eq!(eval("'b' > 'a'"), Value::Bool(true));
        assert_eq!(eval("blank or qty"), Value::Bool(true));
        assert_eq!(eval("!(qty <> 3)"), Value::Bool(true));
    }

    #[test]
    fn test_concat() {
        assert_eq!(eval("name & '-' & qty"), Value::Text("Widget-3".to_string()));
        assert_eq!(eval("name & blank"), Value::Text("Widget".to_string()));
        assert_eq!(eval("1 + 1 & 'x'"), Value::Text("2x".to_string()));
    }
}
