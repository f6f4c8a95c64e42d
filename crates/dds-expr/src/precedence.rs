//! Operator precedence levels for the Pratt parser.

use crate::ast::BinaryOp;

/// Precedence levels (higher binds tighter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    #[default]
    Lowest = 1,
    /// `or`, `||`
    Or = 2,
    /// `and`, `&&`
    And = 3,
    /// Prefix `not`, `!`
    Not = 4,
    /// `=`, `!=`, `<`, `<=`, `>`, `>=`
    Compare = 5,
    /// `&`
    Concat = 6,
    /// `+`, `-`
    Sum = 7,
    /// `*`, `/`, `%`
    Product = 8,
    /// `^`, right associative
    Power = 9,
    /// Prefix `-`, `+`
    Prefix = 10,
}

impl Precedence {
    pub fn for_operator(op: BinaryOp) -> Precedence {
        match op {
            BinaryOp::Or => Precedence::Or,
            BinaryOp::And => Precedence::And,
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => Precedence::Compare,
            BinaryOp::Concat => Precedence::Concat,
            BinaryOp::Add | BinaryOp::Sub => Precedence::Sum,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => Precedence::Product,
            BinaryOp::Pow => Precedence::Power,
        }
    }

    /// Binding level for the right operand of `op`.
    ///
    /// Right-associative operators parse their right side one level lower so
    /// that an operator of the same level is absorbed into it.
    pub fn right_operand(op: BinaryOp) -> Precedence {
        match op {
            BinaryOp::Pow => Precedence::Product,
            other => Precedence::for_operator(other),
        }
    }
}
