//! Custom-field expression language.
//!
//! Expressions are compiled once against the columns of a table and then
//! evaluated per row by a tree-walking interpreter. Nothing is ever handed to
//! a host evaluator.
//!
//! ```
//! use dds_expr::{Value, compile};
//! use dds_model::Row;
//!
//! let expr = compile("round([Unit Price] * qty, 1)", &["Unit Price", "qty"]).unwrap();
//! let row: Row = [("Unit Price", "2,5"), ("qty", "3")].into_iter().collect();
//! assert_eq!(expr.evaluate(&row), Value::Number(7.5));
//! ```

pub mod ast;
mod error;
mod eval;
pub mod functions;
mod lexer;
mod parser;
mod precedence;
mod token;
mod value;

use dds_model::Row;

pub use error::{ExprError, Result};
pub use parser::parse;
pub use value::Value;

use ast::Expr;

/// A parsed expression whose field references all name existing columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    expr: Expr,
}

/// Parses `source` and resolves its field references against `columns`.
///
/// A field matches a column by exact name, or case-insensitively when exactly
/// one column matches that way.
pub fn compile<S: AsRef<str>>(source: &str, columns: &[S]) -> Result<Expression> {
    let mut expr = parse(source)?;
    resolve(&mut expr, columns)?;
    tracing::debug!(expression = source, "compiled expression");
    Ok(Expression {
        source: source.to_string(),
        expr,
    })
}

impl Expression {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct column names referenced, in order of first use.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        self.expr.visit_fields(&mut |name, _| {
            if !fields.contains(&name) {
                fields.push(name);
            }
        });
        fields
    }

    pub fn evaluate(&self, row: &Row) -> Value {
        eval::evaluate(&self.expr, row)
    }
}

fn resolve<S: AsRef<str>>(expr: &mut Expr, columns: &[S]) -> Result<()> {
    match expr {
        Expr::Literal(_) => Ok(()),
        Expr::Field { name, position } => {
            let resolved =
                resolve_column(name, columns).ok_or_else(|| ExprError::UnknownField {
                    name: name.clone(),
                    position: *position,
                })?;
            *name = resolved;
            Ok(())
        }
        Expr::Unary { operand, .. } => resolve(operand, columns),
        Expr::Binary { left, right, .. } => {
            resolve(left, columns)?;
            resolve(right, columns)
        }
        Expr::Call { args, .. } => args.iter_mut().try_for_each(|arg| resolve(arg, columns)),
    }
}

fn resolve_column<S: AsRef<str>>(name: &str, columns: &[S]) -> Option<String> {
    if let Some(exact) = columns.iter().find(|c| c.as_ref() == name) {
        return Some(exact.as_ref().to_string());
    }
    let mut matches = columns
        .iter()
        .filter(|c| c.as_ref().eq_ignore_ascii_case(name));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.as_ref().to_string()),
        _ => None,
    }
}
