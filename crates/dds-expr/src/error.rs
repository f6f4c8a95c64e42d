//! Expression compile errors.
//!
//! Positions are byte offsets into the expression source.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    // === Lexical Errors ===
    #[error("unexpected character {found:?} at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("unterminated field reference starting at position {position}")]
    UnterminatedField { position: usize },

    #[error("empty field reference at position {position}")]
    EmptyField { position: usize },

    #[error("invalid number {literal:?} at position {position}")]
    InvalidNumber { literal: String, position: usize },

    // === Syntax Errors ===
    #[error("expression is empty")]
    Empty,

    #[error("expected {expected}, found {found} at position {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("expression nests deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },

    #[error("expression has {tokens} tokens, the limit is {limit}")]
    TooLong { tokens: usize, limit: usize },

    // === Resolution Errors ===
    #[error("unknown field {name:?} at position {position}")]
    UnknownField { name: String, position: usize },

    #[error("unknown function {name:?} at position {position}")]
    UnknownFunction { name: String, position: usize },

    #[error("{function}() takes {expected} argument(s), got {found} at position {position}")]
    Arity {
        function: &'static str,
        expected: String,
        found: usize,
        position: usize,
    },
}

impl ExprError {
    /// Byte offset the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ExprError::Empty | ExprError::TooLong { .. } => None,
            ExprError::UnexpectedChar { position, .. }
            | ExprError::UnterminatedString { position }
            | ExprError::UnterminatedField { position }
            | ExprError::EmptyField { position }
            | ExprError::InvalidNumber { position, .. }
            | ExprError::UnexpectedToken { position, .. }
            | ExprError::TooDeep { position, .. }
            | ExprError::UnknownField { position, .. }
            | ExprError::UnknownFunction { position, .. }
            | ExprError::Arity { position, .. } => Some(*position),
        }
    }

    /// Renders the error with the source line and a caret under the position.
    pub fn format_with_source(&self, source: &str) -> String {
        let Some(position) = self.position() else {
            return self.to_string();
        };
        let column = source
            .get(..position.min(source.len()))
            .map_or(position, |prefix| prefix.chars().count());
        format!("{self}\n  {source}\n  {}^", " ".repeat(column))
    }
}

/// Result type for expression compilation.
pub type Result<T> = std::result::Result<T, ExprError>;
