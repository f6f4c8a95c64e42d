//! Error types for derived data.

use std::path::PathBuf;

use dds_expr::ExprError;
use dds_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A custom field has a blank name.
    #[error("custom field name must not be blank")]
    BlankFieldName,

    /// A custom field would replace an existing column.
    #[error("custom field {name:?} collides with an existing column")]
    FieldNameCollision { name: String },

    /// A custom field's expression does not compile.
    #[error("custom field {field:?}: {source}")]
    Expression {
        field: String,
        #[source]
        source: ExprError,
    },

    /// An ad-hoc expression does not compile.
    #[error("invalid expression: {0}")]
    InvalidExpression(#[from] ExprError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Failed to write an export file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<polars::prelude::PolarsError> for CoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
