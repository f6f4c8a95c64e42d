use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("column '{name}' already exists")]
    DuplicateColumn { name: String },
    #[error("column '{name}' has {found} values but the table has {expected} rows")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid widget layout: {reason}")]
    InvalidLayout { reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
