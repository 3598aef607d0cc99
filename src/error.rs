use thiserror::Error;

use crate::types::FieldKind;

/// Error type for pgmap operations
#[derive(Debug, Error)]
pub enum PgMapError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Cannot map value `{value}` into field {field} ({expected:?})")]
    Mapping {
        field: &'static str,
        value: String,
        expected: FieldKind,
    },

    #[error("Expected {expected} row(s), got {actual}")]
    UnexpectedRowCount { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Entity is not a {expected}")]
    EntityMismatch { expected: &'static str },
}

/// Result type alias for pgmap operations
pub type Result<T> = std::result::Result<T, PgMapError>;
