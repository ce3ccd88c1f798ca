// Domain Error Types

use super::field::FieldKind;
use thiserror::Error;

/// Failure to bind one configuration entry onto a job field
#[derive(Error, Debug)]
pub enum BindError {
    #[error("Field '{field}': invalid URI '{value}': {source}")]
    InvalidUri {
        field: String,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: String,
    },

    #[error("Field '{field}': invalid number '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("Field '{field}': invalid boolean '{value}'")]
    InvalidBoolean { field: String, value: String },

    #[error("Fire time encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Job construction panicked: {0}")]
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, BindError>;
