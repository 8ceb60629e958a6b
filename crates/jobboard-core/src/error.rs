#![forbid(unsafe_code)]

//! Errors raised at the host boundary.
//!
//! Filtering itself is total: absent controls and fields degrade to empty
//! strings, and "no results" is not an error. Only the edges that decode
//! host-supplied data (JSON records, config, encoded input) can fail.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown input kind: {kind}")]
    UnknownInput { kind: String },

    #[error("input `{kind}` is missing field `{field}`")]
    MissingField { kind: String, field: &'static str },

    #[error("invalid theme: {value}")]
    InvalidTheme { value: String },

    #[error("logging setup failed: {message}")]
    Logging { message: String },
}

impl BoardError {
    #[must_use]
    pub fn unknown_input(kind: impl Into<String>) -> Self {
        Self::UnknownInput { kind: kind.into() }
    }

    #[must_use]
    pub fn missing_field(kind: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            kind: kind.into(),
            field,
        }
    }
}
