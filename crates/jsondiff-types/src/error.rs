use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    #[error("non-finite number: {0}")]
    NonFiniteNumber(f64),
}

impl TypeError {
    pub(crate) fn invalid_path(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
