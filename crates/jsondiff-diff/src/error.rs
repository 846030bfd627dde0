//! Error types for the diff crate.

use std::fmt;

/// Which input a document-level error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSide {
    /// The original document.
    Before,
    /// The changed document.
    After,
    /// A lone document, as passed to validation.
    Document,
}

impl fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
            Self::Document => f.write_str("document"),
        }
    }
}

/// Errors that can occur before a diff is computed.
///
/// The engine itself is total; only turning text into values can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// One of the inputs is not well-formed JSON.
    #[error("Invalid JSON ({side}): {message}")]
    InvalidJson { side: DocumentSide, message: String },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
