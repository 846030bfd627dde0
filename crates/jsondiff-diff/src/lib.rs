//! Structural diff engine for JSON documents.
//!
//! Compares two parsed documents and reports which paths were added,
//! removed, or modified. Objects are compared key by key; arrays and scalars
//! are compared as whole values; a change of kind replaces the whole subtree.
//!
//! # Key Types
//!
//! - [`diff`] -- The engine: two [`JsonValue`]s in, a [`JsonDiff`] out
//! - [`JsonDiff`] / [`Change`] / [`Modification`] -- The three disjoint change maps
//! - [`diff_documents`] / [`validate_document`] -- Text-level entry points
//! - [`DiffError`] -- Parse failures surfaced before the engine runs
//!
//! [`JsonValue`]: jsondiff_types::JsonValue

pub mod document;
pub mod error;
pub mod json_diff;

pub use document::{diff_documents, parse_document, validate_document, Validation};
pub use error::{DiffError, DiffResult, DocumentSide};
pub use json_diff::{diff, Change, DiffSummary, JsonDiff, Modification};
