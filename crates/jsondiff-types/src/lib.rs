//! Foundation types for jsondiff.
//!
//! This crate provides the value model the diff engine walks and the path
//! type it reports changes under. Every other jsondiff crate depends on
//! `jsondiff-types`.
//!
//! # Key Types
//!
//! - [`JsonValue`] -- Closed sum type over the six JSON kinds
//! - [`Number`] -- JSON number with numeric (not textual) equality
//! - [`JsonKind`] -- The kind tag of a value, used for type-change detection
//! - [`JsonPath`] / [`PathSegment`] -- Location inside a document, with a
//!   canonical dot/bracket notation

pub mod error;
pub mod number;
pub mod path;
pub mod value;

pub use error::TypeError;
pub use number::Number;
pub use path::{JsonPath, PathSegment};
pub use value::{JsonKind, JsonValue};
