//! HTTP service for jsondiff.
//!
//! Exposes the structural diff engine and the JSON validator over a small
//! JSON API, with CORS, request tracing, and a body size limit.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{DiffRequest, ValidateRequest};
pub use server::JsonDiffServer;
