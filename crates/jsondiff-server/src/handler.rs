use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use jsondiff_diff::{diff_documents, validate_document, Validation};

use crate::error::ServerResult;

/// Body of `POST /api/v1/utils/json/diff`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiffRequest {
    /// The original document, as text.
    pub json1: String,
    /// The changed document, as text.
    pub json2: String,
}

/// Body of `POST /api/v1/utils/json/validate`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub json_string: String,
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "jsondiff-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Compare two documents and return the added/removed/modified maps.
pub async fn diff_handler(Json(request): Json<DiffRequest>) -> ServerResult<Json<Value>> {
    let result = diff_documents(&request.json1, &request.json2)?;
    tracing::info!(summary = %result.summary(), "json diff");
    Ok(Json(result.to_contract()))
}

/// Validate and pretty-print one document. Malformed input is not an error.
pub async fn validate_handler(Json(request): Json<ValidateRequest>) -> Json<Validation> {
    Json(validate_document(&request.json_string))
}
