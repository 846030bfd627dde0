use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler;

/// Mount point of the JSON tools, matching the dashboard's API client.
pub const JSON_TOOLS_PREFIX: &str = "/api/v1/utils/json";

fn json_tools() -> Router {
    Router::new()
        .route("/diff", post(handler::diff_handler))
        .route("/validate", post(handler::validate_handler))
}

/// Build the axum router with all endpoints and middleware.
pub fn build_router(config: &ServerConfig) -> ServerResult<Router> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| ServerError::Config(format!("invalid CORS origin {origin:?}: {e}")))
        })
        .collect::<ServerResult<Vec<_>>>()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(handler::health_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .nest(JSON_TOOLS_PREFIX, json_tools())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
