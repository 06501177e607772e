use axum::Json;
use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use crate::app::errors;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for a known path hit with a method it does not serve.
pub async fn method_not_allowed(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> axum::response::Response {
    errors::json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("method {method} not allowed on {}", uri.path()),
    )
}
