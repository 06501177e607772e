use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use inventario_core::DomainError;
use inventario_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, msg),
        ServiceError::Store(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("internal error: {msg}"),
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    service_error_to_response(err.into())
}

/// Uniform error body: `{"codigo": <status>, "mensaje": <text>}`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "codigo": status.as_u16(),
            "mensaje": message.into(),
        })),
    )
        .into_response()
}

// Extractor failures are client errors regardless of the status axum would pick.

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        format!("invalid request body: {}", rejection.body_text()),
    )
}

pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        format!("invalid query string: {}", rejection.body_text()),
    )
}

pub fn path_rejection(rejection: PathRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        format!("invalid path: {}", rejection.body_text()),
    )
}
