//! Generic CRUD routes, mounted once per resource collection.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | POST | `/` | 201 + record |
//! | GET | `/` | 200 + array (filters from the query string) |
//! | GET | `/:id` | 200 + record |
//! | PUT, PATCH | `/:id` | 200 + record (partial merge) |
//! | DELETE | `/:id` | 204 (soft delete) |

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query, RawQuery,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use inventario_core::{RecordId, Resource};
use inventario_infra::CrudService;

use crate::app::routes::system::method_not_allowed;
use crate::app::{dto, errors};

pub fn router<R: Resource>(service: CrudService<R>) -> Router {
    Router::new()
        .route(
            "/",
            post(create::<R>).get(list::<R>).fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(fetch::<R>)
                .put(update::<R>)
                .patch(update::<R>)
                .delete(remove::<R>)
                .fallback(method_not_allowed),
        )
        .layer(Extension(service))
}

pub async fn create<R: Resource>(
    Extension(service): Extension<CrudService<R>>,
    body: Result<Json<R::Draft>, JsonRejection>,
) -> axum::response::Response {
    let Json(draft) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };

    match service.create(draft).await {
        Ok(record) => respond(StatusCode::CREATED, dto::record_json(&record)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list<R: Resource>(
    Extension(service): Extension<CrudService<R>>,
    RawQuery(query): RawQuery,
) -> axum::response::Response {
    let filter: R::Filter = match parse_filter(query.as_deref()) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match service.list(&filter).await {
        Ok(records) => respond(StatusCode::OK, dto::records_json(&records)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn fetch<R: Resource>(
    Extension(service): Extension<CrudService<R>>,
    path: Result<Path<String>, PathRejection>,
) -> axum::response::Response {
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match service.get(id.get()).await {
        Ok(record) => respond(StatusCode::OK, dto::record_json(&record)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update<R: Resource>(
    Extension(service): Extension<CrudService<R>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<R::Patch>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };

    match service.update(id.get(), patch).await {
        Ok(record) => respond(StatusCode::OK, dto::record_json(&record)),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn remove<R: Resource>(
    Extension(service): Extension<CrudService<R>>,
    path: Result<Path<String>, PathRejection>,
) -> axum::response::Response {
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match service.soft_delete(id.get()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<RecordId, axum::response::Response> {
    let Path(raw) = path.map_err(errors::path_rejection)?;
    RecordId::parse(&raw).map_err(errors::domain_error_to_response)
}

/// Deserialize list filters. A key with an empty value (`key=` or a bare `key`) counts as absent.
fn parse_filter<F: DeserializeOwned>(raw: Option<&str>) -> Result<F, axum::response::Response> {
    let cleaned = raw
        .unwrap_or_default()
        .split('&')
        .filter(|pair| pair.split_once('=').is_some_and(|(_, value)| !value.is_empty()))
        .collect::<Vec<_>>()
        .join("&");

    let uri: Uri = format!("/?{cleaned}")
        .parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid query string"))?;
    let Query(filter) = Query::<F>::try_from_uri(&uri).map_err(errors::query_rejection)?;
    Ok(filter)
}

fn respond(status: StatusCode, body: Result<Value, serde_json::Error>) -> axum::response::Response {
    match body {
        Ok(v) => (status, Json(v)).into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to encode response: {e}"),
        ),
    }
}
