//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and one `CrudService` per resource
//! - `routes/`: HTTP routes + handlers (one generic resource router)
//! - `dto.rs`: JSON mapping for stored records
//! - `errors.rs`: consistent `{codigo, mensaje}` error responses

use axum::http::{Method, StatusCode, Uri};
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use inventario_infra::{AppConfig, StoreError};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, StoreError> {
    let services = services::build_services(config).await?;
    Ok(router(services))
}

/// Router over already-wired services.
pub fn router(services: AppServices) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route(
            "/health",
            get(routes::system::health).fallback(routes::system::method_not_allowed),
        )
        .nest("/api", routes::router(services))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn not_found(uri: Uri) -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, format!("no route for {}", uri.path()))
}
