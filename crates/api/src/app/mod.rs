//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring (Postgres or in-memory) behind the part handlers
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: operation envelope and response shapes
//! - `errors.rs`: consistent error entries and transport-level failures

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Path of the operation endpoint.
pub const OPERATIONS_PATH: &str = "/api";

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
