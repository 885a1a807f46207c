use axum::{Router, routing::post};

use crate::app::OPERATIONS_PATH;

pub mod parts;
pub mod system;

/// Router for the operation endpoint.
pub fn router() -> Router {
    Router::new().route(OPERATIONS_PATH, post(parts::execute))
}
