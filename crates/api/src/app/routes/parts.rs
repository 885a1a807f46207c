use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;

use partshop_infra::PartError;

use crate::app::dto::{OperationRequest, OperationResponse, PartOperation};
use crate::app::errors;
use crate::app::services::AppServices;

/// `POST /api`: route one operation to its handler.
///
/// Business failures (validation, not found, store errors) are answered with
/// 200 and an `errors` entry; only malformed envelopes get a 400.
pub async fn execute(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::bad_request(rejection.body_text()),
    };
    let request: OperationRequest = match serde_json::from_value(body) {
        Ok(r) => r,
        Err(e) => return errors::bad_request(format!("invalid operation request: {e}")),
    };
    let operation = match PartOperation::try_from(request) {
        Ok(op) => op,
        Err(msg) => return errors::bad_request(msg),
    };

    let name = operation.name();
    let parts = &services.parts;
    match operation {
        PartOperation::Parts => respond(name, parts.list().await),
        PartOperation::Part { id } => respond(name, parts.get(&id).await),
        PartOperation::AddPart { variables } => respond(name, parts.create_from_json(&variables).await),
        PartOperation::UpdatePart { id, variables } => {
            respond(name, parts.update_from_json(&id, &variables).await)
        }
        PartOperation::RemovePart { id } => respond(name, parts.delete(&id).await),
    }
}

fn respond<T: Serialize>(name: &'static str, result: Result<T, PartError>) -> axum::response::Response {
    let body = match result {
        Ok(value) => OperationResponse::ok(name, value),
        Err(e) => OperationResponse::failed(name, errors::part_error_entry(&e)),
    };
    (StatusCode::OK, Json(body)).into_response()
}
