use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use partshop_infra::PartError;

use crate::app::dto::{ErrorEntry, ErrorExtensions};

/// Render a handler failure as a business-level error entry.
pub fn part_error_entry(err: &PartError) -> ErrorEntry {
    let (code, violations) = match err {
        PartError::Validation { source, .. } => ("BAD_USER_INPUT", source.violations().to_vec()),
        PartError::NotFound { .. } => ("NOT_FOUND", Vec::new()),
        PartError::Store { .. } => ("INTERNAL_SERVER_ERROR", Vec::new()),
    };
    ErrorEntry {
        message: err.to_string(),
        extensions: ErrorExtensions { code, violations },
    }
}

/// Transport-level failure (malformed request), answered with HTTP 400.
pub fn bad_request(message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "errors": [{
                "message": message.into(),
                "extensions": { "code": "BAD_REQUEST" },
            }],
        })),
    )
        .into_response()
}
