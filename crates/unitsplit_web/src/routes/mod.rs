//! HTTP handlers, one module per endpoint.

pub mod download;
pub mod process;
pub mod statistics;
pub mod upload;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::WebError;

/// Unwrap a JSON body, turning malformed payloads into a `400` with the JSON error shape.
pub(crate) fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, WebError> {
    payload
        .map(|Json(val)| val)
        .map_err(|rejection| WebError::BadRequest(rejection.body_text()))
}
