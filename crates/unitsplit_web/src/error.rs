use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use unitsplit_io_xlsx::{ExportError, LoadError};
use unitsplit_table::{MissingColumnError, TableError};

/// Request-level failure, rendered as `{"success": false, "error": ...}`.
#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    NotFound(String),
    Load(LoadError),
    MissingColumn(MissingColumnError),
    Export(ExportError),
    Io(std::io::Error),
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) | WebError::Load(_) | WebError::MissingColumn(_) => {
                StatusCode::BAD_REQUEST
            }
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Export(_) | WebError::Io(_) | WebError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(msg) | WebError::NotFound(msg) => write!(f, "{msg}"),
            WebError::Load(err) => write!(f, "{err}"),
            WebError::MissingColumn(err) => write!(f, "{err}"),
            WebError::Export(err) => write!(f, "{err}"),
            WebError::Io(err) => write!(f, "I/O error: {err}"),
            WebError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<LoadError> for WebError {
    fn from(err: LoadError) -> Self {
        WebError::Load(err)
    }
}

impl From<MissingColumnError> for WebError {
    fn from(err: MissingColumnError) -> Self {
        WebError::MissingColumn(err)
    }
}

impl From<TableError> for WebError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::MissingColumn(err) => WebError::MissingColumn(err),
            TableError::Frame(msg) => WebError::Internal(msg),
        }
    }
}

impl From<ExportError> for WebError {
    fn from(err: ExportError) -> Self {
        WebError::Export(err)
    }
}

impl From<std::io::Error> for WebError {
    fn from(err: std::io::Error) -> Self {
        WebError::Io(err)
    }
}

impl From<tokio::task::JoinError> for WebError {
    fn from(err: tokio::task::JoinError) -> Self {
        WebError::Internal(format!("worker task failed: {err}"))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", msg);
        } else {
            tracing::warn!(status = status.as_u16(), "Request rejected: {}", msg);
        }
        (status, Json(json!({ "success": false, "error": msg }))).into_response()
    }
}
