//! `GET /download/{filename}`

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use unitsplit_io_xlsx::C_MIME_XLSX;

use crate::error::WebError;
use crate::spec::AppState;
use crate::util::derive_attachment_disposition;

/// Stream a generated workbook as an attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, WebError> {
    let Some(path) = state.dirs.resolve_output(&filename) else {
        return Err(WebError::NotFound(format!("file not found: {filename}")));
    };
    let file = tokio::fs::File::open(&path).await?;
    let n_bytes = file.metadata().await?.len();
    tracing::info!(filename = %filename, n_bytes, "Download served");

    Ok((
        [
            (header::CONTENT_TYPE, C_MIME_XLSX.to_string()),
            (header::CONTENT_LENGTH, n_bytes.to_string()),
            (
                header::CONTENT_DISPOSITION,
                derive_attachment_disposition(&filename),
            ),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
