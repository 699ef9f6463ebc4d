//! `POST /upload`

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};

use crate::conf::C_FILE_TYPE_DEFAULT;
use crate::error::WebError;
use crate::spec::{AppState, UploadResponse};
use crate::storage::has_accepted_extension;
use crate::workflow::summarize_upload;

const C_FIELD_FILE: &str = "file";
const C_FIELD_FILE_TYPE: &str = "file_type";

fn derive_multipart_error(err: MultipartError) -> WebError {
    WebError::BadRequest(err.body_text())
}

/// Store an uploaded spreadsheet and report what it contains.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, WebError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut c_file_type = C_FILE_TYPE_DEFAULT.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(derive_multipart_error)?
    {
        let c_name = field.name().unwrap_or_default().to_string();
        match c_name.as_str() {
            C_FIELD_FILE => {
                let c_filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(derive_multipart_error)?;
                file = Some((c_filename, bytes.to_vec()));
            }
            C_FIELD_FILE_TYPE => {
                let c_val = field.text().await.map_err(derive_multipart_error)?;
                if !c_val.is_empty() {
                    c_file_type = c_val;
                }
            }
            _ => {}
        }
    }

    let Some((c_filename, bytes)) = file.filter(|(c_name, _)| !c_name.is_empty()) else {
        return Err(WebError::BadRequest("no file selected".to_string()));
    };
    if !has_accepted_extension(&c_filename) {
        return Err(WebError::BadRequest(
            "please upload an Excel file".to_string(),
        ));
    }

    let path = state.dirs.upload_path(&c_filename)?;
    tokio::fs::create_dir_all(&state.dirs.dir_uploads).await?;
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(
        filename = %c_filename,
        file_type = %c_file_type,
        n_bytes = bytes.len(),
        "Upload stored"
    );

    let path_summary = path.clone();
    let summary = tokio::task::spawn_blocking(move || summarize_upload(&path_summary)).await??;

    Ok(Json(UploadResponse {
        success: true,
        filename: c_filename,
        file_path: path.to_string_lossy().to_string(),
        file_type: c_file_type,
        record_count: summary.record_count,
        college_column: summary.college_column,
        colleges: summary.colleges,
        has_wos: summary.has_wos,
    }))
}
