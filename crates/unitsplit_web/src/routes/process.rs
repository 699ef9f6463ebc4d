//! `POST /process-college`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::error::WebError;
use crate::routes::require_json;
use crate::spec::{AppState, ProcessResponse, SpecProcessRequest};
use crate::workflow::process_college;

/// Split the working table on the selected org unit and write both halves to the output dir.
pub async fn process_selected_college(
    State(state): State<AppState>,
    payload: Result<Json<SpecProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, WebError> {
    let request = require_json(payload)?;
    let dirs = state.dirs.clone();
    let response = tokio::task::spawn_blocking(move || {
        process_college(&dirs, &request.selection, &request.selected_college)
    })
    .await??;

    Ok(Json(response))
}
