//! `POST /get-college-statistics`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::error::WebError;
use crate::routes::require_json;
use crate::spec::{AppState, SpecSelectionRequest, StatisticsResponse};
use crate::workflow::derive_college_statistics;

pub async fn get_college_statistics(
    State(state): State<AppState>,
    payload: Result<Json<SpecSelectionRequest>, JsonRejection>,
) -> Result<Json<StatisticsResponse>, WebError> {
    let request = require_json(payload)?;
    let dirs = state.dirs.clone();
    let college_stats =
        tokio::task::spawn_blocking(move || derive_college_statistics(&dirs, &request)).await??;

    Ok(Json(StatisticsResponse {
        success: true,
        college_stats,
    }))
}
