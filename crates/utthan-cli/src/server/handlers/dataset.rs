//! Dataset overview handler.

use axum::{Json, extract::State};
use utthan::DatasetSummary;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Source metadata, row count, filter options and missing columns.
pub async fn get_dataset(State(state): State<AppState>) -> Result<Json<DatasetSummary>, ApiError> {
    let dataset = state.dataset().await?;
    Ok(Json(dataset.summary()))
}
