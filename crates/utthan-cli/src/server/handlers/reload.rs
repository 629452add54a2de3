//! Snapshot reload handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for the reload endpoint.
#[derive(Serialize)]
pub struct ReloadResponse {
    /// Rows in the new snapshot.
    pub row_count: usize,
    /// Content hash of the reloaded file.
    pub hash: String,
    /// When the new snapshot was loaded (RFC 3339).
    pub loaded_at: String,
}

/// Rebuild the snapshot from the source file and publish it.
///
/// A failed reload answers with the error and leaves the previous snapshot
/// in place.
pub async fn reload_dataset(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let dataset = state.reload().await?;
    let source = dataset.source();
    Ok(Json(ReloadResponse {
        row_count: dataset.len(),
        hash: source.hash.clone(),
        loaded_at: source.loaded_at.to_rfc3339(),
    }))
}
