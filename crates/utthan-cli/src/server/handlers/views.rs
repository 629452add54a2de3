//! Dashboard view handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use utthan::{Dashboard, DashboardReport, RecordFilter, Tab, ViewKind};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Build a filter from repeated `ward`, `class` and `school` query pairs.
///
/// Unknown keys are rejected so a typo does not silently widen the view.
pub fn filter_from_query(pairs: &[(String, String)]) -> Result<RecordFilter, ApiError> {
    let mut filter = RecordFilter::new();
    for (key, value) in pairs {
        if value.trim().is_empty() {
            continue;
        }
        filter = match key.as_str() {
            "ward" => filter.with_wards([value]),
            "class" => filter.with_classes([value]),
            "school" => filter.with_schools([value]),
            other => {
                return Err(ApiError::BadRequest(format!(
                    "Unknown filter '{}'. Use ward, class or school.",
                    other
                )));
            }
        };
    }
    Ok(filter)
}

/// All dashboard tabs for the selected filters.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DashboardReport>, ApiError> {
    let filter = filter_from_query(&pairs)?;
    let dataset = state.dataset().await?;
    Ok(Json(Dashboard::new(&dataset, &filter).build()))
}

/// One dashboard tab for the selected filters.
pub async fn get_view(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Tab>, ApiError> {
    let kind: ViewKind = name.parse().map_err(ApiError::NotFound)?;
    let filter = filter_from_query(&pairs)?;
    let dataset = state.dataset().await?;
    Ok(Json(Dashboard::new(&dataset, &filter).build_view(kind)))
}
