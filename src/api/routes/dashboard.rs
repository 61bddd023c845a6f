//! Module dashboard endpoint

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
        types::DashboardResponse,
    },
    query::{DashboardParams, load_module_view},
};

/// GET /dashboard/:module
///
/// Latest alerts of a module plus the daily count chart data.
/// Optional query parameters: `from`, `to` (`YYYY-MM-DD`) and `alert_type`.
pub async fn show_dashboard(
    State(state): State<ApiState>,
    Path(module): Path<String>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardResponse>> {
    let view = load_module_view(state.store.as_ref(), &module, &params)
        .await
        .map_err(ApiError::query)?;

    Ok(Json(view.into()))
}
