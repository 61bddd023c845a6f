//! Storage statistics endpoint

use axum::{Json, extract::State};

use crate::api::{error::ApiResult, state::ApiState, types::StatsResponse};

/// GET /api/stats
///
/// Row counts of every alert collection
pub async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.store.get_stats().await?;

    Ok(Json(StatsResponse {
        timestamp: chrono::Utc::now().to_rfc3339(),
        backend: stats.backend.clone(),
        total_alerts: stats.total(),
        collections: stats
            .counts
            .iter()
            .map(|(kind, count)| (kind.collection().to_string(), *count))
            .collect(),
    }))
}
