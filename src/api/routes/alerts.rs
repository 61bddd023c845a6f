//! Alert ingestion endpoint

use axum::{Json, body::Bytes, extract::State};

use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
    types::StoreResponse,
};

/// POST /api/alerts
///
/// Decode, validate and store one alert event
pub async fn receive_alert(
    State(state): State<ApiState>,
    body: Bytes,
) -> ApiResult<Json<StoreResponse>> {
    let inserted = state
        .dispatcher
        .dispatch_json(&body)
        .await
        .map_err(ApiError::ingest)?;

    Ok(Json(inserted.into()))
}
