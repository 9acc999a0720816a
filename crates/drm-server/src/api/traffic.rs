//! Traffic flow pass-through.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrafficQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub async fn traffic_flow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrafficQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) if !lat.trim().is_empty() && !lon.trim().is_empty() => (lat, lon),
        _ => return Err(ApiError::bad_request("Latitude and Longitude are required")),
    };

    let body = state.traffic().flow_segment(&lat, &lon).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
