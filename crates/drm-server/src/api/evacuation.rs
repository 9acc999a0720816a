//! Evacuation routing.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::state::AppState;
use drm_core::{GeoPoint, RouteResponse};

#[derive(Debug, Deserialize)]
pub struct EvacuationRequest {
    /// `[lat, lon]` of the hazard
    pub danger_point: [f64; 2],
    /// Incident category used to pick a safe zone
    pub incident_type_id: i64,
    /// `[lat, lon]` destination; defaults to the nearest safe zone
    #[serde(default)]
    pub safe_point: Option<[f64; 2]>,
}

pub async fn evacuation_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EvacuationRequest>, JsonRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid request payload: {}", rejection.body_text()))
    })?;

    let route = state
        .routing()
        .compute_evacuation_route(
            GeoPoint::from_lat_lon(req.danger_point),
            req.incident_type_id,
            req.safe_point.map(GeoPoint::from_lat_lon),
        )
        .await?;
    Ok(Json(route))
}
