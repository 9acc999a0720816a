//! Safe routing around active disaster zones.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::persistence::disaster_zones::load_active_zones;
use crate::state::AppState;
use drm_core::RouteResponse;

#[derive(Debug, Deserialize)]
pub struct SafeRouteQuery {
    /// `"lat,lon"`
    pub origin: Option<String>,
    /// `"lat,lon"`
    pub destination: Option<String>,
}

pub async fn safe_route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SafeRouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
    let (origin, destination) = match (query.origin, query.destination) {
        (Some(origin), Some(destination))
            if !origin.trim().is_empty() && !destination.trim().is_empty() =>
        {
            (origin, destination)
        }
        _ => {
            return Err(
                ApiError::bad_request("Missing required parameters: origin, destination")
                    .with_hint("Example: /routing?origin=53.35,-6.26&destination=53.34,-6.25"),
            )
        }
    };

    // Reject bad coordinates before touching the store.
    origin.parse::<drm_core::GeoPoint>()?;
    destination.parse::<drm_core::GeoPoint>()?;

    let scan = load_active_zones(state.pool()).await?;
    let route = state
        .routing()
        .compute_safe_route(&origin, &destination, &scan.zones)
        .await?;
    Ok(Json(route))
}
