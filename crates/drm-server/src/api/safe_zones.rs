//! Safe zone registry endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::persistence::safe_zones::{insert_safe_zone, load_all_safe_zones};
use crate::state::AppState;
use drm_core::{NewSafeZone, SafeZone};

#[derive(Debug, Serialize)]
pub struct CreateSafeZoneResponse {
    pub message: String,
    pub zone_id: i64,
    pub zone_name: String,
}

/// List all registered safe zones.
pub async fn list_safe_zones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SafeZone>>, ApiError> {
    Ok(Json(load_all_safe_zones(state.pool()).await?))
}

/// Register a new safe zone.
pub async fn create_safe_zone(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewSafeZone>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateSafeZoneResponse>), ApiError> {
    let Json(zone) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid payload: {}", rejection.body_text()))
    })?;

    let errors = zone.validate();
    if !errors.is_empty() {
        return Err(ApiError::bad_request(errors.join("; ")));
    }

    let zone_id = insert_safe_zone(state.pool(), &zone).await?;
    tracing::info!("Created safe zone '{}' ({})", zone.zone_name, zone_id);

    Ok((
        StatusCode::CREATED,
        Json(CreateSafeZoneResponse {
            message: "Safe zone created successfully".to_string(),
            zone_id,
            zone_name: zone.zone_name,
        }),
    ))
}
