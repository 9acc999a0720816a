//! Disaster zone endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::ApiError;
use crate::persistence::disaster_zones::{load_active_zones, load_all_zones, SkippedRow};
use crate::state::AppState;
use drm_core::{AvoidanceOutcome, DisasterZone};

/// List all disaster zones.
pub async fn list_zones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DisasterZone>>, ApiError> {
    let scan = load_all_zones(state.pool()).await?;
    Ok(Json(scan.zones))
}

#[derive(Debug, Serialize)]
pub struct AvoidanceModelResponse {
    #[serde(flatten)]
    pub outcome: AvoidanceOutcome,
    /// Incident rows that could not be read as zones
    pub unreadable_rows: Vec<SkippedRow>,
}

/// The custom model safe routes currently carry, built from active zones.
pub async fn avoidance_model(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AvoidanceModelResponse>, ApiError> {
    let scan = load_active_zones(state.pool()).await?;
    let outcome = state.routing().avoidance_outcome(&scan.zones);
    Ok(Json(AvoidanceModelResponse {
        outcome,
        unreadable_rows: scan.skipped,
    }))
}
