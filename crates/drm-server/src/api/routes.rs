//! REST API routes.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{evacuation, safe_route, safe_zones, traffic, zones};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/zones", get(zones::list_zones))
        .route("/avoidance-model", get(zones::avoidance_model))
        .route("/routing", get(safe_route::safe_route))
        .route("/evacuation", post(evacuation::evacuation_route))
        .route(
            "/safe-zones",
            get(safe_zones::list_safe_zones).post(safe_zones::create_safe_zone),
        )
        .route("/traffic", get(traffic::traffic_flow))
}
