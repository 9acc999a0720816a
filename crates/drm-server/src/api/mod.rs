//! API routes for the DRM server.

pub mod error;
pub mod evacuation;
pub mod request_id;
pub mod safe_route;
pub mod safe_zones;
pub mod traffic;
pub mod zones;

mod routes;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub use error::ApiError;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

/// Fully layered application: routes, request ids, tracing, CORS.
pub fn app(state: Arc<AppState>) -> Router {
    routes()
        .with_state(state)
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests;
