//! Route orchestration: safe routes around disaster zones and evacuation
//! routes to the nearest safe zone.

use drm_core::{
    AvoidanceOutcome, CircleRasterizer, DisasterZone, GeoPoint, RouteRequest, RouteResponse,
    RoutingResult,
};
use drm_graphhopper::GraphHopperClient;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::persistence::safe_zones::find_nearest_safe_zone;

/// Builds routing-engine requests and hands back the engine's response.
///
/// Holds no per-request state; clones share the HTTP and database pools.
#[derive(Clone)]
pub struct RoutingService {
    engine: GraphHopperClient,
    pool: SqlitePool,
    rasterizer: CircleRasterizer,
}

impl RoutingService {
    pub fn new(engine: GraphHopperClient, pool: SqlitePool) -> Self {
        Self {
            engine,
            pool,
            rasterizer: CircleRasterizer::default(),
        }
    }

    pub fn from_config(config: &Config, pool: SqlitePool) -> RoutingResult<Self> {
        let engine = GraphHopperClient::new(
            &config.graphhopper_url,
            &config.graphhopper_key,
            config.upstream_timeout(),
        )?;
        Ok(Self::new(engine, pool).with_rasterizer(CircleRasterizer::new(config.circle_segments)))
    }

    pub fn with_rasterizer(mut self, rasterizer: CircleRasterizer) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Avoidance model for `zones`, with the zones that produced no geometry.
    pub fn avoidance_outcome(&self, zones: &[DisasterZone]) -> AvoidanceOutcome {
        self.rasterizer.build_outcome(zones)
    }

    /// Car route from `origin` to `destination` (both `"lat,lon"`) that
    /// avoids every non-degenerate zone in `zones`.
    ///
    /// Coordinates are validated before anything is sent upstream.
    pub async fn compute_safe_route(
        &self,
        origin: &str,
        destination: &str,
        zones: &[DisasterZone],
    ) -> RoutingResult<RouteResponse> {
        let origin: GeoPoint = origin.parse()?;
        let destination: GeoPoint = destination.parse()?;

        let outcome = self.avoidance_outcome(zones);
        if !outcome.skipped.is_empty() {
            tracing::debug!(
                "Skipped {} degenerate zone(s) while building avoidance model",
                outcome.skipped.len()
            );
        }
        tracing::info!(
            "Safe route {} -> {} avoiding {} zone(s)",
            origin,
            destination,
            outcome.model.areas.features.len()
        );

        let request = RouteRequest::safe_route(origin, destination, outcome.model);
        self.engine.route(&request).await
    }

    /// Walking route away from `danger_point`.
    ///
    /// Without an explicit `destination` the nearest safe zone registered
    /// for `incident_type_id` is used.
    pub async fn compute_evacuation_route(
        &self,
        danger_point: GeoPoint,
        incident_type_id: i64,
        destination: Option<GeoPoint>,
    ) -> RoutingResult<RouteResponse> {
        let destination = match destination {
            Some(point) => point,
            None => {
                let zone = find_nearest_safe_zone(&self.pool, danger_point, incident_type_id).await?;
                tracing::info!(
                    "Evacuating {} to safe zone {} ('{}')",
                    danger_point,
                    zone.id,
                    zone.name
                );
                zone.location()
            }
        };

        let request = RouteRequest::evacuation(danger_point, destination);
        self.engine.route(&request).await
    }
}
