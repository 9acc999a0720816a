//! Avoidance-zone model builder.
//!
//! Turns circular disaster zones into GeoJSON polygons plus priority rules
//! that the routing engine evaluates per edge. Each zone becomes one
//! `disaster_zone_<id>` feature and one `in_disaster_zone_<id>` rule with a
//! zero multiplier, which makes edges inside the zone unusable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::geodesy::destination_point;
use crate::models::{DisasterZone, GeoPoint};

/// Number of vertices used to approximate a circle (10° apart).
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 36;

const MIN_CIRCLE_SEGMENTS: usize = 3;
const FEATURE_ID_PREFIX: &str = "disaster_zone_";
const RULE_PREFIX: &str = "in_";
const AVOID_MULTIPLIER: f64 = 0.0;

/// Closed ring of `[lon, lat]` pairs (first == last).
pub type PolygonRing = Vec<[f64; 2]>;

/// GeoJSON object discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoJsonType {
    FeatureCollection,
    Feature,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type")]
    pub kind: GeoJsonType,
    pub coordinates: Vec<PolygonRing>,
}

impl Polygon {
    pub fn from_ring(ring: PolygonRing) -> Self {
        Self {
            kind: GeoJsonType::Polygon,
            coordinates: vec![ring],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GeoJsonType,
    pub geometry: Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: GeoJsonType,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self {
            kind: GeoJsonType::FeatureCollection,
            features: Vec::new(),
        }
    }
}

/// A cost rule: multiply the edge priority by `multiply_by` when `if` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityRule {
    #[serde(rename = "if")]
    pub condition: String,
    pub multiply_by: f64,
}

/// Routing-engine custom model describing areas to avoid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvoidanceModel {
    pub priority: Vec<PriorityRule>,
    pub areas: FeatureCollection,
}

impl AvoidanceModel {
    pub fn feature_ids(&self) -> impl Iterator<Item = &str> {
        self.areas.features.iter().map(|f| f.id.as_str())
    }

    /// Rule conditions that do not reference an existing feature.
    pub fn dangling_rules(&self) -> Vec<&str> {
        let ids: HashSet<&str> = self.feature_ids().collect();
        self.priority
            .iter()
            .filter(|rule| {
                rule.condition
                    .strip_prefix(RULE_PREFIX)
                    .map_or(true, |id| !ids.contains(id))
            })
            .map(|rule| rule.condition.as_str())
            .collect()
    }
}

/// A zone that produced no geometry and was left out of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedZone {
    pub zone_id: i64,
    pub reason: String,
}

/// Model plus the zones that were dropped while building it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvoidanceOutcome {
    pub model: AvoidanceModel,
    pub skipped: Vec<SkippedZone>,
}

/// Approximates circles on the sphere with a fixed number of vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleRasterizer {
    segments: usize,
}

impl Default for CircleRasterizer {
    fn default() -> Self {
        Self {
            segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }
}

impl CircleRasterizer {
    /// Segment counts below 3 are raised to 3.
    pub fn new(segments: usize) -> Self {
        Self {
            segments: segments.max(MIN_CIRCLE_SEGMENTS),
        }
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Rasterize a circle of `radius_m` meters around `center`.
    ///
    /// Vertices start due north and proceed clockwise at equal bearing
    /// steps; the first vertex is repeated at the end. A zero, negative or
    /// non-finite radius yields an empty ring.
    pub fn rasterize(&self, center: GeoPoint, radius_m: f64) -> PolygonRing {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Vec::new();
        }

        let step = std::f64::consts::TAU / self.segments as f64;
        let mut ring: PolygonRing = (0..self.segments)
            .map(|i| destination_point(center, radius_m, i as f64 * step).to_lon_lat())
            .collect();

        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        ring
    }

    /// Build the avoidance model, reporting zones that were skipped.
    pub fn build_outcome(&self, zones: &[DisasterZone]) -> AvoidanceOutcome {
        let mut outcome = AvoidanceOutcome::default();

        for zone in zones {
            let ring = self.rasterize(zone.center(), zone.radius_m);
            if ring.is_empty() {
                tracing::debug!(
                    "Skipping disaster zone {} ('{}'): degenerate radius {}",
                    zone.id,
                    zone.name,
                    zone.radius_m
                );
                outcome.skipped.push(SkippedZone {
                    zone_id: zone.id,
                    reason: format!("degenerate radius {}", zone.radius_m),
                });
                continue;
            }

            let feature_id = feature_id_for_zone(zone.id);
            outcome.model.priority.push(PriorityRule {
                condition: format!("{RULE_PREFIX}{feature_id}"),
                multiply_by: AVOID_MULTIPLIER,
            });
            outcome.model.areas.features.push(Feature {
                id: feature_id,
                kind: GeoJsonType::Feature,
                geometry: Polygon::from_ring(ring),
            });
        }

        outcome
    }
}

/// Rasterize a circle with the default 36-segment approximation.
pub fn rasterize_circle(center: GeoPoint, radius_m: f64) -> PolygonRing {
    CircleRasterizer::default().rasterize(center, radius_m)
}

/// Build the avoidance model for `zones`, dropping degenerate ones.
pub fn build_avoidance_model(zones: &[DisasterZone]) -> AvoidanceModel {
    build_avoidance_outcome(zones).model
}

/// Like [`build_avoidance_model`] but also reports skipped zones.
pub fn build_avoidance_outcome(zones: &[DisasterZone]) -> AvoidanceOutcome {
    CircleRasterizer::default().build_outcome(zones)
}

pub fn feature_id_for_zone(zone_id: i64) -> String {
    format!("{FEATURE_ID_PREFIX}{zone_id}")
}

/// Recover the zone id a feature was built from.
pub fn zone_id_from_feature_id(feature_id: &str) -> Option<i64> {
    feature_id.strip_prefix(FEATURE_ID_PREFIX)?.parse().ok()
}
