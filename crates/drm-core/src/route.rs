//! Routing engine request and response payloads.
//!
//! Field names follow the engine's JSON API (`points`, `profile`,
//! `custom_model`, `ch.disable`, `paths[]`). Responses keep unknown fields
//! so they can be handed back to callers unmodified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::avoidance::AvoidanceModel;
use crate::models::GeoPoint;

/// Road classes evacuation routes must not snap onto.
pub const EVACUATION_SNAP_PREVENTIONS: [&str; 3] = ["motorway", "ferry", "tunnel"];

const EVACUATION_DETAILS: [&str; 2] = ["road_class", "surface"];
const DEFAULT_LOCALE: &str = "en";

/// Routing mode selecting the engine's cost function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Foot,
    Car,
    Bike,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Waypoints as `[lon, lat]` pairs
    pub points: Vec<[f64; 2]>,
    pub profile: Profile,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_model: Option<AvoidanceModel>,
    /// Disables contraction-hierarchy shortcuts; required with a custom model
    #[serde(rename = "ch.disable", default, skip_serializing_if = "Option::is_none")]
    pub ch_disable: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snap_preventions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    pub instructions: bool,
    pub calc_points: bool,
    pub points_encoded: bool,
}

impl RouteRequest {
    /// Car route that steers around the areas in `model`.
    pub fn safe_route(origin: GeoPoint, destination: GeoPoint, model: AvoidanceModel) -> Self {
        Self {
            points: vec![origin.to_lon_lat(), destination.to_lon_lat()],
            profile: Profile::Car,
            locale: DEFAULT_LOCALE.to_string(),
            custom_model: Some(model),
            ch_disable: Some(true),
            snap_preventions: Vec::new(),
            details: Vec::new(),
            instructions: true,
            calc_points: true,
            points_encoded: false,
        }
    }

    /// Walking route with turn-by-turn instructions, kept off motorways,
    /// ferries and tunnels.
    pub fn evacuation(danger_point: GeoPoint, safe_point: GeoPoint) -> Self {
        Self {
            points: vec![danger_point.to_lon_lat(), safe_point.to_lon_lat()],
            profile: Profile::Foot,
            locale: DEFAULT_LOCALE.to_string(),
            custom_model: None,
            ch_disable: None,
            snap_preventions: EVACUATION_SNAP_PREVENTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            details: EVACUATION_DETAILS.iter().map(|s| s.to_string()).collect(),
            instructions: true,
            calc_points: true,
            points_encoded: false,
        }
    }
}

/// A single turn instruction.
///
/// Fields the engine adds for particular signs (`exit_number`, `turn_angle`,
/// `last_heading`, ...) are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instruction {
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    pub sign: i32,
    pub interval: Vec<u64>,
    pub text: String,
    /// Milliseconds
    pub time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One candidate path returned by the engine.
///
/// Re-encoding yields exactly the keys the engine sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePath {
    /// Meters
    pub distance: f64,
    /// Milliseconds
    pub time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_encoded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    /// GeoJSON geometry (or an encoded polyline string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<Instruction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legs: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapped_waypoints: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoutePath {
    pub fn instructions(&self) -> &[Instruction] {
        self.instructions.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Map<String, Value>>,
    pub paths: Vec<RoutePath>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
