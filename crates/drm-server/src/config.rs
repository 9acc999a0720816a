//! Server configuration from environment.

use std::env;
use std::time::Duration;

use drm_core::DEFAULT_CIRCLE_SEGMENTS;

const DEFAULT_GRAPHHOPPER_URL: &str = "https://graphhopper.com/api/1/route";
const DEFAULT_TOMTOM_URL: &str =
    "https://api.tomtom.com/traffic/services/4/flowSegmentData/absolute/10/json";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Full URL of the routing engine's `/route` endpoint
    pub graphhopper_url: String,
    pub graphhopper_key: String,
    /// Full URL of the traffic flow-segment endpoint
    pub tomtom_url: String,
    pub tomtom_api_key: String,
    /// Per-request timeout for outbound calls (seconds)
    pub upstream_timeout_s: u64,
    /// Vertices per rasterized disaster zone
    pub circle_segments: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            server_port: lookup("DRM_PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(8080),
            database_path: string("DRM_DATABASE_PATH", "data/drm.db"),
            database_max_connections: lookup("DRM_DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|value| *value > 0)
                .unwrap_or(5),
            graphhopper_url: string("GRAPHHOPPER_URL", DEFAULT_GRAPHHOPPER_URL),
            graphhopper_key: string("GRAPHHOPPER_KEY", ""),
            tomtom_url: string("TOMTOM_URL", DEFAULT_TOMTOM_URL),
            tomtom_api_key: string("TOMTOM_API_KEY", ""),
            upstream_timeout_s: lookup("DRM_UPSTREAM_TIMEOUT_S")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(15),
            circle_segments: lookup("DRM_CIRCLE_SEGMENTS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_CIRCLE_SEGMENTS),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_s.max(1))
    }

    /// Missing credentials are allowed (self-hosted engines need none) but
    /// worth flagging at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.graphhopper_key.is_empty() {
            warnings.push("GRAPHHOPPER_KEY is not set; routing requests are sent without a key".to_string());
        }
        if self.tomtom_api_key.is_empty() {
            warnings.push("TOMTOM_API_KEY is not set; traffic lookups will likely be rejected".to_string());
        }
        warnings
    }
}
