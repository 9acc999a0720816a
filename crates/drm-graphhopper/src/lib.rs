//! DRM GraphHopper - routing engine API client
//!
//! Posts route requests (optionally carrying an avoidance custom model) to a
//! GraphHopper-compatible `/route` endpoint and decodes the paths it returns.

pub mod client;

pub use client::GraphHopperClient;
