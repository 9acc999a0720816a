//! Persistence layer for the DRM server.
//!
//! Provides SQLite-backed storage for incidents (read as disaster zones)
//! and the safe zone registry.

pub mod db;
pub mod disaster_zones;
pub mod safe_zones;

pub use db::{init_database, Database};
