//! Shared library surface for the DRM server and its tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod routing_service;
pub mod state;
pub mod traffic;
