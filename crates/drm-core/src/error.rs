//! Error types for route computation.

use thiserror::Error;

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Errors that can occur while building or executing a route request.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A `"lat,lon"` coordinate string could not be parsed.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// No safe zone is registered for the requested incident category.
    #[error("no safe zone found for incident type {incident_type_id}")]
    NotFound {
        /// Incident category that had no match.
        incident_type_id: i64,
    },

    /// The routing engine answered with a non-success status.
    #[error("routing engine error: {status} - {body}")]
    UpstreamRouting {
        /// HTTP status code returned by the engine.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The request or response payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request to the routing engine never completed.
    #[error("routing engine unreachable: {0}")]
    Transport(String),

    /// The zone store could not be queried.
    #[error("storage error: {0}")]
    Storage(String),
}
