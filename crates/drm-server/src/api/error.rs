//! API error type.
//!
//! Maps routing and storage failures to HTTP status codes with a JSON body of
//! the form `{"error": ..., "hint": ...}`. Upstream and internal details are
//! logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use drm_core::RoutingError;
use serde_json::json;
use thiserror::Error;

use crate::traffic::TrafficUpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request input (400).
    #[error("{message}")]
    BadRequest {
        message: String,
        hint: Option<&'static str>,
    },

    /// Requested resource does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// An external provider failed or rejected the call (502).
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
    },

    /// Anything else (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest {
            message: msg.into(),
            hint: None,
        }
    }

    /// Attach a hint to a 400 response. Other variants are unchanged.
    pub fn with_hint(mut self, new_hint: &'static str) -> Self {
        if let Self::BadRequest { hint, .. } = &mut self {
            *hint = Some(new_hint);
        }
        self
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::BadRequest {
                message,
                hint: Some(hint),
            } => json!({ "error": message, "hint": hint }),
            Self::BadRequest { message, .. } | Self::NotFound(message) => {
                json!({ "error": message })
            }
            Self::Upstream { message, status } => {
                tracing::error!("Upstream failure: {}", message);
                json!({
                    "error": "Upstream service error",
                    "upstream_status": status,
                })
            }
            Self::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RoutingError> for ApiError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::InvalidCoordinate(_) => Self::bad_request(err.to_string())
                .with_hint("Coordinates are \"lat,lon\" in decimal degrees"),
            RoutingError::NotFound { .. } => Self::NotFound(err.to_string()),
            RoutingError::UpstreamRouting { status, .. } => Self::Upstream {
                message: err.to_string(),
                status: Some(status),
            },
            RoutingError::Transport(_) => Self::Upstream {
                message: err.to_string(),
                status: None,
            },
            RoutingError::Serialization(_) | RoutingError::Storage(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(upstream) = err.downcast_ref::<TrafficUpstreamError>() {
            return Self::Upstream {
                message: upstream.to_string(),
                status: Some(upstream.status),
            };
        }
        Self::Internal(format!("{err:#}"))
    }
}
