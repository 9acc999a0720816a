//! GraphHopper API HTTP client.

use std::time::Duration;

use drm_core::{RouteRequest, RouteResponse, RoutingError, RoutingResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// HTTP client for a GraphHopper-compatible routing endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GraphHopperClient {
    client: Client,
    route_url: String,
    api_key: String,
}

impl GraphHopperClient {
    /// Create a client for `route_url` (the full `/route` endpoint).
    ///
    /// `timeout` bounds each request end to end; the engine itself is never
    /// retried.
    pub fn new(
        route_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> RoutingResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RoutingError::Transport(format!("failed to create HTTP client: {err}")))?;
        Ok(Self::with_client(client, route_url, api_key))
    }

    /// Create a client around an existing reqwest pool.
    pub fn with_client(
        client: Client,
        route_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            route_url: route_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Request a route and decode the engine's response.
    ///
    /// Non-2xx answers become [`RoutingError::UpstreamRouting`] carrying the
    /// status and raw body.
    pub async fn route(&self, request: &RouteRequest) -> RoutingResult<RouteResponse> {
        let payload = serde_json::to_vec(request)?;

        let mut builder = self
            .client
            .post(&self.route_url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        if !self.api_key.trim().is_empty() {
            builder = builder.query(&[("key", self.api_key.as_str())]);
        }

        tracing::debug!(
            "Requesting {:?} route with {} points (custom model: {})",
            request.profile,
            request.points.len(),
            request.custom_model.is_some()
        );

        let response = builder
            .send()
            .await
            .map_err(|err| RoutingError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!("Failed to read routing engine error body: {}", err);
                    String::new()
                }
            };
            tracing::warn!("Routing engine returned {}: {}", status, body);
            return Err(RoutingError::UpstreamRouting {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| RoutingError::Transport(err.to_string()))?;
        let parsed: RouteResponse = serde_json::from_slice(&bytes)?;

        tracing::debug!("Routing engine returned {} path(s)", parsed.paths.len());
        Ok(parsed)
    }
}
