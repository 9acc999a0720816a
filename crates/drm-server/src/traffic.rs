//! Traffic flow lookups, passed through to callers untouched.

use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;

/// Error returned when the traffic provider answers with a non-success status.
#[derive(Debug, thiserror::Error)]
#[error("traffic provider error: {status} - {body}")]
pub struct TrafficUpstreamError {
    pub status: u16,
    pub body: String,
}

/// Client for a TomTom-style flow-segment endpoint.
#[derive(Debug, Clone)]
pub struct TrafficClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TrafficClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.upstream_timeout())
            .build()
            .context("Failed to create traffic HTTP client")?;
        Ok(Self::new(client, &config.tomtom_url, &config.tomtom_api_key))
    }

    /// Fetch the raw flow-segment JSON for the road nearest `lat,lon`.
    ///
    /// `lat` and `lon` are forwarded as given; the provider validates them.
    pub async fn flow_segment(&self, lat: &str, lon: &str) -> Result<Vec<u8>> {
        let point = format!("{},{}", lat.trim(), lon.trim());
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("point", point.as_str())])
            .send()
            .await
            .context("Failed to reach traffic provider")?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!("Failed to read traffic provider error body: {}", err);
                    String::new()
                }
            };
            return Err(TrafficUpstreamError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read traffic response")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn_provider() -> String {
        let app = Router::new().route(
            "/flow",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                if query.get("key").map(String::as_str) != Some("tt") {
                    return (StatusCode::FORBIDDEN, "Developer Inactive".to_string());
                }
                let point = query.get("point").cloned().unwrap_or_default();
                (StatusCode::OK, format!(r#"{{"flowSegmentData":{{"point":"{point}"}}}}"#))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/flow")
    }

    #[tokio::test]
    async fn body_is_returned_untouched() {
        let client = TrafficClient::new(Client::new(), spawn_provider().await, "tt");

        let body = client.flow_segment(" 53.35", "-6.26 ").await.unwrap();

        assert_eq!(body, br#"{"flowSegmentData":{"point":"53.35,-6.26"}}"#.to_vec());
    }

    #[tokio::test]
    async fn rejected_key_is_upstream_error() {
        let client = TrafficClient::new(Client::new(), spawn_provider().await, "wrong");

        let err = client.flow_segment("53.35", "-6.26").await.unwrap_err();

        let upstream = err.downcast_ref::<TrafficUpstreamError>().unwrap();
        assert_eq!(upstream.status, 403);
        assert_eq!(upstream.body, "Developer Inactive");
    }

    #[tokio::test]
    async fn unreadable_error_body_still_reports_status() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 64\r\n\r\ncut")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });
        let client = TrafficClient::new(Client::new(), format!("http://{addr}/flow"), "tt");

        let err = client.flow_segment("53.35", "-6.26").await.unwrap_err();

        let upstream = err.downcast_ref::<TrafficUpstreamError>().unwrap();
        assert_eq!(upstream.status, 503);
        assert!(upstream.body.is_empty());
    }
}
