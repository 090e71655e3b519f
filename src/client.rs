//! HTTP client for the upstream bounty API

use crate::config::Config;
use crate::types::Bounty;
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Failure talking to the upstream API
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode bounty list: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Upstream reply to a create request, mirrored back to the caller verbatim
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for `GET`/`POST {api_url}/bounties`
#[derive(Clone)]
pub struct BountyClient {
    client: Client,
    bounties_url: String,
}

impl BountyClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            bounties_url: config.bounties_url(),
        }
    }

    /// Fetch the full current bounty list. Any failure fails the whole fetch.
    pub async fn fetch_all(&self) -> Result<Vec<Bounty>, SourceError> {
        debug!("Fetching bounties from: {}", self.bounties_url);

        let response = self
            .client
            .get(&self.bounties_url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: self.bounties_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let bounties: Vec<Bounty> = response.json().await.map_err(SourceError::Decode)?;

        info!("Fetched {} bounties", bounties.len());
        Ok(bounties)
    }

    /// Forward a raw create body upstream.
    ///
    /// Non-success statuses are returned as a normal response; only transport
    /// failures are errors.
    pub async fn create(&self, body: Vec<u8>) -> Result<UpstreamResponse, SourceError> {
        let response = self
            .client
            .post(&self.bounties_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: self.bounties_url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Request {
                url: self.bounties_url.clone(),
                source,
            })?
            .to_vec();

        debug!("Upstream create returned {}", status);
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    /// Serve `app` on an ephemeral local port and return its base URL
    pub(crate) async fn spawn_server(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Base URL nothing is listening on
    pub(crate) async fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn client_for(api_url: String) -> BountyClient {
        let config = Config {
            api_url,
            ..Config::default()
        };
        BountyClient::new(&config)
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_list() {
        let app = Router::new().route(
            "/bounties",
            get(|| async {
                Json(json!([
                    {"id": "a", "title": "A", "tags": ["x"], "reward": "1", "status": "open"},
                    {"id": "b", "title": "B", "tags": [], "reward": "2", "status": "claimed"}
                ]))
            }),
        );
        let client = client_for(spawn_server(app).await);

        let bounties = client.fetch_all().await.unwrap();
        assert_eq!(bounties.len(), 2);
        assert_eq!(bounties[1].id, "b");
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_error_status() {
        let app = Router::new().route(
            "/bounties",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(spawn_server(app).await);

        match client.fetch_all().await {
            Err(SourceError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_bad_json() {
        let app = Router::new().route("/bounties", get(|| async { "not json" }));
        let client = client_for(spawn_server(app).await);

        assert!(matches!(client.fetch_all().await, Err(SourceError::Decode(_))));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = client_for(dead_url().await);
        assert!(matches!(
            client.fetch_all().await,
            Err(SourceError::Request { .. })
        ));
        assert!(client.create(b"{}".to_vec()).await.is_err());
    }
}
