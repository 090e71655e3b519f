//! Bounty creation proxy

use crate::api::routes::ErrorResponse;
use crate::api::server::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

/// POST /bounties - forward the raw body upstream and mirror the reply
pub async fn create_bounty(State(state): State<AppState>, body: Bytes) -> Response {
    match state.poller.source().create(body.to_vec()).await {
        Ok(upstream) => {
            info!("Proxied bounty creation: upstream returned {}", upstream.status);

            let status =
                StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = upstream
                .content_type
                .unwrap_or_else(|| "application/json".to_string());

            (status, [(header::CONTENT_TYPE, content_type)], upstream.body).into_response()
        }
        Err(e) => {
            error!("Failed to proxy bounty creation: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("Failed to proxy bounty creation")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{dead_url, spawn_server};
    use crate::Config;
    use axum::{body::to_bytes, routing::post, Router};
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_proxy_mirrors_upstream_reply() {
        let upstream = Router::new().route(
            "/bounties",
            post(|body: Bytes| async move {
                let sent: Value = serde_json::from_slice(&body).unwrap();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": "reward too low", "echo": sent["title"]})),
                )
            }),
        );
        let config = Config {
            api_url: spawn_server(upstream).await,
            ..Config::default()
        };

        let response = create_bounty(
            State(AppState::new(config)),
            Bytes::from_static(br#"{"title":"Port the CLI"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({"error": "reward too low", "echo": "Port the CLI"})
        );
    }

    #[tokio::test]
    async fn test_proxy_transport_failure_is_502() {
        let config = Config {
            api_url: dead_url().await,
            ..Config::default()
        };

        let response = create_bounty(State(AppState::new(config)), Bytes::from_static(b"{}")).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to proxy bounty creation"})
        );
    }
}
