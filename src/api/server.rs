//! Axum server setup and configuration

use crate::api::routes;
use crate::{Config, Poller};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub poller: Arc<Poller>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let poller = Poller::from_config(&config);

        Self {
            config: Arc::new(config),
            poller: Arc::new(poller),
        }
    }
}

/// Create the Axum application with all routes
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health::health_check).fallback(routes::not_found))
        .route(
            "/bounties",
            post(routes::bounties::create_bounty).fallback(routes::not_found),
        )
        .route("/poll", post(routes::poll::trigger_poll).fallback(routes::not_found))
        .fallback(routes::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_app(AppState::new(Config::default()));
        let (status, body) = send(app, Method::GET, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_wrong_method_is_404() {
        let app = create_app(AppState::new(Config::default()));

        let (status, body) = send(app.clone(), Method::GET, "/poll").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (status, _) = send(app, Method::DELETE, "/health").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
