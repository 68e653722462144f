//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use courier_api::{AppState, build_app};
use courier_core::config::AppConfig;
use courier_realtime::RelayEngine;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The relay engine behind the router
    pub relay: Arc<RelayEngine>,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        let config = Arc::new(AppConfig::default());
        let relay = Arc::new(RelayEngine::new(config.relay.clone()));
        let router = build_app(AppState::new(config, relay.clone()));

        Self { router, relay }
    }

    /// Perform a GET request and return status plus parsed JSON body
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");

        let status = response.status();
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .expect("body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }
}
