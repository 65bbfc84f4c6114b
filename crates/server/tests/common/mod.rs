//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process router backed by a mock movie provider, so the
//! whole HTTP stack runs without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cinetag_core::{
    testing::MockMovieProvider, Config, MetadataGateway, Recommender, TagTable,
};
use cinetag_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use cinetag_core::testing::fixtures;

/// API key placed in the fixture config; must never appear in responses.
pub const TEST_API_KEY: &str = "test-secret-key";

/// Test fixture for E2E testing with a mock provider.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock provider - configure discover/similar/details responses
    pub provider: Arc<MockMovieProvider>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body is empty or not JSON.
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.tmdb.api_key = TEST_API_KEY.to_string();

        let provider = Arc::new(MockMovieProvider::new());
        let gateway = Arc::new(MetadataGateway::new(
            provider.clone(),
            config.gateway_config(),
        ));
        let recommender = Arc::new(Recommender::new(
            gateway,
            Arc::new(TagTable::builtin()),
            config.engine.clone(),
        ));

        let state = Arc::new(AppState::new(config, recommender));
        let router = create_router(state);

        Self { router, provider }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, "application/json").await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let body = serde_json::to_string(&body).unwrap();
        self.request("POST", path, Some(body), "application/json")
            .await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Some(body.to_string()), "application/json")
            .await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        content_type: &str,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(raw) => {
                builder = builder.header("Content-Type", content_type);
                Body::from(raw)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
