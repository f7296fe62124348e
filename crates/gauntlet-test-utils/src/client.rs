use axum::{
    body::Body,
    extract::Request,
    http,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::error::TestError;

/// Test client that drives an axum `Router` directly, without a socket.
///
/// Useful for router-level tests where spinning up a listener is overkill.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
}

impl TestClient {
    /// Create a new test client from a Router, verifying its health route.
    pub async fn from_router(app: Router) -> Result<Self, TestError> {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .map_err(|e| TestError::Other(format!("Failed to build request: {}", e)))?;

        let response = app
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| TestError::Other(format!("Failed to execute request: {}", e)))?;

        if response.status().is_success() {
            Ok(Self { app })
        } else {
            Err(TestError::Server("Health check failed".to_string()))
        }
    }

    /// POST a JSON body to a route on the underlying router.
    pub async fn post_json(
        &self,
        path: &str,
        body: Value,
    ) -> Result<http::Response<Body>, TestError> {
        let json_body = serde_json::to_string(&body)?;

        let request = Request::builder()
            .method(http::Method::POST)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(json_body))
            .map_err(|e| TestError::Other(format!("Failed to build request: {}", e)))?;

        self.app
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| TestError::Other(format!("Failed to execute request: {}", e)))
    }

    /// GET a route, optionally with a bearer token.
    pub async fn get(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<http::Response<Body>, TestError> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = builder
            .body(Body::empty())
            .map_err(|e| TestError::Other(format!("Failed to build request: {}", e)))?;

        self.app
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| TestError::Other(format!("Failed to execute request: {}", e)))
    }
}

/// Collect a response body and parse it as JSON.
pub async fn read_json(response: http::Response<Body>) -> Result<Value, TestError> {
    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| TestError::Other(format!("Failed to read body: {}", e)))?
        .to_bytes();
    serde_json::from_slice(&bytes).map_err(TestError::Json)
}
