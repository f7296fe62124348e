//! Auth API test server builder and handles.
//!
//! The server is an in-memory double of the auth API the scenario suite is
//! written against. It binds an ephemeral localhost port, serves until its
//! handles are dropped, and keeps all state in a [`UserStore`] the test can
//! reach directly.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::TestError;
use crate::store::{Role, UserRecord, UserStore};

/// Error type for test server operations
#[derive(Debug, Error)]
pub enum TestServerError {
    #[error("Failed to start server: {0}")]
    ServerStartFailed(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Test server error: {0}")]
    Other(String),
}

impl From<TestError> for TestServerError {
    fn from(err: TestError) -> Self {
        match err {
            TestError::Io(e) => TestServerError::IoError(e),
            _ => TestServerError::Other(err.to_string()),
        }
    }
}

/// A seed account installed before the server starts.
#[derive(Debug, Clone)]
struct SeedUser {
    email: String,
    password: String,
    suspended: bool,
}

/// Builder for the in-memory auth API server.
#[derive(Debug, Default)]
pub struct TestServerBuilder {
    seeds: Vec<SeedUser>,
    live_log: bool,
}

impl TestServerBuilder {
    /// Creates a new TestServerBuilder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an active account before the server starts.
    pub fn with_user(mut self, email: &str, password: &str) -> Self {
        self.seeds.push(SeedUser {
            email: email.to_string(),
            password: password.to_string(),
            suspended: false,
        });
        self
    }

    /// Seed a suspended account; logins against it are refused.
    pub fn with_suspended_user(mut self, email: &str, password: &str) -> Self {
        self.seeds.push(SeedUser {
            email: email.to_string(),
            password: password.to_string(),
            suspended: true,
        });
        self
    }

    /// Enables or disables live request logging.
    pub fn with_live_log(mut self, enabled: bool) -> Self {
        self.live_log = enabled;
        self
    }

    /// Builds the test server and returns handles to interact with it.
    pub async fn build(self) -> Result<TestServerHandles, TestServerError> {
        if self.live_log {
            // Another test may already have installed a subscriber.
            let _ = tracing_subscriber::fmt()
                .with_env_filter("debug,hyper=info")
                .try_init();
        }

        let store = UserStore::new();
        for seed in &self.seeds {
            store
                .seed_account(&seed.email, &seed.password, seed.suspended)
                .map_err(TestServerError::Other)?;
        }

        let app = auth_router(store.clone());

        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let shutdown_future = async {
                shutdown_rx.await.ok();
            };

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_future)
                .await
                .unwrap_or_else(|e| eprintln!("Server error: {}", e));
        });

        Ok(TestServerHandles {
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
            store,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

/// Handles for interacting with a running test server.
pub struct TestServerHandles {
    /// Base URL of the test server.
    pub base_url: String,

    /// Pre-configured HTTP client for making requests to the test server.
    pub client: Client,

    /// Backing store; lets tests seed or inspect accounts mid-scenario.
    pub store: UserStore,

    /// Shutdown transmitter for gracefully shutting down the server.
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl fmt::Debug for TestServerHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestServerHandles")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TestServerHandles {
    /// Manually shut down the test server.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Full URL for an API route, e.g. `api_url("/auth/login")`.
    pub fn api_url(&self, route: &str) -> String {
        format!("{}/api{}", self.base_url, route)
    }
}

impl Drop for TestServerHandles {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Create the auth API router with all routes.
pub fn auth_router(store: UserStore) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh", post(refresh_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/users/:user_id", delete(delete_user_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(store))
}

// ------------------- Handlers -------------------

async fn health_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn signup_handler(
    Extension(store): Extension<UserStore>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let payload = match SignupPayload::parse(&body) {
        Ok(payload) => payload,
        Err(message) => return invalid_payload(message),
    };

    let record = UserRecord {
        id: Uuid::new_v4(),
        email: payload.email,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        role: payload.role,
        suspended: false,
        created_at: chrono::Utc::now(),
    };

    match store.insert(record) {
        Ok(user) => {
            let token = store.issue_token(user.id);
            let refresh_token = store.issue_refresh_token(user.id);
            tracing::debug!(email = %user.email, "account created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "account created",
                    "user": user.to_json(),
                    "token": token,
                    "refreshToken": refresh_token,
                })),
            )
        }
        Err(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "email already registered",
                "message": "an account with this email already exists",
            })),
        ),
    }
}

async fn login_handler(
    Extension(store): Extension<UserStore>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = match require_str(&body, "email") {
        Ok(email) => email,
        Err(message) => return invalid_payload(message),
    };
    let password = match require_str(&body, "password") {
        Ok(password) => password,
        Err(message) => return invalid_payload(message),
    };

    // Unknown e-mail and wrong password are indistinguishable on purpose.
    let user = match store.find_by_email(email) {
        Some(user) if user.password == password => user,
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid credentials",
                    "message": "email or password is incorrect",
                })),
            );
        }
    };

    if user.suspended {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "account suspended",
                "message": "this account has been suspended or deactivated",
            })),
        );
    }

    let token = store.issue_token(user.id);
    let refresh_token = store.issue_refresh_token(user.id);
    (
        StatusCode::OK,
        Json(json!({
            "message": "login successful",
            "user": user.to_json(),
            "token": token,
            "refreshToken": refresh_token,
        })),
    )
}

async fn refresh_handler(
    Extension(store): Extension<UserStore>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let refresh_token = match require_str(&body, "refreshToken") {
        Ok(token) => token,
        Err(message) => return invalid_payload(message),
    };

    let user = store
        .take_refresh_token(refresh_token)
        .and_then(|user_id| store.get(user_id));

    match user {
        Some(user) => {
            let token = store.issue_token(user.id);
            let refresh_token = store.issue_refresh_token(user.id);
            (
                StatusCode::OK,
                Json(json!({
                    "token": token,
                    "refreshToken": refresh_token,
                })),
            )
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid refresh token",
                "message": "the refresh token is unknown or already used",
            })),
        ),
    }
}

async fn me_handler(
    Extension(store): Extension<UserStore>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    match bearer_user(&store, &headers) {
        Some(user) => (StatusCode::OK, Json(json!({ "user": user.to_json() }))),
        None => unauthenticated(),
    }
}

async fn delete_user_handler(
    Extension(store): Extension<UserStore>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if bearer_user(&store, &headers).is_none() {
        return unauthenticated().into_response();
    }

    let id = match Uuid::parse_str(&user_id) {
        Ok(id) => id,
        Err(_) => return user_not_found(&user_id).into_response(),
    };

    match store.remove(id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => user_not_found(&user_id).into_response(),
    }
}

// ------------------- Request validation -------------------

struct SignupPayload {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    role: Role,
}

impl SignupPayload {
    fn parse(body: &Value) -> Result<Self, String> {
        let email = require_str(body, "email")?;
        if !looks_like_email(email) {
            return Err("email must be a valid address".to_string());
        }

        let password = require_str(body, "password")?;
        if password.len() < 6 {
            return Err("password must be at least 6 characters".to_string());
        }

        let first_name = require_str(body, "firstName")?;
        let last_name = require_str(body, "lastName")?;
        for (field, value) in [("firstName", first_name), ("lastName", last_name)] {
            if value.len() < 2 || value.len() > 100 {
                return Err(format!("{field} must be between 2 and 100 characters"));
            }
        }

        let phone = body
            .get("phone")
            .and_then(Value::as_str)
            .map(str::to_string);

        let role = match body.get("role") {
            None | Some(Value::Null) => Role::default(),
            Some(value) => value
                .as_str()
                .and_then(Role::parse)
                .ok_or_else(|| "role must be one of: client, assistant".to_string())?,
        };

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone,
            role,
        })
    }
}

fn require_str<'a>(body: &'a Value, field: &str) -> Result<&'a str, String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("{field} is required"))
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn bearer_user(store: &UserStore, headers: &HeaderMap) -> Option<UserRecord> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    store.resolve_token(token)
}

// ------------------- Response helpers -------------------

fn invalid_payload(message: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid payload",
            "message": message,
        })),
    )
}

fn unauthenticated() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthenticated",
            "message": "a valid bearer token is required",
        })),
    )
}

fn user_not_found(user_id: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "user not found",
            "message": format!("no user with id {user_id}"),
        })),
    )
}
