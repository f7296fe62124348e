use cucumber::World;
use gauntlet_test_utils::builders::TestServerHandles;
use gauntlet_test_utils::TestConfig;
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// World struct that holds state across step definitions.
#[derive(World)]
#[world(init = Self::default)]
pub struct AuthWorld {
    /// Running auth API test double, started by the Background step.
    pub server: Option<TestServerHandles>,
    pub config: TestConfig,

    // Last HTTP exchange
    pub response_status: Option<StatusCode>,
    pub response_body: Option<Value>,
    pub error: Option<String>,

    // Account under test
    pub signup_payload: Option<Value>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_id: Option<String>,
}

impl Default for AuthWorld {
    fn default() -> Self {
        Self {
            server: None,
            config: TestConfig::default(),
            response_status: None,
            response_body: None,
            error: None,
            signup_payload: None,
            token: None,
            refresh_token: None,
            user_id: None,
        }
    }
}

impl AuthWorld {
    /// Record an HTTP exchange for later assertion steps, capturing any
    /// tokens and user id the response carries.
    pub async fn record_response(&mut self, response: Response) {
        self.response_status = Some(response.status());
        let body = response.json::<Value>().await.ok();

        if let Some(body) = &body {
            if let Some(token) = body.get("token").and_then(Value::as_str) {
                self.token = Some(token.to_string());
            }
            if let Some(refresh) = body.get("refreshToken").and_then(Value::as_str) {
                self.refresh_token = Some(refresh.to_string());
            }
            if let Some(id) = body.pointer("/user/id").and_then(Value::as_str) {
                self.user_id = Some(id.to_string());
            }
        }

        self.response_body = body;
    }

    /// Drop the recorded exchange so setup traffic does not leak into a
    /// scenario's assertions.
    pub fn clear_response(&mut self) {
        self.response_status = None;
        self.response_body = None;
        self.error = None;
    }

    pub fn server(&self) -> &TestServerHandles {
        self.server
            .as_ref()
            .expect("auth API not running; is the Background step missing?")
    }

    pub fn body(&self) -> &Value {
        self.response_body
            .as_ref()
            .expect("no response body recorded")
    }

    pub fn payload_email(&self) -> &str {
        self.signup_payload
            .as_ref()
            .and_then(|payload| payload.get("email"))
            .and_then(Value::as_str)
            .expect("no test user prepared")
    }

    pub fn payload_password(&self) -> &str {
        self.signup_payload
            .as_ref()
            .and_then(|payload| payload.get("password"))
            .and_then(Value::as_str)
            .expect("no test user prepared")
    }
}

// Manual Debug implementation since TestServerHandles keeps its server side
// out of view.
impl std::fmt::Debug for AuthWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthWorld")
            .field("server", &self.server)
            .field("response_status", &self.response_status)
            .field("response_body", &self.response_body)
            .field("error", &self.error)
            .field("signup_payload", &self.signup_payload)
            .field("token", &self.token)
            .field("refresh_token", &self.refresh_token)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
