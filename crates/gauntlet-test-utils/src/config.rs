use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TestError;

/// Environment variable selecting the target environment.
pub const ENV_VAR: &str = "GAUNTLET_ENV";

/// Environment variable carrying the base URL for remote environments.
pub const BASE_URL_VAR: &str = "GAUNTLET_BASE_URL";

/// Target environment for a scenario run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestEnv {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl TestEnv {
    /// Read the environment from `GAUNTLET_ENV`, defaulting to dev.
    pub fn from_env() -> Result<Self, TestError> {
        match std::env::var(ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::Dev),
        }
    }
}

impl FromStr for TestEnv {
    type Err = TestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            other => Err(TestError::Config(format!("unknown environment: {other}"))),
        }
    }
}

/// Run-wide configuration for the scenario suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    pub base_url: String,
    pub api_path: String,
    pub timeout: Duration,
    pub retry_interval: Duration,
    pub max_retries: u32,
    /// Default headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            base_url: "http://localhost:3000".to_string(),
            api_path: "/api".to_string(),
            timeout: Duration::from_secs(10),
            retry_interval: Duration::from_secs(1),
            max_retries: 3,
            headers,
        }
    }
}

impl TestConfig {
    /// Configuration for the given environment.
    ///
    /// Dev targets a local server; staging and prod take their base URL from
    /// `GAUNTLET_BASE_URL`.
    pub fn for_env(env: TestEnv) -> Result<Self, TestError> {
        let mut config = Self::default();
        match env {
            TestEnv::Dev => {}
            TestEnv::Staging | TestEnv::Prod => {
                config.base_url = std::env::var(BASE_URL_VAR).map_err(|_| {
                    TestError::Config(format!(
                        "{BASE_URL_VAR} must be set for staging and prod runs"
                    ))
                })?;
            }
        }
        Ok(config)
    }

    /// Configuration for the environment named by `GAUNTLET_ENV`.
    pub fn from_env() -> Result<Self, TestError> {
        Self::for_env(TestEnv::from_env()?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full URL for an API route, e.g. `api_url("/auth/login")`.
    pub fn api_url(&self, route: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_path, route)
    }
}
