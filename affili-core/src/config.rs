//! # Client Configuration
//!
//! Configuration is an explicit value handed to [`crate::ServiceRegistry`] at construction time.
//! Nothing in this crate reads environment variables; the CLI maps them into a [`ClientConfig`].
use std::fmt;

const PRODUCTION_BASE_URL: &str = "https://api.affili.net";
const SANDBOX_BASE_URL: &str = "https://developer-api.affili.net";

/// Selects the base address all endpoints are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
    /// Any other base address, e.g. a proxy or a local mock server.
    Custom(String),
}

impl Environment {
    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
            Environment::Custom(url) => url.trim_end_matches('/'),
        }
    }
}

/// Credentials and environment used by every dispatcher created from the same registry.
#[derive(Clone)]
pub struct ClientConfig {
    pub username: String,
    pub password: String,
    pub environment: Environment,
    /// When set, sent in the logon payload under `DeveloperSettings.SandboxPublisherID`.
    pub sandbox_publisher_id: Option<String>,
}

impl ClientConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            environment: Environment::default(),
            sandbox_publisher_id: None,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_sandbox_publisher_id(mut self, publisher_id: impl Into<String>) -> Self {
        self.sandbox_publisher_id = Some(publisher_id.into());
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("environment", &self.environment)
            .field("sandbox_publisher_id", &self.sandbox_publisher_id)
            .finish()
    }
}
