//! # Authentication
//!
//! Every action call carries a credential token obtained from the `Logon` action of the logon
//! endpoint. The [`Authenticator`] caches one token and logs on again once it is twenty minutes
//! old.
//!
//! The whole check-and-refresh runs under an async mutex, so callers sharing a dispatcher
//! trigger at most one logon per expiry.
use crate::{
    ClientConfig,
    fault::Fault,
    normalize,
    service::LOGON_ENDPOINT,
    transport::{Connector, ServiceHandle, TransportError},
};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::{
    sync::{Mutex, OnceCell},
    time::Instant,
};
use tracing::{debug, warn};

/// How long a credential token is reused before logging on again.
pub const TOKEN_TTL: Duration = Duration::from_secs(20 * 60);

const LOGON_ACTION: &str = "Logon";
const CREDENTIAL_TOKEN_KEY: &str = "CredentialToken";
const WEB_SERVICE_TYPE: &str = "Publisher";

#[derive(Debug, thiserror::Error)]
pub enum LogonError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Logon rejected by the service: '{0}'")]
    Rejected(String),
    #[error("Logon response did not contain a credential token")]
    MissingToken,
}

/// A credential token and the instant it was requested.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub created_at: Instant,
}

impl Token {
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < TOKEN_TTL
    }
}

pub struct Authenticator<C: Connector> {
    connector: C,
    username: String,
    password: String,
    sandbox_publisher_id: Option<String>,
    handle: OnceCell<C::Handle>,
    token: Mutex<Option<Token>>,
}

impl<C: Connector> Authenticator<C> {
    pub fn new(connector: C, config: &ClientConfig) -> Self {
        Self {
            connector,
            username: config.username.clone(),
            password: config.password.clone(),
            sandbox_publisher_id: config.sandbox_publisher_id.clone(),
            handle: OnceCell::new(),
            token: Mutex::new(None),
        }
    }

    /// Returns the cached token, logging on first when it is missing or expired.
    ///
    /// Logon failures are returned as-is and are not retried.
    pub async fn token(&self) -> Result<String, LogonError> {
        let mut slot = self.token.lock().await;

        if let Some(token) = slot.as_ref().filter(|t| t.is_valid_at(Instant::now())) {
            return Ok(token.value.clone());
        }

        let created_at = Instant::now();
        let value = self.logon().await?;

        *slot = Some(Token {
            value: value.clone(),
            created_at,
        });

        Ok(value)
    }

    /// Drops the cached token; the next [`Authenticator::token`] call logs on again.
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }

    async fn logon(&self) -> Result<String, LogonError> {
        debug!(user = %self.username, "logging on");

        let handle = self
            .handle
            .get_or_try_init(|| async { self.connector.connect(LOGON_ENDPOINT) })
            .await?;

        let response = handle.call(LOGON_ACTION, self.logon_body()).await?;

        if let Some(fault) = Fault::detect(&normalize::payload(response.clone())) {
            warn!(fault = %fault.message, "logon rejected");
            return Err(LogonError::Rejected(fault.message));
        }

        find_credential_token(&response).ok_or(LogonError::MissingToken)
    }

    fn logon_body(&self) -> Value {
        let mut message = Map::new();
        message.insert("Username".to_string(), Value::String(self.username.clone()));
        message.insert("Password".to_string(), Value::String(self.password.clone()));
        message.insert(
            "WebServiceType".to_string(),
            Value::String(WEB_SERVICE_TYPE.to_string()),
        );

        if let Some(publisher_id) = &self.sandbox_publisher_id {
            message.insert(
                "DeveloperSettings".to_string(),
                json!({ "SandboxPublisherID": publisher_id }),
            );
        }

        json!({ "LogonRequestMsg": message })
    }
}

fn find_credential_token(tree: &Value) -> Option<String> {
    match tree {
        Value::Object(node) => node.iter().find_map(|(key, value)| match value {
            Value::String(token) if key == CREDENTIAL_TOKEN_KEY => Some(token.clone()),
            other => find_credential_token(other),
        }),
        Value::Array(items) => items.iter().find_map(find_credential_token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validity_window() {
        let created_at = Instant::now();
        let token = Token {
            value: "t".to_string(),
            created_at,
        };

        assert!(token.is_valid_at(created_at));
        assert!(token.is_valid_at(created_at + TOKEN_TTL - Duration::from_secs(1)));
        assert!(!token.is_valid_at(created_at + TOKEN_TTL));
    }

    #[test]
    fn test_find_credential_token() {
        let direct = json!({ "CredentialToken": "abc" });
        let wrapped = json!({ "LogonResponse": { "@xmlns": "urn:x", "CredentialToken": "def" } });

        assert_eq!(find_credential_token(&direct).as_deref(), Some("abc"));
        assert_eq!(find_credential_token(&wrapped).as_deref(), Some("def"));
        assert_eq!(find_credential_token(&json!({ "Other": 1 })), None);
    }
}
