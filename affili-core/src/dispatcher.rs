//! # Action Dispatcher
//!
//! The [`ActionDispatcher`] is bound to one endpoint and executes any action the endpoint
//! advertises. Each call walks the same sequence:
//!
//! 1. **Validate**: resolve the canonical action name and check it against the advertised
//!    actions. Unknown actions fail before any logon or action call.
//! 2. **Build**: wrap the parameters and a credential token into the request envelope.
//! 3. **Invoke**: send the envelope through the endpoint's transport handle.
//! 4. **Normalize**: unwrap the response payload and turn service faults into errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use affili_core::{ClientConfig, ServiceKey, ServiceRegistry, serde_json::json};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ServiceRegistry::connect(ClientConfig::new("403233", "secret"))?;
//! let statistics = registry.dispatcher_for(ServiceKey::Statistics).await;
//!
//! let records = statistics
//!     .invoke(
//!         "get_sub_id_statistics",
//!         json!({ "StartDate": "2024-01-01", "EndDate": "2024-01-31" }),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
use crate::{
    Action, Authenticator, ClientConfig, LogonError,
    fault::{self, Fault, FaultContext},
    normalize, request,
    transport::{Connector, ServiceHandle, TransportError},
};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Errors that can occur while invoking an action.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("Action '{action}' is not supported by endpoint '{endpoint}'")]
    UnsupportedOperation { action: String, endpoint: String },
    #[error(
        "Missing required parameter '{parameter}': '{fault}'\nSent body: {sent}{}",
        expected_shape(.expected)
    )]
    MissingRequiredParameter {
        parameter: String,
        fault: String,
        sent: Value,
        expected: Option<Value>,
    },
    #[error("Service fault: '{0}'")]
    ServiceFault(String),
    #[error("Invalid parameters for action '{action}': {reason}")]
    InvalidParameters { action: String, reason: String },
    #[error("Logon failed: '{0}'")]
    Logon(#[from] LogonError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn expected_shape(expected: &Option<Value>) -> String {
    match expected {
        Some(example) => format!("\nExpected body: {example}"),
        None => String::new(),
    }
}

/// Executes actions against a single endpoint.
pub struct ActionDispatcher<C: Connector> {
    endpoint: String,
    connector: C,
    handle: OnceCell<C::Handle>,
    authenticator: Authenticator<C>,
}

impl<C: Connector + Clone> ActionDispatcher<C> {
    /// Creates a dispatcher for `endpoint`. No connection is made until the first call.
    pub fn new(connector: C, endpoint: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            authenticator: Authenticator::new(connector.clone(), config),
            connector,
            handle: OnceCell::new(),
        }
    }
}

impl<C: Connector> ActionDispatcher<C> {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn authenticator(&self) -> &Authenticator<C> {
        &self.authenticator
    }

    /// Lists the canonical names of the actions advertised by the endpoint.
    pub async fn actions(&self) -> Result<Vec<String>, InvokeError> {
        Ok(self.handle().await?.operations().await?)
    }

    /// Invokes `action` (snake_case, e.g. `get_payments`) with a loosely typed parameter bag.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The normalized response payload.
    /// * `Err(InvokeError)` - If the action is unknown, the logon or transport fails, or the
    ///   service answers with a fault.
    pub async fn invoke(&self, action: &str, params: Value) -> Result<Value, InvokeError> {
        let action = Action::new(action);
        let handle = self.handle().await?;

        debug!(action = action.canonical(), endpoint = %self.endpoint, "validating action");
        let advertised = handle.operations().await?;
        if !advertised.iter().any(|op| op == action.canonical()) {
            warn!(action = action.canonical(), endpoint = %self.endpoint, "unsupported action");
            return Err(InvokeError::UnsupportedOperation {
                action: action.canonical().to_string(),
                endpoint: self.endpoint.clone(),
            });
        }

        let token = self.authenticator.token().await?;
        let envelope = request::build_envelope(&action, params, &token)?;

        debug!(action = action.canonical(), "invoking action");
        let body = handle.call(action.canonical(), envelope.clone()).await?;

        debug!(action = action.canonical(), "normalizing response");
        let response = normalize::flatten(action.name(), normalize::payload(body));

        let expected = match Fault::detect(&response) {
            Some(Fault {
                missing_parameter: Some(_),
                ..
            }) => handle.example_body(action.canonical()).await,
            _ => None,
        };

        fault::interpret(
            response,
            FaultContext {
                sent: envelope,
                expected,
            },
        )
    }

    async fn handle(&self) -> Result<&C::Handle, TransportError> {
        self.handle
            .get_or_try_init(|| async { self.connector.connect(&self.endpoint) })
            .await
    }
}
