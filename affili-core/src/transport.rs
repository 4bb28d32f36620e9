//! # Transport Seam
//!
//! The dispatcher never talks to the network directly. It asks a [`Connector`] for a
//! [`ServiceHandle`] bound to one endpoint and uses it for introspection and calls.
//!
//! [`crate::soap::client::SoapConnector`] is the production implementation; tests plug in
//! in-memory fakes.
use crate::BoxError;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to '{url}' failed: '{source}'")]
    Request {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("Request to '{url}' returned HTTP {status}: '{body}'")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Failed to encode or decode a message: '{0}'")]
    Codec(#[from] crate::soap::codec::CodecError),
    #[error("Invalid service description at '{url}': {reason}")]
    Description { url: String, reason: String },
}

/// Creates transport handles bound to a single endpoint.
pub trait Connector: Send + Sync {
    type Handle: ServiceHandle;

    /// Returns a handle for `endpoint` (e.g. `/V2.0/PublisherStatistics.svc`).
    ///
    /// Implementations should not perform network I/O here; handles load their service
    /// description lazily.
    fn connect(&self, endpoint: &str) -> Result<Self::Handle, TransportError>;
}

/// A connection to one endpoint.
#[async_trait]
pub trait ServiceHandle: Send + Sync {
    /// The canonical names of all actions the endpoint advertises.
    async fn operations(&self) -> Result<Vec<String>, TransportError>;

    /// Invokes `operation` with `body` and returns the parsed response body.
    async fn call(&self, operation: &str, body: Value) -> Result<Value, TransportError>;

    /// An example request body for `operation`, when the service description allows it.
    async fn example_body(&self, _operation: &str) -> Option<Value> {
        None
    }
}
