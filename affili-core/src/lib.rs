//! # Affili Core
//!
//! `affili-core` is the foundational library powering the Affili CLI. It provides a generic
//! client for the affilinet publisher SOAP web services, capable of calling any advertised
//! action without compile-time knowledge of the per-action request and response schemas.
//!
//! ## Key Components
//!
//! * **[`ServiceRegistry`]:** The main entry point. It maps a logical [`ServiceKey`] to its
//!   endpoint and lazily creates one [`ActionDispatcher`] per endpoint.
//! * **[`ActionDispatcher`]:** Validates an action against the endpoint's advertised actions,
//!   builds the request envelope, invokes the action and normalizes the response.
//! * **[`Authenticator`]:** Caches the credential token obtained from the `Logon` action and
//!   refreshes it once it is older than twenty minutes.
//!
//! Parameters and results are plain `serde_json::Value` trees, so callers pass a loosely
//! typed parameter bag and receive the unwrapped payload.
//!
//! ## Transport
//!
//! The dispatcher talks to the network through the [`transport::Connector`] and
//! [`transport::ServiceHandle`] traits. The [`soap`] module implements them over SOAP 1.1:
//!
//! * **[`soap::client::SoapClient`]:** Fetches and parses the endpoint WSDL and posts envelopes.
//! * **[`soap::codec`]:** Encodes JSON envelopes into SOAP XML and decodes response bodies
//!   back into JSON trees.
//!
//! ## Re-exports
//!
//! This crate re-exports `serde_json` so consumers build parameter bags with a compatible
//! version.
//!
//! See the README.md for more details about usage.
pub mod action;
pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod fault;
pub mod inflect;
pub mod normalize;
pub mod registry;
pub mod request;
pub mod service;
pub mod soap;
pub mod transport;

pub use action::Action;
pub use auth::{Authenticator, LogonError};
pub use config::{ClientConfig, Environment};
pub use dispatcher::{ActionDispatcher, InvokeError};
pub use registry::ServiceRegistry;
pub use service::{ServiceDescriptor, ServiceKey};

// Re-exports
pub use serde_json;

/// Type alias for the standard boxed error used by transport implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
