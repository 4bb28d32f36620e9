//! # Service Registry
//!
//! Maps logical [`ServiceKey`]s to their endpoints and keeps one [`ActionDispatcher`] per
//! endpoint for as long as the registry lives. Dispatchers, and therefore their cached
//! credential tokens and transport handles, are created on first access and never evicted.
use crate::{
    ActionDispatcher, ClientConfig, InvokeError, ServiceKey,
    soap::client::SoapConnector,
    transport::{Connector, TransportError},
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

pub struct ServiceRegistry<C: Connector> {
    connector: C,
    config: ClientConfig,
    dispatchers: Mutex<HashMap<&'static str, Arc<ActionDispatcher<C>>>>,
}

impl ServiceRegistry<SoapConnector> {
    /// Creates a registry talking SOAP to the base address selected by `config.environment`.
    pub fn connect(config: ClientConfig) -> Result<Self, TransportError> {
        let connector = SoapConnector::new(config.environment.base_url())?;
        Ok(Self::with_connector(connector, config))
    }
}

impl<C: Connector + Clone> ServiceRegistry<C> {
    pub fn with_connector(connector: C, config: ClientConfig) -> Self {
        Self {
            connector,
            config,
            dispatchers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the dispatcher for the endpoint behind `key`, creating it on first use.
    pub async fn dispatcher_for(&self, key: ServiceKey) -> Arc<ActionDispatcher<C>> {
        let endpoint = key.descriptor().endpoint;
        let mut dispatchers = self.dispatchers.lock().await;

        dispatchers
            .entry(endpoint)
            .or_insert_with(|| {
                debug!(service = %key, endpoint, "creating dispatcher");
                Arc::new(ActionDispatcher::new(
                    self.connector.clone(),
                    endpoint,
                    &self.config,
                ))
            })
            .clone()
    }

    /// Shorthand for `dispatcher_for(key)` followed by [`ActionDispatcher::invoke`].
    pub async fn invoke(
        &self,
        key: ServiceKey,
        action: &str,
        params: Value,
    ) -> Result<Value, InvokeError> {
        self.dispatcher_for(key).await.invoke(action, params).await
    }
}
