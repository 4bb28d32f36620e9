//! # SOAP Client
//!
//! [`SoapConnector`] hands out one [`SoapClient`] per endpoint. A client downloads the
//! endpoint's WSDL (`<endpoint>?wsdl`) on first use and keeps it for its whole lifetime; every
//! call is a `POST` of a SOAP 1.1 envelope to the address advertised by the WSDL.
use super::{
    codec,
    wsdl::{self, ServiceDescription},
};
use crate::transport::{Connector, ServiceHandle, TransportError};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";
const SOAP_ACTION_HEADER: &str = "SOAPAction";

#[derive(Debug, Clone)]
pub struct SoapConnector {
    http: reqwest::Client,
    base_url: String,
}

impl SoapConnector {
    /// Creates a connector for endpoints below `base_url` (e.g. `https://api.affili.net`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| TransportError::Request {
                url: base_url.clone(),
                source: Box::new(err),
            })?;

        Ok(Self::with_client(http, base_url))
    }

    /// Creates a connector sharing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Connector for SoapConnector {
    type Handle = SoapClient;

    fn connect(&self, endpoint: &str) -> Result<SoapClient, TransportError> {
        Ok(SoapClient::new(
            self.http.clone(),
            format!("{}{endpoint}", self.base_url),
        ))
    }
}

/// A SOAP client bound to a single endpoint.
#[derive(Debug)]
pub struct SoapClient {
    http: reqwest::Client,
    endpoint_url: String,
    description: OnceCell<ServiceDescription>,
}

impl SoapClient {
    pub fn new(http: reqwest::Client, endpoint_url: impl Into<String>) -> Self {
        Self {
            http,
            endpoint_url: endpoint_url.into(),
            description: OnceCell::new(),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn wsdl_url(&self) -> String {
        format!("{}?wsdl", self.endpoint_url)
    }

    /// Returns the endpoint's service description, downloading it on first use.
    pub async fn description(&self) -> Result<&ServiceDescription, TransportError> {
        self.description
            .get_or_try_init(|| self.fetch_description())
            .await
    }

    async fn fetch_description(&self) -> Result<ServiceDescription, TransportError> {
        let url = self.wsdl_url();
        debug!(%url, "fetching service description");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| request_error(&url, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| request_error(&url, err))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let description = wsdl::parse(&body).map_err(|err| TransportError::Description {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        if description.operations.is_empty() {
            return Err(TransportError::Description {
                url,
                reason: "no operations found".to_string(),
            });
        }

        debug!(
            %url,
            operations = description.operations.len(),
            "service description loaded"
        );

        Ok(description)
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        source: Box::new(err),
    }
}

#[async_trait]
impl ServiceHandle for SoapClient {
    async fn operations(&self) -> Result<Vec<String>, TransportError> {
        let description = self.description().await?;
        Ok(description
            .operations
            .iter()
            .map(|op| op.name.clone())
            .collect())
    }

    async fn call(&self, operation: &str, body: Value) -> Result<Value, TransportError> {
        let description = self.description().await?;

        let url = description
            .address
            .clone()
            .unwrap_or_else(|| self.endpoint_url.clone());
        let soap_action = description
            .operation(operation)
            .and_then(|op| op.soap_action.as_deref())
            .unwrap_or_default();

        let envelope = codec::encode_envelope(&body, description.target_namespace.as_deref())?;

        debug!(%url, operation, soap_action, "sending SOAP request");
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header(SOAP_ACTION_HEADER, format!("\"{soap_action}\""))
            .body(envelope)
            .send()
            .await
            .map_err(|err| request_error(&url, err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| request_error(&url, err))?;

        debug!(%url, operation, status = status.as_u16(), "received SOAP response");

        // Faults arrive with HTTP 500 and still carry a SOAP envelope.
        match codec::decode_envelope(&text) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                url,
                status: status.as_u16(),
                body: text,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_joins_base_url_and_endpoint() {
        let connector = SoapConnector::new("https://api.affili.net/").unwrap();

        let client = connector.connect("/V2.0/PublisherStatistics.svc").unwrap();

        assert_eq!(
            client.endpoint_url(),
            "https://api.affili.net/V2.0/PublisherStatistics.svc"
        );
        assert_eq!(
            client.wsdl_url(),
            "https://api.affili.net/V2.0/PublisherStatistics.svc?wsdl"
        );
    }
}
