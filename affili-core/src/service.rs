//! # Service Table
//!
//! The fixed mapping from logical service keys to remote endpoint identifiers.
use std::{fmt, str::FromStr};

/// Endpoint used only by the [`crate::Authenticator`].
pub const LOGON_ENDPOINT: &str = "/V2.0/Logon.svc";

/// Logical name of a remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKey {
    Creative,
    Product,
    Inbox,
    Account,
    Statistics,
    ProgramList,
}

/// A logical key bound to its endpoint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub key: ServiceKey,
    pub endpoint: &'static str,
}

impl ServiceKey {
    pub const ALL: [ServiceKey; 6] = [
        ServiceKey::Creative,
        ServiceKey::Product,
        ServiceKey::Inbox,
        ServiceKey::Account,
        ServiceKey::Statistics,
        ServiceKey::ProgramList,
    ];

    /// Returns the snake_case name of the key (e.g. `program_list`).
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKey::Creative => "creative",
            ServiceKey::Product => "product",
            ServiceKey::Inbox => "inbox",
            ServiceKey::Account => "account",
            ServiceKey::Statistics => "statistics",
            ServiceKey::ProgramList => "program_list",
        }
    }

    pub fn descriptor(&self) -> ServiceDescriptor {
        let endpoint = match self {
            ServiceKey::Creative => "/V2.0/PublisherCreative.svc",
            ServiceKey::Product => "/V2.0/ProductServices.svc",
            ServiceKey::Inbox => "/V2.0/PublisherInbox.svc",
            ServiceKey::Account => "/V2.0/AccountService.svc",
            ServiceKey::Statistics => "/V2.0/PublisherStatistics.svc",
            ServiceKey::ProgramList => "/V2.0/PublisherProgram.svc",
        };

        ServiceDescriptor {
            key: *self,
            endpoint,
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown service '{0}', expected one of: creative, product, inbox, account, statistics, program_list")]
pub struct UnknownServiceError(pub String);

impl FromStr for ServiceKey {
    type Err = UnknownServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ServiceKey::ALL
            .into_iter()
            .find(|key| key.name() == value)
            .ok_or_else(|| UnknownServiceError(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_keys() {
        for key in ServiceKey::ALL {
            assert_eq!(key.name().parse::<ServiceKey>().unwrap(), key);
        }

        assert!("publisher".parse::<ServiceKey>().is_err());
    }

    #[test]
    fn test_endpoints_are_distinct() {
        let mut endpoints: Vec<_> = ServiceKey::ALL
            .iter()
            .map(|key| key.descriptor().endpoint)
            .collect();
        endpoints.sort_unstable();
        endpoints.dedup();

        assert_eq!(endpoints.len(), ServiceKey::ALL.len());
        assert!(!endpoints.contains(&LOGON_ENDPOINT));
    }
}
