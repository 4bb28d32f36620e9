//! # Fault Interpretation
//!
//! A response carrying a `faultstring` field is a service fault rather than a payload. Faults
//! about a missing request element are recognised by one of two phrasings and reported with
//! the offending parameter name; every other fault is passed through verbatim.
use crate::dispatcher::InvokeError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

const FAULT_MESSAGE_KEY: &str = "faultstring";

/// Text content of an element that also carried attributes (see [`crate::soap::codec`]).
const TEXT_KEY: &str = "$value";

/// `The StartDate part of the request cannot be null.`
static NULL_PART_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"The (?P<parameter>\w+) part of the request cannot be null")
        .expect("valid fault pattern")
});

/// `Expecting element 'StartDate'.`
static EXPECTING_ELEMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Expecting element '(?P<parameter>[^']+)'").expect("valid fault pattern")
});

/// A fault reported by the service in place of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub message: String,
    pub missing_parameter: Option<String>,
}

impl Fault {
    /// Returns the fault carried by `response`, if any.
    pub fn detect(response: &Value) -> Option<Fault> {
        let message = fault_message(response)?;
        let missing_parameter = missing_parameter(&message);

        Some(Fault {
            message,
            missing_parameter,
        })
    }
}

/// Diagnostics attached to a missing parameter error.
#[derive(Debug, Clone, Default)]
pub struct FaultContext {
    /// The request body that was sent.
    pub sent: Value,
    /// An example of the body the service expects, when known.
    pub expected: Option<Value>,
}

/// Returns `response` unchanged unless it carries a fault, which is turned into an error.
pub fn interpret(response: Value, context: FaultContext) -> Result<Value, InvokeError> {
    match Fault::detect(&response) {
        None => Ok(response),
        Some(fault) => {
            warn!(fault = %fault.message, "service fault");
            Err(into_error(fault, context))
        }
    }
}

fn into_error(fault: Fault, context: FaultContext) -> InvokeError {
    match fault.missing_parameter {
        Some(parameter) => InvokeError::MissingRequiredParameter {
            parameter,
            fault: fault.message,
            sent: context.sent,
            expected: context.expected,
        },
        None => InvokeError::ServiceFault(fault.message),
    }
}

fn fault_message(response: &Value) -> Option<String> {
    let Value::Object(node) = response else {
        return None;
    };

    let (_, value) = node
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(FAULT_MESSAGE_KEY))?;

    match value {
        Value::String(message) => Some(message.clone()),
        Value::Object(element) => match element.get(TEXT_KEY) {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(value.to_string()),
        },
        Value::Null => Some(String::new()),
        other => Some(other.to_string()),
    }
}

fn missing_parameter(message: &str) -> Option<String> {
    [&*NULL_PART_PATTERN, &*EXPECTING_ELEMENT_PATTERN]
        .iter()
        .find_map(|pattern| pattern.captures(message))
        .and_then(|captures| captures.name("parameter"))
        .map(|parameter| parameter.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_without_fault_is_returned() {
        let response = json!({ "Payment": [] });

        let result = interpret(response.clone(), FaultContext::default()).unwrap();

        assert_eq!(result, response);
    }

    #[test]
    fn test_expecting_element_fault() {
        let response = json!({
            "faultcode": "a:DeserializationFailed",
            "faultstring": "Error in line 1 position 200. Expecting element 'StartDate'."
        });
        let sent = json!({ "GetPaymentsRequest": { "CredentialToken": "t" } });
        let context = FaultContext {
            sent: sent.clone(),
            expected: Some(json!({ "StartDate": "?" })),
        };

        match interpret(response, context) {
            Err(InvokeError::MissingRequiredParameter {
                parameter,
                fault,
                sent: sent_body,
                expected,
            }) => {
                assert_eq!(parameter, "StartDate");
                assert!(fault.contains("Expecting element 'StartDate'"));
                assert_eq!(sent_body, sent);
                assert_eq!(expected, Some(json!({ "StartDate": "?" })));
            }
            other => panic!("Expected MissingRequiredParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_null_part_fault() {
        let fault = Fault::detect(&json!({
            "faultstring": "The EndDate part of the request cannot be null."
        }))
        .unwrap();

        assert_eq!(fault.missing_parameter.as_deref(), Some("EndDate"));
    }

    #[test]
    fn test_fault_with_attributes() {
        let fault = Fault::detect(&json!({
            "faultcode": "s:Client",
            "faultstring": { "@xml:lang": "en-US", "$value": "Expecting element 'Query'." }
        }))
        .unwrap();

        assert_eq!(fault.message, "Expecting element 'Query'.");
        assert_eq!(fault.missing_parameter.as_deref(), Some("Query"));
    }

    #[test]
    fn test_unrecognised_fault_is_verbatim() {
        let message = "Login failed: the credential token has expired.";
        let response = json!({ "faultcode": "s:Server", "faultstring": message });

        match interpret(response, FaultContext::default()) {
            Err(InvokeError::ServiceFault(fault)) => assert_eq!(fault, message),
            other => panic!("Expected ServiceFault, got {other:?}"),
        }
    }
}
