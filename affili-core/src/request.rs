//! # Request Envelopes
//!
//! Every request carries the credential token next to the parameters. Most actions expect the
//! parameters wrapped in a `<Action>RequestMessage` element; a few accept them flat, directly
//! beside the token.
use crate::{Action, dispatcher::InvokeError};
use serde_json::{Map, Value};

/// Actions whose parameters sit at the root of the request body.
pub const ROOT_PARAMETER_ACTIONS: &[&str] =
    &["GetPayments", "SearchCreatives", "GetCreativeCategories"];

const CREDENTIAL_TOKEN: &str = "CredentialToken";

/// Builds `{ "<Action>Request": { "CredentialToken": token, ... } }` for `action`.
///
/// `null` parameters are treated as an empty parameter bag. Root placement requires an object.
pub fn build_envelope(action: &Action, params: Value, token: &str) -> Result<Value, InvokeError> {
    let canonical = action.canonical();

    let mut body = Map::new();
    body.insert(CREDENTIAL_TOKEN.to_string(), Value::String(token.to_string()));

    if ROOT_PARAMETER_ACTIONS.contains(&canonical) {
        match params {
            Value::Object(params) => body.extend(params),
            Value::Null => {}
            other => {
                return Err(InvokeError::InvalidParameters {
                    action: action.name().to_string(),
                    reason: format!("expected a JSON object, got '{other}'"),
                });
            }
        }
    } else {
        body.insert(format!("{canonical}RequestMessage"), params);
    }

    let mut envelope = Map::new();
    envelope.insert(format!("{canonical}Request"), Value::Object(body));

    Ok(Value::Object(envelope))
}
