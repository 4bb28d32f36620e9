//! # Response Normalization
//!
//! The services wrap every payload in one or more single-key envelopes whose names depend on
//! the action: `PaymentCollection`, `Payments`, `Payment`, `GetPaymentsResult`... This module
//! peels those layers off until the payload surfaces.
//!
//! A layer is only unwrapped when its single meaningful key is one of the names derived from
//! the action. Namespace declarations and the `TotalRecords` counter never count as
//! meaningful keys.
use crate::{Action, inflect};
use serde_json::{Map, Value};

const TOTAL_RECORDS_KEY: &str = "TotalRecords";

/// Unwraps the single-key layers of `tree` that are named after `action`.
///
/// Scalars, arrays and objects with zero or several meaningful keys are returned unchanged.
pub fn flatten(action: &str, tree: Value) -> Value {
    let variations = name_variations(&Action::new(action));
    flatten_with(&variations, tree)
}

/// Returns the content of the single root element of a response body.
///
/// `{ "GetPaymentsResponse": { .. } }` yields the inner object. Bodies without exactly one
/// root element are returned unchanged.
pub fn payload(body: Value) -> Value {
    match body {
        Value::Object(root) if root.len() == 1 => root
            .into_iter()
            .next()
            .map(|(_, content)| content)
            .unwrap_or(Value::Null),
        other => other,
    }
}

fn flatten_with(variations: &[String], tree: Value) -> Value {
    let Value::Object(mut node) = tree else {
        return tree;
    };

    let Some(key) = single_interesting_key(&node) else {
        return Value::Object(node);
    };

    if !variations.contains(&inflect::underscore(&key)) {
        return Value::Object(node);
    }

    match node.remove(&key) {
        Some(inner) => flatten_with(variations, inner),
        None => Value::Object(node),
    }
}

fn single_interesting_key(node: &Map<String, Value>) -> Option<String> {
    let mut keys = node.keys().filter(|key| is_interesting(key));

    match (keys.next(), keys.next()) {
        (Some(key), None) => Some(key.clone()),
        _ => None,
    }
}

fn is_interesting(key: &str) -> bool {
    let unprefixed = key.trim_start_matches('@');
    !(unprefixed.starts_with("xmlns") || key == TOTAL_RECORDS_KEY)
}

/// Every snake_case wrapper name that may surround the payload of `action`.
fn name_variations(action: &Action) -> Vec<String> {
    let subject = action.subject();
    let plural = inflect::pluralize(&subject);

    vec![
        format!("{subject}_record"),
        format!("{subject}_records"),
        format!("{subject}_collection"),
        format!("{plural}_record"),
        format!("{plural}_records"),
        format!("{}_result", action.name()),
        format!("{}_response", action.name()),
        subject,
        plural,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_and_arrays_are_unchanged() {
        assert_eq!(flatten("get_payments", json!("text")), json!("text"));
        assert_eq!(flatten("get_payments", json!(42)), json!(42));
        assert_eq!(flatten("get_payments", Value::Null), Value::Null);
        assert_eq!(flatten("get_payments", json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_zero_or_many_keys_are_unchanged() {
        let empty = json!({});
        let many = json!({ "Payment": [], "Other": 1 });
        let only_metadata = json!({ "@xmlns:a": "urn:x", "TotalRecords": "3" });

        assert_eq!(flatten("get_payments", empty.clone()), empty);
        assert_eq!(flatten("get_payments", many.clone()), many);
        assert_eq!(flatten("get_payments", only_metadata.clone()), only_metadata);
    }

    #[test]
    fn test_get_payments_unwraps_to_payment_list() {
        let payments = json!([{ "Amount": "12.50" }, { "Amount": "7.00" }]);
        let tree = json!({
            "GetPaymentsResult": {
                "Payments": { "Payment": payments.clone() }
            }
        });

        assert_eq!(flatten("get_payments", tree), payments);
    }

    #[test]
    fn test_namespace_and_total_records_keys_are_ignored() {
        let tree = json!({
            "@xmlns:a": "http://affilinet.framework.webservices/types",
            "TotalRecords": "1",
            "TransactionCollection": {
                "@xmlns:i": "http://www.w3.org/2001/XMLSchema-instance",
                "Transaction": { "TransactionId": "9" }
            }
        });

        assert_eq!(
            flatten("get_transactions", tree),
            json!({ "TransactionId": "9" })
        );
    }

    #[test]
    fn test_record_suffixed_wrappers() {
        let tree = json!({ "SubIdStatisticsRecords": { "Records": [1] } });

        assert_eq!(flatten("get_sub_id_statistics", tree), json!({ "Records": [1] }));
    }

    #[test]
    fn test_unrelated_single_key_stops_unwrapping() {
        let tree = json!({ "Payments": { "Summary": { "Total": "3" } } });

        assert_eq!(
            flatten("get_payments", tree),
            json!({ "Summary": { "Total": "3" } })
        );
    }

    #[test]
    fn test_payload_takes_single_root_content() {
        let body = json!({ "GetPaymentsResponse": { "GetPaymentsResult": {} } });

        assert_eq!(payload(body), json!({ "GetPaymentsResult": {} }));
        assert_eq!(payload(json!({ "A": 1, "B": 2 })), json!({ "A": 1, "B": 2 }));
        assert_eq!(payload(json!("text")), json!("text"));
    }

    #[test]
    fn test_variations() {
        let variations = name_variations(&Action::new("get_payments"));

        for expected in [
            "payment",
            "payment_record",
            "payment_records",
            "payment_collection",
            "payments",
            "payments_record",
            "payments_records",
        ] {
            assert!(variations.contains(&expected.to_string()), "{expected}");
        }
    }
}
