//! # Actions
//!
//! An [`Action`] pairs the snake_case name a caller uses (`get_sub_id_statistics`) with the
//! canonical operation name advertised by the endpoint (`GetSubIDStatistics`).
use crate::inflect;

/// Canonical names that plain case conversion gets wrong.
const CANONICAL_EXCEPTIONS: &[(&str, &str)] = &[("GetSubIdStatistics", "GetSubIDStatistics")];

/// Leading verbs stripped from an action name to find the subject of its response.
const VERBS: &[&str] = &["get", "create", "update", "send", "set", "delete"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    canonical: String,
}

impl Action {
    /// Resolves the canonical remote name of a snake_case action name.
    pub fn new(name: &str) -> Self {
        let camelized = inflect::camelize(name);
        let canonical = CANONICAL_EXCEPTIONS
            .iter()
            .find(|(conventional, _)| *conventional == camelized)
            .map(|(_, canonical)| (*canonical).to_string())
            .unwrap_or(camelized);

        Self {
            name: name.to_string(),
            canonical,
        }
    }

    /// The snake_case name supplied by the caller.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operation name advertised by the endpoint.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The singular noun the action operates on.
    ///
    /// `get_payments` -> `payment`, `search_creatives` -> `search_creative`.
    pub fn subject(&self) -> String {
        let without_verb = VERBS
            .iter()
            .find_map(|verb| {
                self.name
                    .strip_prefix(verb)
                    .and_then(|rest| rest.strip_prefix('_'))
            })
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&self.name);

        inflect::singularize(without_verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(Action::new("get_payments").canonical(), "GetPayments");
        assert_eq!(Action::new("search_creatives").canonical(), "SearchCreatives");
        assert_eq!(Action::new("get_program_list").canonical(), "GetProgramList");
    }

    #[test]
    fn test_sub_id_acronym_exception() {
        let action = Action::new("get_sub_id_statistics");

        assert_eq!(action.canonical(), "GetSubIDStatistics");
        assert_eq!(action.name(), "get_sub_id_statistics");
    }

    #[test]
    fn test_subject() {
        assert_eq!(Action::new("get_payments").subject(), "payment");
        assert_eq!(Action::new("get_creative_categories").subject(), "creative_category");
        assert_eq!(Action::new("delete_messages").subject(), "message");
        assert_eq!(Action::new("search_creatives").subject(), "search_creative");
        assert_eq!(Action::new("getaway_plans").subject(), "getaway_plan");
        assert_eq!(Action::new("get").subject(), "get");
    }
}
