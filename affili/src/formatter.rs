use affili_core::{InvokeError, LogonError, inflect, transport::TransportError};
use colored::*;
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// The canonical action names advertised by a service.
pub struct ActionList(pub String, pub Vec<String>);

pub struct GenericError<T: Display>(pub &'static str, pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<InvokeError> for FormattedString {
    fn from(err: InvokeError) -> Self {
        let title = match &err {
            InvokeError::UnsupportedOperation { .. } => "Unsupported Action:",
            InvokeError::MissingRequiredParameter { .. } => "Missing Parameter:",
            InvokeError::ServiceFault(_) => "Service Fault:",
            InvokeError::InvalidParameters { .. } => "Invalid Parameters:",
            InvokeError::Logon(LogonError::Transport(_)) | InvokeError::Transport(_) => {
                "Connection Error:"
            }
            InvokeError::Logon(_) => "Logon Failed:",
        };

        FormattedString(format!("{}\n\n{}", title.red().bold(), err))
    }
}

impl From<TransportError> for FormattedString {
    fn from(err: TransportError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Connection Error:".red().bold(), err))
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<ActionList> for FormattedString {
    fn from(ActionList(service, actions): ActionList) -> Self {
        if actions.is_empty() {
            return FormattedString(format!("No actions found for '{service}'.").yellow().to_string());
        }

        let mut out = String::new();
        out.push_str(&format!("Available actions of {}:\n", service.cyan()));
        for action in actions {
            out.push_str(&format!("  - {}\n", inflect::underscore(&action).green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_list_uses_snake_case() {
        colored::control::set_override(false);

        let list = ActionList(
            "statistics".to_string(),
            vec![
                "GetDailyStatistics".to_string(),
                "GetSubIDStatistics".to_string(),
            ],
        );

        let FormattedString(out) = FormattedString::from(list);

        assert_eq!(
            out,
            "Available actions of statistics:\n  - get_daily_statistics\n  - get_sub_id_statistics"
        );
    }

    #[test]
    fn test_value_is_pretty_printed() {
        let FormattedString(out) = FormattedString::from(json!({ "Amount": "12.50" }));

        assert_eq!(out, "{\n  \"Amount\": \"12.50\"\n}");
    }
}
