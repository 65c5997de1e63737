use nixt_traits::StoreError;
use thiserror::Error;

/// Auth client failures. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service answered with a non-success status.
    #[error("{0}")]
    Rejected(String),

    #[error("Server connection error{}", connection_detail(.detail))]
    Connection { detail: Option<String> },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub(crate) fn connection(detail: impl ToString) -> Self {
        AuthError::Connection {
            detail: Some(detail.to_string()),
        }
    }

    pub(crate) fn connection_bare() -> Self {
        AuthError::Connection { detail: None }
    }

    /// Use the body's `error` field, else `fallback`.
    pub(crate) fn rejected(body: &serde_json::Value, fallback: &str) -> Self {
        let message = body
            .get("error")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback);
        AuthError::Rejected(message.to_string())
    }
}

fn connection_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages() {
        assert_eq!(
            AuthError::rejected(&json!({ "error": "Invalid credentials" }), "Login failed")
                .to_string(),
            "Invalid credentials"
        );
        assert_eq!(
            AuthError::rejected(&json!({}), "Registration failed").to_string(),
            "Registration failed"
        );
        assert_eq!(
            AuthError::connection("connection refused").to_string(),
            "Server connection error: connection refused"
        );
        assert_eq!(
            AuthError::connection_bare().to_string(),
            "Server connection error"
        );
    }
}
