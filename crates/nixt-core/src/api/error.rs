use nixt_traits::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Error connecting to server: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Build a status error from the body's `message` field.
    pub(crate) fn status(status: u16, body: Option<&serde_json::Value>) -> Self {
        let message = body
            .and_then(|b| b.get("message"))
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        ApiError::Status { status, message }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403: the caller lacks access rather than hitting a fault.
    pub fn is_access_denied(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_message_fallback() {
        let err = ApiError::status(500, None);
        assert_eq!(err.to_string(), "HTTP error! status: 500");

        let body = json!({ "message": "Project not found" });
        let err = ApiError::status(404, Some(&body));
        assert_eq!(err.to_string(), "Project not found");
        assert!(!err.is_access_denied());
        assert!(ApiError::status(403, None).is_access_denied());
    }
}
