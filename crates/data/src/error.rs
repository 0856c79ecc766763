//! Errors returned by backend calls.
//!
//! Failures are split by who is responsible for them: the backend rejecting
//! the request ([`ApiError::Rejected`], [`ApiError::Unauthorized`]) versus the
//! backend being unreachable or broken ([`ApiError::Transport`],
//! [`ApiError::Server`], [`ApiError::Decode`]). Only the second class lets
//! strategy synthesis fall back to a locally generated artifact.

use reqwest::StatusCode;

/// Errors produced while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never got a response: connect failure, timeout, reset.
    #[error("Backend unreachable: {0}")]
    Transport(String),
    /// The backend answered with a 5xx status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the body.
        message: String,
        /// Whether `message` came from the body's `error` field.
        keyed: bool,
    },
    /// The backend refused the request with a 4xx status and a message.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the body, shown verbatim.
        message: String,
        /// Whether `message` came from the body's `error` field.
        keyed: bool,
    },
    /// The backend requires a signed-in session.
    #[error("Authentication required ({status})")]
    Unauthorized {
        /// 401 or 403.
        status: u16,
    },
    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds the error for a non-success response.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let code = status.as_u16();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Self::Unauthorized { status: code };
        }

        let (message, keyed) = extract_message(body).unwrap_or_else(|| {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            (reason.to_string(), false)
        });

        if status.is_server_error() {
            Self::Server {
                status: code,
                message,
                keyed,
            }
        } else {
            Self::Rejected {
                status: code,
                message,
                keyed,
            }
        }
    }

    /// A 4xx refusal carrying an `error` message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
            keyed: true,
        }
    }

    /// A 5xx failure carrying an `error` message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
            keyed: true,
        }
    }

    /// Whether the failure lies with reaching or running the backend,
    /// rather than with the request itself.
    #[must_use]
    pub fn is_transport_class(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Server { .. } | Self::Decode(_)
        )
    }

    /// Message the backend supplied, when it supplied one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } | Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The body's `error` field, when the backend sent one.
    #[must_use]
    pub fn error_field(&self) -> Option<&str> {
        match self {
            Self::Server {
                message,
                keyed: true,
                ..
            }
            | Self::Rejected {
                message,
                keyed: true,
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. }
            | Self::Rejected { status, .. }
            | Self::Unauthorized { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Result alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Pulls the human-readable message out of an error body, flagging whether
/// it was the `error` field.
///
/// Looks for `error`, then `detail`, then `message`; falls back to the raw
/// text when the body is not JSON.
fn extract_message(body: &str) -> Option<(String, bool)> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some((trimmed.to_string(), false));
    };
    ["error", "detail", "message"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .map(|message| (message.to_string(), *key == "error"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_server_message() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Select at least one indicator"}"#,
        );
        assert_eq!(
            err,
            ApiError::rejected(400, "Select at least one indicator")
        );
        assert!(!err.is_transport_class());
        assert_eq!(err.to_string(), "Select at least one indicator");
    }

    #[test]
    fn test_server_errors_are_transport_class() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
        assert!(err.is_transport_class());
        assert_eq!(err.server_message(), Some("Bad Gateway"));
    }

    #[test]
    fn test_auth_statuses() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, r#"{"detail": "nope"}"#);
        assert_eq!(err, ApiError::Unauthorized { status: 403 });
        assert!(!err.is_transport_class());
    }

    #[test]
    fn test_detail_and_plain_text_bodies() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#);
        assert_eq!(err.server_message(), Some("Not found."));

        let err = ApiError::from_status(StatusCode::CONFLICT, "robot busy");
        assert_eq!(err.server_message(), Some("robot busy"));
    }

    #[test]
    fn test_error_field_only_for_error_key() {
        let keyed = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "No MT5 account"}"#);
        assert_eq!(keyed.error_field(), Some("No MT5 account"));

        let detail = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#);
        assert_eq!(detail.error_field(), None);

        let html = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert_eq!(html.server_message(), Some("<html>Bad Gateway</html>"));
        assert_eq!(html.error_field(), None);
    }
}
