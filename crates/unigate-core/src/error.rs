// ── Core error types ──
//
// User-facing errors from unigate-core. Consumers never match on raw
// transport failures; the `From<unigate_api::Error>` impl folds them into
// the variants below.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ───────────────────────────────────────────
    #[error("Cannot reach UniGate at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Session errors ──────────────────────────────────────────────
    /// Credentials were rejected at login.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The server rejected the stored session; it has been cleared.
    #[error("Session expired: {message}")]
    SessionExpired { message: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    // ── Data errors ─────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Local errors ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Credential storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short message suitable for a status line or a `Failed` view state.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectionFailed { .. } => "Cannot reach the server. Check your connection.".into(),
            Self::Timeout => "The server took too long to respond.".into(),
            Self::AuthenticationFailed { message } | Self::ValidationFailed { message } => {
                message.clone()
            }
            Self::SessionExpired { .. } | Self::NotAuthenticated => {
                "Your session has ended. Please sign in again.".into()
            }
            Self::PermissionDenied { .. } => "You do not have access to this.".into(),
            Self::NotFound { message } | Self::Rejected { message, .. } => message.clone(),
            Self::Config { message } => format!("Configuration problem: {message}"),
            Self::Storage { .. } => "Could not access saved credentials.".into(),
            Self::Internal(_) => "Something went wrong. Please try again.".into(),
        }
    }

    /// The stored session is gone, either rejected by the server or never
    /// there.
    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::SessionExpired { .. } | Self::NotAuthenticated)
    }

    /// HTTP status behind the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } => Some(401),
            Self::PermissionDenied { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ──────────────────────────

impl From<unigate_api::Error> for CoreError {
    fn from(err: unigate_api::Error) -> Self {
        match err {
            unigate_api::Error::Unauthorized { message } => CoreError::SessionExpired { message },
            unigate_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Rejected {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            unigate_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            unigate_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            unigate_api::Error::Api { status, message } => match status {
                403 => CoreError::PermissionDenied { message },
                404 => CoreError::NotFound { message },
                400 | 422 => CoreError::ValidationFailed { message },
                _ => CoreError::Rejected { status, message },
            },
            unigate_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response: {message}"))
            }
            unigate_api::Error::CredentialStorage(message) => CoreError::Storage { message },
        }
    }
}
