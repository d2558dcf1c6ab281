use thiserror::Error;

/// Top-level error type for the `unigate-api` crate.
///
/// Endpoint callers never panic or throw past their own boundary: every
/// transport or HTTP failure is normalized into one of these variants.
/// `unigate-core` maps them into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the session token (HTTP 401).
    ///
    /// By the time a caller sees this, the unauthorized middleware has
    /// already scheduled the stored credentials for removal.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response with the server-supplied detail.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local state ─────────────────────────────────────────────────
    /// The credential storage medium failed to read or write.
    #[error("Credential storage error: {0}")]
    CredentialStorage(String),
}

impl Error {
    /// Returns `true` if the server rejected the current session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// HTTP status code carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_for_http_failures() {
        let err = Error::Api {
            status: 404,
            message: "missing".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());

        let err = Error::Unauthorized {
            message: "expired".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn local_failures_have_no_status() {
        let err = Error::CredentialStorage("disk full".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
    }
}
