//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use unigate_config::ConfigError;
use unigate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach UniGate at {url}")]
    #[diagnostic(
        code(unigate::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             Reason: {reason}\n\
             Development backends with self-signed certificates need --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(unigate::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(unigate::auth_failed),
        help("Check your email and password, or reset it with: unigate password request-reset")
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(code(unigate::not_signed_in), help("Run: unigate login"))]
    NotSignedIn,

    #[error("Session expired")]
    #[diagnostic(
        code(unigate::session_expired),
        help("The server rejected the stored token; it has been cleared. Run: unigate login")
    )]
    SessionExpired,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(unigate::permission_denied),
        help("This command needs an administrator or security account.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(unigate::not_found))]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(unigate::api_error))]
    ApiError { status: u16, message: String },

    /// A screen load failed; only the user-facing message survives.
    #[error("{message}")]
    #[diagnostic(code(unigate::load_failed), help("Re-run with -v for request details."))]
    LoadFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unigate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(unigate::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: unigate config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(unigate::config), help("Inspect the file with: unigate config show"))]
    Config { message: String },

    #[error("Credential storage error: {message}")]
    #[diagnostic(
        code(unigate::token_store),
        help("Try another store with --token-store file (or memory).")
    )]
    TokenStore { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(unigate::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(unigate::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn | Self::SessionExpired => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired { .. } => Self::SessionExpired,
            CoreError::NotAuthenticated => Self::NotSignedIn,
            CoreError::PermissionDenied { message } => Self::PermissionDenied { message },
            CoreError::NotFound { message } => Self::NotFound { message },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Rejected { status, message } => Self::ApiError { status, message },
            CoreError::Config { message } => Self::Config { message },
            CoreError::Storage { message } => Self::TokenStore { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<unigate_api::Error> for CliError {
    fn from(err: unigate_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile(name) => Self::ProfileNotFound {
                name,
                available: "(see unigate config profiles)".into(),
            },
            ConfigError::TokenStore(e) => Self::TokenStore {
                message: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
