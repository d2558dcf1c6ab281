// ── Runtime client configuration ──
//
// Describes *where* and *how* to reach the UniGate API. Never touches
// disk: the CLI (or any other host) builds a `ClientConfig` and hands it
// to `Session::new`.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use unigate_api::transport::{TlsMode, TransportConfig};

/// API root used by a local development backend.
pub const DEFAULT_API_URL: &str = "https://localhost:7258/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development certs).
    DangerAcceptInvalid,
}

/// Connection settings for a single UniGate deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://gate.example.edu/api`.
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long login waits for the token cache to pick up a new token.
    pub settle_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            settle_timeout: Duration::from_secs(2),
        }
    }

    /// Transport settings for building the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}
