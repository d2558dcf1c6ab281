//! Shared configuration for UniGate tools.
//!
//! TOML profiles, token-store selection, and translation to
//! `unigate_core::ClientConfig`. The CLI layers flag overrides on top.

mod keyring_store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use unigate_api::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use unigate_core::{ClientConfig, TlsVerification, config::DEFAULT_API_URL};

pub use keyring_store::KeyringCredentialStore;

const APP_NAME: &str = "unigate";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("token store unavailable: {0}")]
    TokenStore(#[from] unigate_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named deployments.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, falling back to the default profile name.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            // An unconfigured "default" profile points at a local backend.
            None if name == "default" => Ok((name, Profile::default())),
            None => Err(ConfigError::UnknownProfile(name)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its session token between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenStoreKind {
    /// Platform keychain.
    #[default]
    Keyring,
    /// A 0600 file under the data directory.
    File,
    /// Nothing survives the process.
    Memory,
}

/// A named UniGate deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://gate.example.edu/api").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,

    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Last email used to sign in, offered as the login prompt default.
    pub email: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            token_store: TokenStoreKind::default(),
            email: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("edu", APP_NAME, APP_NAME)
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Token file for a profile using [`TokenStoreKind::File`].
pub fn token_path(profile_name: &str) -> PathBuf {
    let base = project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf());
    base.join("tokens").join(profile_name)
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push(APP_NAME);
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if any), then `UNIGATE_*` env.
///
/// Nested keys use a double underscore: `UNIGATE_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UNIGATE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, with `defaults` filling gaps.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ClientConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

/// Open the token store a profile is configured for.
pub async fn open_credential_store(
    kind: TokenStoreKind,
    profile_name: &str,
) -> Result<Arc<dyn CredentialStore>, ConfigError> {
    let store: Arc<dyn CredentialStore> = match kind {
        TokenStoreKind::Keyring => Arc::new(KeyringCredentialStore::open(profile_name).await?),
        TokenStoreKind::File => Arc::new(FileCredentialStore::open(token_path(profile_name)).await?),
        TokenStoreKind::Memory => Arc::new(MemoryCredentialStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.timeout, 30);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn profiles_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "campus".into(),
            Profile {
                api_url: "https://gate.uni.edu/api".into(),
                token_store: TokenStoreKind::File,
                timeout: Some(5),
                ..Profile::default()
            },
        );
        config.default_profile = Some("campus".into());
        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (name, profile) = loaded.profile(None).unwrap();
        assert_eq!(name, "campus");
        assert_eq!(profile.api_url, "https://gate.uni.edu/api");
        assert_eq!(profile.token_store, TokenStoreKind::File);
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn token_store_parses_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[profiles.dev]\napi_url = \"https://localhost:7258\"\ntoken_store = \"memory\"\ninsecure = true\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        let (_, dev) = config.profile(Some("dev")).unwrap();
        assert_eq!(dev.token_store, TokenStoreKind::Memory);

        let client = profile_to_client_config(&dev, &config.defaults).unwrap();
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.profile(Some("nope")),
            Err(ConfigError::UnknownProfile(_))
        ));
        assert_eq!(config.profile(None).unwrap().1.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn memory_store_opens_empty() {
        let store = open_credential_store(TokenStoreKind::Memory, "t").await.unwrap();
        assert_eq!(store.current().await, None);
    }
}
