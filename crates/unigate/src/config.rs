//! CLI-side profile resolution: config file + global flags -> `Session`.
//!
//! Core never sees these types; it receives a pre-built `ClientConfig`
//! and an opened credential store.

use std::time::Duration;

use unigate_config::{Config, Profile};
use unigate_core::{ClientConfig, Session, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command handler needs.
pub struct SessionContext {
    pub session: Session,
    pub profile_name: String,
    pub profile: Profile,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a profile + global flags into a `ClientConfig`.
///
/// Flags win over the profile, the profile wins over `[defaults]`.
pub fn resolve_client_config(
    cfg: &Config,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }

    let mut client = unigate_config::profile_to_client_config(&profile, &cfg.defaults)?;
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

/// Load config, open the profile's token store, and build the session.
pub async fn open_session(global: &GlobalOpts) -> Result<SessionContext, CliError> {
    let cfg = unigate_config::load_config_or_default();
    let requested = active_profile_name(global, &cfg);
    let (profile_name, profile) = cfg.profile(Some(requested.as_str()))?;

    let client = resolve_client_config(&cfg, &profile, global)?;
    let store_kind = global.token_store.unwrap_or(profile.token_store);
    let store = unigate_config::open_credential_store(store_kind, &profile_name).await?;
    tracing::debug!(profile = %profile_name, store = %store_kind, api_url = %client.api_url, "opening session");

    let session = Session::new(&client, store).await?;
    Ok(SessionContext {
        session,
        profile_name,
        profile,
    })
}
