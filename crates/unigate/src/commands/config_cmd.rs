//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use unigate_config::{Config, Profile, TokenStoreKind};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display. Tokens never live in the file, so only
/// the email is shown partially.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        let _ = writeln!(out, "token_store = \"{}\"", p.token_store);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{}\"", mask_email(email));
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// `jane.doe@uni.edu` -> `j***@uni.edu`
fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return "***".into();
    };
    let first = local.chars().next().map(String::from).unwrap_or_default();
    format!("{first}***@{domain}")
}

fn save(cfg: &Config) -> Result<(), CliError> {
    unigate_config::save_config(cfg)?;
    Ok(())
}

fn available(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = unigate_config::config_path();
            eprintln!("✨ UniGate CLI configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = unigate_config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(unigate_core::config::DEFAULT_API_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let stores = [
                TokenStoreKind::Keyring,
                TokenStoreKind::File,
                TokenStoreKind::Memory,
            ];
            let labels = &[
                "System keyring (recommended)",
                "File in the data directory",
                "Memory only (sign in every run)",
            ];
            let selection = Select::new()
                .with_prompt("Where should the session token be kept?")
                .items(labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let token_store = stores.get(selection).copied().unwrap_or_default();

            let insecure = Confirm::new()
                .with_prompt("Accept self-signed certificates (development backends)?")
                .default(api_url.contains("localhost"))
                .interact()
                .map_err(prompt_err)?;

            let profile = Profile {
                api_url,
                insecure: insecure.then_some(true),
                token_store,
                ..Profile::default()
            };
            // Validate before writing anything.
            unigate_config::profile_to_client_config(&profile, &cfg.defaults)?;

            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            save(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Sign in with: unigate login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = unigate_config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(
                &unigate_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = unigate_config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: unigate config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if *name == active { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = unigate_config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}
