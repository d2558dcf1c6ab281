//! Session command handlers: login, logout, whoami, password.

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use unigate_core::{LoginController, User, ViewState};

use crate::cli::{GlobalOpts, LoginArgs, PasswordArgs, PasswordCommand};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Prompts ─────────────────────────────────────────────────────────

fn prompt_email(default: Option<&str>) -> Result<String, CliError> {
    let mut input = Input::<String>::new().with_prompt("Email");
    if let Some(email) = default {
        input = input.default(email.to_owned());
    }
    input.interact_text().map_err(util::prompt_err)
}

fn prompt_secret(label: &str) -> Result<SecretString, CliError> {
    rpassword::prompt_password(label)
        .map(SecretString::from)
        .map_err(util::prompt_err)
}

/// Ask twice and insist on a match.
fn prompt_new_password() -> Result<SecretString, CliError> {
    let first = prompt_secret("New password: ")?;
    let second = prompt_secret("Repeat new password: ")?;
    if first.expose_secret() != second.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }
    if first.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(first)
}

fn password_from(args: &LoginArgs) -> Result<SecretString, CliError> {
    let Some(ref var) = args.password_env else {
        return prompt_secret("Password: ");
    };
    std::env::var(var)
        .map(SecretString::from)
        .map_err(|_| CliError::Validation {
            field: "password-env".into(),
            reason: format!("environment variable {var} is not set"),
        })
}

/// Remember the last email used for this profile. Failures only warn.
fn remember_email(ctx: &SessionContext, email: &str) {
    let mut cfg = unigate_config::load_config_or_default();
    let profile = cfg
        .profiles
        .entry(ctx.profile_name.clone())
        .or_insert_with(|| ctx.profile.clone());
    if profile.email.as_deref() == Some(email) {
        return;
    }
    profile.email = Some(email.to_owned());
    if let Err(e) = unigate_config::save_config(&cfg) {
        tracing::warn!(error = %e, "could not save email to profile");
    }
}

fn user_detail(user: &User) -> String {
    output::detail(&[
        ("ID", user.id.to_string()),
        ("Name", user.full_name()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
    ])
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    ctx: &SessionContext,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = if let Some(ref email) = args.email {
        email.clone()
    } else {
        prompt_email(ctx.profile.email.as_deref())?
    };
    let password = password_from(&args)?;

    let controller = LoginController::new(ctx.session.clone());
    match controller.submit(&email, &password).await {
        ViewState::Loaded(outcome) => {
            remember_email(ctx, email.trim());
            output::notice(
                &format!(
                    "✓ Signed in as {} ({}), landing page {}",
                    outcome.user.full_name(),
                    outcome.user.role,
                    outcome.route
                ),
                global.quiet,
            );
            Ok(())
        }
        ViewState::Failed(err) => Err(CliError::AuthFailed {
            message: err.message,
        }),
        ViewState::Idle | ViewState::Loading => {
            Err(CliError::Internal("login did not complete".into()))
        }
    }
}

pub async fn logout(ctx: &SessionContext, global: &GlobalOpts) -> Result<(), CliError> {
    if !ctx.session.is_authenticated().await {
        output::notice("Not signed in", global.quiet);
        return Ok(());
    }
    ctx.session.logout().await?;
    output::notice("✓ Signed out", global.quiet);
    Ok(())
}

pub async fn whoami(ctx: &SessionContext, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let user = ctx.session.current_user().await?;
    let out = output::render_single(&global.output, &user, user_detail, |u| u.email.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn password(
    ctx: &SessionContext,
    args: PasswordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PasswordCommand::Change => {
            util::require_session(ctx).await?;
            let old = prompt_secret("Current password: ")?;
            let new = prompt_new_password()?;
            let message = ctx.session.change_password(&old, &new).await?;
            output::notice(&format!("✓ {message}"), global.quiet);
            Ok(())
        }

        PasswordCommand::RequestReset { email } => {
            let message = ctx.session.request_password_reset(&email).await?;
            output::notice(&format!("✓ {message}"), global.quiet);
            Ok(())
        }

        PasswordCommand::Reset { email, otp } => {
            let new = prompt_new_password()?;
            let user = ctx
                .session
                .complete_password_reset(&email, &otp, &new)
                .await?;
            remember_email(ctx, email.trim());
            output::notice(
                &format!("✓ Password reset; signed in as {}", user.full_name()),
                global.quiet,
            );
            Ok(())
        }
    }
}
