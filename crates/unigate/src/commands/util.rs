//! Shared helpers for command handlers.

use unigate_core::{LoadError, ViewState};

use crate::config::SessionContext;
use crate::error::CliError;

/// Fail fast with `NotSignedIn` when no token is stored.
pub async fn require_session(ctx: &SessionContext) -> Result<(), CliError> {
    if ctx.session.is_authenticated().await {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

/// Unwrap a finished screen load.
///
/// A failure that ended the session is reported as an expired session so
/// the exit code tells scripts to sign in again.
pub fn settle<T>(state: ViewState<T>) -> Result<T, CliError> {
    match state {
        ViewState::Loaded(value) => Ok(value),
        ViewState::Failed(err) => Err(failure(err)),
        ViewState::Idle | ViewState::Loading => Err(CliError::Internal(
            "screen load did not complete".into(),
        )),
    }
}

/// Map a failure captured by a controller onto a CLI error.
pub fn failure(err: LoadError) -> CliError {
    if err.session_ended {
        CliError::SessionExpired
    } else {
        CliError::LoadFailed {
            message: err.message,
        }
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// `Some(text)` unless blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
