// ── Login screen ──

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::error::CoreError;
use crate::model::User;
use crate::route::Route;
use crate::session::Session;
use crate::view_state::{StateCell, ViewState};

/// A successful sign-in and where to send the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub struct LoginController {
    session: Session,
    state: StateCell<ViewState<LoginOutcome>>,
}

impl LoginController {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<LoginOutcome> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<LoginOutcome>> {
        self.state.subscribe()
    }

    /// Validate, sign in, and resolve the landing route for the user's role.
    pub async fn submit(&self, email: &str, password: &SecretString) -> ViewState<LoginOutcome> {
        self.state.set(ViewState::Loading);
        let next = ViewState::from_result(self.attempt(email, password).await);
        self.state.set(next.clone());
        next
    }

    async fn attempt(&self, email: &str, password: &SecretString) -> Result<LoginOutcome, CoreError> {
        validate_credentials(email, password)?;
        let user = self.session.login(email, password).await?;
        let route = Route::landing_for(user.role);
        info!(role = %user.role, %route, "signed in");
        Ok(LoginOutcome { user, route })
    }
}

fn validate_credentials(email: &str, password: &SecretString) -> Result<(), CoreError> {
    if email.trim().is_empty() || password.expose_secret().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "email and password are required".into(),
        });
    }
    Ok(())
}
