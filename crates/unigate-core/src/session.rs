// ── Session facade ──
//
// Wires credential store, token cache and API client together and owns
// the flows that write to the store: login, logout, password reset.
// Everything is injected; there is no process-global session.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use unigate_api::types::{
    LoginRequest, OtpValidationRequest, PasswordChangeRequest, PasswordResetRequest,
    PasswordUpdateRequest,
};
use unigate_api::{ApiClient, CredentialStore, SessionToken, TokenCache};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::User;

/// Whether a usable session token is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Anonymous,
}

impl AuthState {
    fn of(token: Option<&SessionToken>) -> Self {
        match token {
            Some(t) if !t.is_blank() => Self::Authenticated,
            _ => Self::Anonymous,
        }
    }
}

/// Entry point for hosts. Cheap to clone; clones share store and cache.
#[derive(Clone)]
pub struct Session {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    cache: TokenCache,
    settle_timeout: Duration,
}

impl Session {
    /// Build a session over `store`. Must be called inside a tokio runtime:
    /// the token cache starts mirroring the store immediately, and already
    /// holds the stored token when this returns.
    pub async fn new(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        let cache = TokenCache::mirror(Arc::clone(&store)).await;
        let api = ApiClient::authenticated(
            config.api_url.as_str(),
            &config.transport(),
            cache.clone(),
            Arc::clone(&store),
        )?;
        debug!(api_url = %api.base_url(), "session created");

        Ok(Self {
            api,
            store,
            cache,
            settle_timeout: config.settle_timeout,
        })
    }

    /// The authenticated API client, for endpoint calls without a controller.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    // ── Authentication state ────────────────────────────────────────

    /// Authenticated/anonymous, current value first, then every change.
    ///
    /// A 401 on any call shows up here as `Anonymous`.
    pub fn observe_auth(&self) -> BoxStream<'static, AuthState> {
        self.store
            .observe()
            .map(|token| AuthState::of(token.as_ref()))
            .boxed()
    }

    pub async fn is_authenticated(&self) -> bool {
        AuthState::of(self.store.current().await.as_ref()) == AuthState::Authenticated
    }

    /// The account behind the stored token.
    pub async fn current_user(&self) -> Result<User, CoreError> {
        if !self.is_authenticated().await {
            return Err(CoreError::NotAuthenticated);
        }
        Ok(self.api.current_user().await?.into())
    }

    // ── Login / logout ──────────────────────────────────────────────

    /// Sign in, persist the token, and fetch the account.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        let request = LoginRequest {
            email: email.trim().to_owned(),
            password: password.expose_secret().to_owned(),
        };
        let response = self.api.login(&request).await.map_err(login_error)?;

        let token = SessionToken::new(response.token);
        if token.is_blank() {
            return Err(CoreError::AuthenticationFailed {
                message: "server returned an empty token".into(),
            });
        }

        self.store.save(token.clone()).await?;
        if !self.cache.settled(Some(&token), self.settle_timeout).await {
            warn!(
                timeout = ?self.settle_timeout,
                "token cache did not pick up the new token in time"
            );
        }

        let user: User = self.api.current_user().await?.into();
        info!(user_id = user.id, role = %user.role, "signed in");
        Ok(user)
    }

    /// End the session. The local token is cleared even when the server
    /// call fails.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(e) = self.api.logout().await {
            debug!(error = %e, "server-side logout failed; clearing locally");
        }
        self.store.clear().await?;
        self.cache.settled(None, self.settle_timeout).await;
        info!("signed out");
        Ok(())
    }

    // ── Passwords ───────────────────────────────────────────────────

    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<String, CoreError> {
        let request = PasswordChangeRequest {
            old_password: old_password.expose_secret().to_owned(),
            new_password: new_password.expose_secret().to_owned(),
        };
        Ok(self.api.change_password(&request).await?)
    }

    /// Ask the server to email a one-time code to `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, CoreError> {
        let request = PasswordResetRequest {
            email: email.trim().to_owned(),
        };
        Ok(self.api.request_password_reset(&request).await?)
    }

    /// Verify the emailed code, set the new password, then sign in with it.
    pub async fn complete_password_reset(
        &self,
        email: &str,
        otp: &str,
        new_password: &SecretString,
    ) -> Result<User, CoreError> {
        let email = email.trim();
        let verified = self
            .api
            .verify_otp(&OtpValidationRequest {
                email: email.to_owned(),
                otp_code: otp.trim().to_owned(),
            })
            .await?;

        self.api
            .reset_password(&PasswordUpdateRequest {
                reset_token: verified.reset_token,
                email: email.to_owned(),
                new_password: new_password.expose_secret().to_owned(),
            })
            .await?;
        debug!("password reset accepted");

        self.login(email, new_password).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Rejections at login mean bad credentials, not an expired session.
fn login_error(err: unigate_api::Error) -> CoreError {
    match err {
        unigate_api::Error::Unauthorized { .. } => CoreError::AuthenticationFailed {
            message: "Invalid email or password".into(),
        },
        unigate_api::Error::Api {
            status: 400,
            message,
        } => CoreError::AuthenticationFailed { message },
        other => other.into(),
    }
}
