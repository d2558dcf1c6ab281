// Request/response middleware
//
// Hooks run by `ApiClient` around every call: request hooks in registration
// order before the request goes out, response hooks once the status line
// is back. Neither kind may block or fail the call.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::{debug, trace, warn};

use crate::credentials::CredentialStore;
use crate::token_cache::TokenCache;

/// A synchronous interceptor around the HTTP transport.
pub trait Middleware: Send + Sync {
    /// Inspect or rewrite an outbound request.
    fn on_request(&self, _request: &mut reqwest::Request) {}

    /// Observe an inbound response before the caller decodes it.
    fn on_response(&self, _response: &reqwest::Response) {}
}

// ── RequestAuthenticator ────────────────────────────────────────────

/// Attaches `Authorization: Bearer <token>` when the cache holds a
/// non-blank token. Requests go out unmodified otherwise.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    cache: TokenCache,
}

impl RequestAuthenticator {
    pub fn new(cache: TokenCache) -> Self {
        Self { cache }
    }
}

impl Middleware for RequestAuthenticator {
    fn on_request(&self, request: &mut reqwest::Request) {
        let Some(token) = self.cache.current() else {
            return;
        };
        if token.is_blank() {
            return;
        }

        match HeaderValue::from_str(&format!("Bearer {}", token.expose())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
                trace!(url = %request.url(), "bearer token attached");
            }
            Err(_) => warn!("stored token is not a valid header value; sending unauthenticated"),
        }
    }
}

// ── UnauthorizedHandler ─────────────────────────────────────────────

/// Clears the stored credentials whenever the server answers 401.
///
/// The clear runs on a spawned task so the response is handed back to the
/// caller immediately. Store failures are logged and otherwise dropped.
#[derive(Clone)]
pub struct UnauthorizedHandler {
    store: Arc<dyn CredentialStore>,
}

impl UnauthorizedHandler {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for UnauthorizedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedHandler").finish_non_exhaustive()
    }
}

impl Middleware for UnauthorizedHandler {
    fn on_response(&self, response: &reqwest::Response) {
        if response.status() != StatusCode::UNAUTHORIZED {
            return;
        }

        debug!(url = %response.url(), "401 received, clearing stored session");
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.clear().await {
                warn!(error = %e, "failed to clear credentials after 401");
            }
        });
    }
}
