// Token cache
//
// A shared, atomically swapped cell mirroring the credential store, so
// request signing can read the current token without awaiting anything.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use futures_util::StreamExt;
use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::credentials::{CredentialStore, SessionToken};

/// Read-mostly mirror of a [`CredentialStore`].
///
/// Cheaply cloneable; all clones share one cell. The cell has exactly one
/// writer (the mirror set up by [`mirror`](Self::mirror)) and any
/// number of readers. It lags the store by at most one propagation hop.
#[derive(Clone, Default)]
pub struct TokenCache {
    inner: Arc<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    cell: ArcSwapOption<SessionToken>,
    updated: Notify,
}

impl TokenCache {
    /// An empty cache with no writer attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache kept in sync with `store` for the rest of the process.
    ///
    /// The store's current value is in the cell before this returns, so a
    /// request signed right away carries the stored token. Later changes
    /// are applied by a mirror task on the current tokio runtime; it is
    /// never cancelled and ends only if the store's stream ends.
    pub async fn mirror(store: Arc<dyn CredentialStore>) -> Self {
        let cache = Self::new();
        let mut stream = store.observe();
        if let Some(initial) = stream.next().await {
            cache.replace(initial);
        }

        let writer = cache.clone();
        tokio::spawn(async move {
            let _store = store;
            while let Some(value) = stream.next().await {
                trace!(present = value.is_some(), "token cache updated");
                writer.replace(value);
            }
            debug!("credential stream ended; token cache frozen");
        });

        cache
    }

    /// The last token observed from the store. Never blocks.
    pub fn current(&self) -> Option<SessionToken> {
        self.inner.cell.load_full().map(|token| (*token).clone())
    }

    /// Wait until the cell holds `expected`, up to `timeout`.
    ///
    /// Returns `false` if the deadline passed first.
    pub async fn settled(&self, expected: Option<&SessionToken>, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.inner.updated.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if self.current().as_ref() == expected {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }

    fn replace(&self, value: Option<SessionToken>) {
        self.inner.cell.store(value.map(Arc::new));
        self.inner.updated.notify_waiters();
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("present", &self.inner.cell.load().is_some())
            .finish()
    }
}
