// ── Observable view state ──
//
// Every controller publishes through a `StateCell`: a cloneable handle on
// a `watch` channel. Subscribers always see the latest value; intermediate
// values may be skipped.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::CoreError;

/// Why a screen load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// User-facing text, from [`CoreError::user_message`].
    pub message: String,
    /// The stored session is gone; the host should route to login.
    pub session_ended: bool,
}

impl From<&CoreError> for LoadError {
    fn from(err: &CoreError) -> Self {
        Self {
            message: err.user_message(),
            session_ended: err.is_session_ended(),
        }
    }
}

impl From<CoreError> for LoadError {
    fn from(err: CoreError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lifecycle of a single screen load.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(LoadError),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// `Loaded` on success, `Failed` with the user-facing message otherwise.
    pub fn from_result(result: Result<T, CoreError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(e) => Self::Failed(e.into()),
        }
    }
}

/// Shared, observable holder of a controller's state.
#[derive(Debug)]
pub struct StateCell<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> StateCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: S) {
        self.tx.send_replace(value);
    }

    /// Mutate in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Mutate only if `f` returns `true`; subscribers are notified only then.
    pub fn update_if(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Stream of states, starting with the current one.
    pub fn stream(&self) -> WatchStream<S> {
        WatchStream::new(self.tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_keep_whether_the_session_ended() {
        let expired = ViewState::<u32>::from_result(Err(CoreError::SessionExpired {
            message: "401".into(),
        }));
        assert!(expired.error().is_some_and(|e| e.session_ended));

        let down = ViewState::<u32>::from_result(Err(CoreError::Timeout));
        let err = down.error().cloned();
        assert_eq!(
            err,
            Some(LoadError {
                message: "The server took too long to respond.".into(),
                session_ended: false,
            })
        );
    }

    #[test]
    fn conditional_update_reports_whether_it_applied() {
        let cell = StateCell::new(0_u32);
        assert!(cell.update_if(|n| {
            *n += 1;
            true
        }));
        assert!(!cell.update_if(|_| false));
        assert_eq!(cell.get(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let cell = StateCell::new(ViewState::<u32>::Idle);
        let mut rx = cell.subscribe();

        cell.set(ViewState::Loading);
        rx.changed().await.ok();
        assert!(rx.borrow().is_loading());

        cell.set(ViewState::Loaded(3));
        rx.changed().await.ok();
        assert_eq!(rx.borrow().loaded(), Some(&3));
    }
}
