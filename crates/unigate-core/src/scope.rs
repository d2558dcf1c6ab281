// ── Screen-scoped task ownership ──
//
// A `ControllerScope` owns every task a screen starts. Dropping the scope
// (the screen going away) abandons in-flight work at its next suspension
// point; partially applied state is left as it is.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Debug, Default)]
pub struct ControllerScope {
    cancel: CancellationToken,
}

impl ControllerScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A nested scope cancelled together with this one.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
        }
    }

    /// Run `fut` on the runtime until it completes or the scope ends.
    ///
    /// The handle yields `None` when the work was abandoned.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    trace!("scoped task abandoned");
                    None
                }
                out = fut => Some(out),
            }
        })
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ControllerScope {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn completed_work_yields_its_output() {
        let scope = ControllerScope::new();
        let out = scope.spawn(async { 7 }).await.unwrap();
        assert_eq!(out, Some(7));
    }

    #[tokio::test]
    async fn dropping_the_scope_abandons_pending_work() {
        let scope = ControllerScope::new();
        let handle = scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            1
        });
        drop(scope);
        assert_eq!(handle.await.unwrap(), None);
    }

    #[tokio::test]
    async fn child_scopes_follow_the_parent() {
        let parent = ControllerScope::new();
        let child = parent.child();
        parent.cancel();
        assert!(child.is_cancelled());
    }
}
