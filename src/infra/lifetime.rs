//! Cancellation scopes tying in-flight requests to the lifetime of the
//! component that issued them.

use std::future::Future;

use tokio_util::sync::{CancellationToken, DropGuard};

/// Raised when the owning scope ended before the work finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("owning scope ended before the operation completed")]
pub struct Cancelled;

/// A cancellable scope. Clones share the same token; children end with their
/// parent but can also be ended on their own.
#[derive(Debug, Clone, Default)]
pub struct Lifetime {
    token: CancellationToken,
}

impl Lifetime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// End the scope. Pending and future `guard` calls resolve to
    /// [`Cancelled`].
    pub fn end(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Ends the scope when the returned guard is dropped.
    #[must_use]
    pub fn end_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Run `fut` unless the scope ends first.
    pub async fn guard<F>(&self, fut: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        if self.is_ended() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Cancelled),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn guard_passes_output_through() {
        let scope = Lifetime::new();
        assert_eq!(scope.guard(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn ended_scope_short_circuits() {
        let scope = Lifetime::new();
        scope.end();
        assert_eq!(scope.guard(async { 7 }).await, Err(Cancelled));
    }

    #[tokio::test]
    async fn ending_parent_cancels_pending_child_work() {
        let parent = Lifetime::new();
        let child = parent.child();
        let pending = tokio::spawn(async move {
            child
                .guard(tokio::time::sleep(Duration::from_secs(30)))
                .await
        });
        parent.end();
        assert_eq!(pending.await.expect("join"), Err(Cancelled));
    }

    #[test]
    fn drop_guard_ends_scope() {
        let scope = Lifetime::new();
        {
            let _guard = scope.end_on_drop();
            assert!(!scope.is_ended());
        }
        assert!(scope.is_ended());
    }
}
