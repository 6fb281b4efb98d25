//! Cancellation for external calls

use crate::managed::error::ManagedError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Per-reconcile context handed to every lifecycle operation
#[derive(Debug, Clone, Default)]
pub struct ReconcileContext {
    token: CancellationToken,
}

impl ReconcileContext {
    /// Create a context cancelled by `token`
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Run `fut` unless the context is cancelled first.
    ///
    /// A cancelled context drops the in-flight future, so the request is
    /// abandoned rather than awaited, and reports [`ManagedError::Cancelled`].
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ManagedError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ManagedError::Cancelled),
            out = fut => Ok(out),
        }
    }
}
