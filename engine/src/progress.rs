//! Progress and cancellation scopes for analysis passes.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use crate::error::EngineError;

/// Issues one [`ProgressScope`] per analysis pass and cancels the previous
/// in-flight scope when a new one begins.
#[derive(Debug, Default)]
pub struct PassGate {
    current: Mutex<Weak<ScopeShared>>,
}

#[derive(Debug)]
struct ScopeShared {
    canceled: watch::Sender<bool>,
}

impl PassGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope for a fresh pass, superseding any scope still in
    /// flight.
    #[must_use]
    pub fn begin(&self) -> ProgressScope {
        let shared = Arc::new(ScopeShared {
            canceled: watch::Sender::new(false),
        });
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.upgrade() {
            tracing::debug!("superseding in-flight analysis pass");
            let _ = previous.canceled.send(true);
        }
        *current = Arc::downgrade(&shared);
        ProgressScope { shared }
    }
}

/// Scoped token tracking one in-flight analysis pass.
///
/// Released on drop, on every exit path. Engines poll [`is_canceled`] or
/// await [`canceled`] at their own checkpoints.
///
/// [`is_canceled`]: ProgressScope::is_canceled
/// [`canceled`]: ProgressScope::canceled
#[derive(Debug)]
pub struct ProgressScope {
    shared: Arc<ScopeShared>,
}

impl ProgressScope {
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        *self.shared.canceled.borrow()
    }

    /// Resolve once the scope is canceled. Never resolves for a scope that
    /// stays live.
    pub async fn canceled(&self) {
        let mut rx = self.shared.canceled.subscribe();
        // The sender lives in `shared`, so wait_for can only fail if this
        // scope is dropped while awaiting, which the borrow rules prevent.
        let _ = rx.wait_for(|canceled| *canceled).await;
    }

    /// Fail fast if the scope has been superseded.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_canceled() {
            Err(EngineError::Canceled)
        } else {
            Ok(())
        }
    }
}

impl Drop for ProgressScope {
    fn drop(&mut self) {
        tracing::trace!("analysis progress scope released");
    }
}
