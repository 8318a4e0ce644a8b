//! Fix execution orchestration.

use std::sync::Arc;

use triage_engine::FixContext;
use triage_types::truncate_with_ellipsis;

use crate::error::CatalogError;
use crate::quickfix::QuickFixDescriptor;

/// Events emitted around fix execution.
#[derive(Debug)]
pub enum FixEvent<'a> {
    Started {
        fix: &'a QuickFixDescriptor,
    },
    Applied {
        fix: &'a QuickFixDescriptor,
    },
    Failed {
        fix: &'a QuickFixDescriptor,
        error: &'a CatalogError,
    },
}

/// Receives [`FixEvent`]s as fixes run.
pub trait FixObserver: Send + Sync {
    fn on_event(&self, event: &FixEvent<'_>);
}

/// Applies chosen fixes against the live source.
///
/// Pure orchestration around [`QuickFixDescriptor::execute`]: no retry. A
/// failed invocation surfaces as-is; the caller decides whether to rebuild
/// the catalog and retry against a resolved-equivalent descriptor.
#[derive(Default)]
pub struct FixExecutor {
    observer: Option<Arc<dyn FixObserver>>,
}

impl FixExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_observer(observer: Arc<dyn FixObserver>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    /// Execute `fix` in `ctx`.
    ///
    /// A mutating fix that commits leaves every catalog built from the old
    /// document state stale.
    pub fn execute(
        &self,
        fix: &QuickFixDescriptor,
        ctx: &FixContext<'_>,
    ) -> Result<(), CatalogError> {
        tracing::debug!(
            id = %fix.id(),
            fix = %truncate_with_ellipsis(fix.description(), 60),
            "executing fix"
        );
        self.notify(&FixEvent::Started { fix });

        match fix.execute(ctx) {
            Ok(()) => {
                tracing::debug!(id = %fix.id(), "fix applied");
                self.notify(&FixEvent::Applied { fix });
                Ok(())
            }
            Err(error) => {
                tracing::warn!(id = %fix.id(), "fix failed: {error}");
                self.notify(&FixEvent::Failed {
                    fix,
                    error: &error,
                });
                Err(error)
            }
        }
    }

    fn notify(&self, event: &FixEvent<'_>) {
        if let Some(observer) = &self.observer {
            observer.on_event(event);
        }
    }
}
