//! Remediation action capabilities.

use std::any::Any;
use std::sync::{Arc, Weak};

use triage_types::Span;

use crate::error::EngineError;
use crate::project::FixContext;

/// Capability handle for one remediation action, owned by the engine.
///
/// The catalog holds these weakly: a descriptor can outlive the engine's
/// interest in its action, and execution on a dropped handle reports the
/// fix as unavailable rather than resurrecting it.
pub trait ActionHandle: Send + Sync + 'static {
    /// Whether the action still applies in `ctx`.
    fn is_available(&self, ctx: &FixContext<'_>) -> bool;

    /// Whether invocation mutates the source and therefore needs the
    /// document's exclusive write transaction.
    fn requires_write_access(&self) -> bool;

    /// Perform the action against the live source.
    fn invoke(&self, ctx: &FixContext<'_>) -> Result<(), EngineError>;

    /// The engine's display label for this action, if any.
    fn display_name(&self) -> Option<String> {
        None
    }

    /// The action's own text label, if any.
    fn text(&self) -> Option<String> {
        None
    }

    /// Label shared by a family of related actions, if any.
    fn family_name(&self) -> Option<String> {
        None
    }

    /// Downcast seam for capability filtering.
    fn as_any(&self) -> &dyn Any;
}

/// One engine-proposed remediation for a raw diagnostic.
///
/// Holds the action weakly; the engine keeps ownership of the capability.
#[derive(Debug, Clone)]
pub struct CandidateFix {
    action: Weak<dyn ActionHandle>,
    display_name: Option<String>,
    span: Span,
    action_kind: &'static str,
}

impl CandidateFix {
    /// Wrap an engine-owned action.
    ///
    /// The concrete action type's name is captured here; it backs the final
    /// step of the descriptor label fallback chain.
    #[must_use]
    pub fn new<A: ActionHandle>(action: &Arc<A>, span: Span) -> Self {
        let weak_a: Weak<A> = Arc::downgrade(action);
        let weak: Weak<dyn ActionHandle> = weak_a;
        Self {
            action: weak,
            display_name: None,
            span,
            action_kind: std::any::type_name::<A>(),
        }
    }

    /// Attach the engine's display label for this proposal.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn action(&self) -> Weak<dyn ActionHandle> {
        Weak::clone(&self.action)
    }

    /// The live action, unless the engine has dropped it.
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<dyn ActionHandle>> {
        self.action.upgrade()
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Fully qualified type name of the concrete action.
    #[must_use]
    pub fn action_kind(&self) -> &'static str {
        self.action_kind
    }
}
