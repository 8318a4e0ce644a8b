//! Quick-fix descriptors.

use std::sync::{Arc, Weak};

use triage_engine::{ActionHandle, CandidateFix, FixContext};
use triage_types::{FixId, Span};

use crate::error::CatalogError;

/// One remediation action bound to a span of source.
///
/// A value snapshot from one catalog generation: the id is only meaningful
/// against the catalog that produced it, and the action is held weakly on
/// the engine's behalf.
#[derive(Debug, Clone)]
pub struct QuickFixDescriptor {
    id: FixId,
    description: String,
    span: Span,
    action: Weak<dyn ActionHandle>,
}

impl QuickFixDescriptor {
    /// Derive a descriptor from an engine candidate.
    ///
    /// The label falls back through the engine's display name, the action's
    /// own text, its family name, and finally the concrete action type's
    /// name, so the description is never empty.
    pub(crate) fn from_candidate(id: FixId, candidate: &CandidateFix) -> Self {
        let action = candidate.upgrade();
        let description = candidate
            .display_name()
            .map(str::to_string)
            .filter(|label| !label.trim().is_empty())
            .or_else(|| pick_label(action.as_deref(), |action| action.display_name()))
            .or_else(|| pick_label(action.as_deref(), |action| action.text()))
            .or_else(|| pick_label(action.as_deref(), |action| action.family_name()))
            .unwrap_or_else(|| short_type_name(candidate.action_kind()).to_string());

        Self {
            id,
            description,
            span: candidate.span(),
            action: candidate.action(),
        }
    }

    #[must_use]
    pub fn id(&self) -> FixId {
        self.id
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The span this fix pertains to; may differ from the owning problem's
    /// own range.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The live action, unless the engine has dropped it.
    #[must_use]
    pub fn action(&self) -> Option<Arc<dyn ActionHandle>> {
        self.action.upgrade()
    }

    /// Whether the underlying action is the capability type `A`.
    #[must_use]
    pub fn is_kind<A: ActionHandle>(&self) -> bool {
        self.action()
            .is_some_and(|action| action.as_any().is::<A>())
    }

    /// Whether `other` denotes the same remediation across catalog
    /// generations.
    ///
    /// Offsets drift between passes, so the signature is the derived
    /// description alone. An engine that reuses one label for distinct
    /// actions will alias here; that matches the looseness consumers of
    /// the original matching already tolerated.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self.description == other.description
    }

    /// Apply this fix against the live source.
    ///
    /// Actions that require write access run inside the document's
    /// exclusive write transaction, and the mutations commit before the
    /// transaction scope is released. Other actions invoke directly. This
    /// is the subsystem's only side-effecting operation.
    pub fn execute(&self, ctx: &FixContext<'_>) -> Result<(), CatalogError> {
        let Some(action) = self.action.upgrade() else {
            return Err(CatalogError::FixUnavailable(self.id.to_string()));
        };

        if action.requires_write_access() {
            let txn = ctx.document().begin_exclusive();
            action.invoke(ctx)?;
            txn.commit();
        } else {
            action.invoke(ctx)?;
        }
        Ok(())
    }
}

fn pick_label(
    action: Option<&dyn ActionHandle>,
    source: impl Fn(&dyn ActionHandle) -> Option<String>,
) -> Option<String> {
    action
        .and_then(source)
        .filter(|label| !label.trim().is_empty())
}

fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
