//! Best-effort supporting-index refresh.

use std::fmt;

use crate::error::EngineError;
use crate::project::ProjectContext;

/// Identifier of a supporting index maintained by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexId(&'static str);

impl IndexId {
    /// Symbol stubs consulted while resolving references.
    pub const SYMBOL_STUBS: Self = Self("symbol-stubs");
    /// Todo-marker index.
    pub const TODO_MARKERS: Self = Self("todo-markers");

    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Keeps supporting indexes current ahead of an analysis pass.
///
/// Strictly best-effort. Callers skip the refresh entirely while the
/// project is not ready: forcing it there can deadlock against the index
/// build itself.
pub trait IndexService: Send + Sync {
    fn ensure_up_to_date(
        &self,
        index: IndexId,
        project: &ProjectContext,
    ) -> Result<(), EngineError>;
}
