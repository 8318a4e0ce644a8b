//! Project and document model at the engine boundary.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use triage_types::Span;

/// Handle identifying one source unit (file) within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceUnit {
    path: PathBuf,
}

impl SourceUnit {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Caller-supplied project state.
///
/// `ready` is false while supporting indexes are still building; index
/// refresh is skipped in that state rather than blocked on, since forcing
/// it there can deadlock against the index build itself.
#[derive(Debug)]
pub struct ProjectContext {
    ready: AtomicBool,
    documents: RwLock<HashMap<PathBuf, Arc<SourceDocument>>>,
}

impl ProjectContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Whether supporting indexes are current enough to consult.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Register (or replace) the live document for a unit.
    pub fn insert_document(
        &self,
        unit: &SourceUnit,
        text: impl Into<String>,
    ) -> Arc<SourceDocument> {
        let document = Arc::new(SourceDocument::new(text));
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit.path.clone(), Arc::clone(&document));
        document
    }

    /// The live document for a unit, if one is registered.
    #[must_use]
    pub fn document(&self, unit: &SourceUnit) -> Option<Arc<SourceDocument>> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&unit.path)
            .cloned()
    }
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One live source document: text plus a monotonically increasing version.
///
/// Every committed text mutation bumps the version; catalogs stamp the
/// version they were built against and turn stale as soon as it moves.
#[derive(Debug)]
pub struct SourceDocument {
    text: RwLock<String>,
    version: AtomicU64,
    write_gate: Mutex<()>,
}

impl SourceDocument {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            version: AtomicU64::new(0),
            write_gate: Mutex::new(()),
        }
    }

    /// Snapshot of the current text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Replace `span` with `replacement`. The span clamps to the current
    /// text length; the version bumps.
    pub fn replace(&self, span: Span, replacement: &str) {
        let mut text = self.text.write().unwrap_or_else(PoisonError::into_inner);
        let start = span.start().min(text.len());
        let end = span.end().min(text.len());
        text.replace_range(start..end, replacement);
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Open the exclusive mutation transaction for this document.
    ///
    /// Blocks until any other live transaction has finished. The returned
    /// guard snapshots the current text: [`WriteTransaction::commit`] keeps
    /// the mutations made while it was open, dropping it uncommitted rolls
    /// the text back.
    #[must_use]
    pub fn begin_exclusive(&self) -> WriteTransaction<'_> {
        let gate = self
            .write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.text();
        tracing::trace!("write transaction opened");
        WriteTransaction {
            document: self,
            _gate: gate,
            snapshot,
            committed: false,
        }
    }

    fn restore(&self, snapshot: String) {
        let mut text = self.text.write().unwrap_or_else(PoisonError::into_inner);
        *text = snapshot;
        self.version.fetch_add(1, Ordering::AcqRel);
    }
}

/// Scoped exclusive mutation transaction over one document.
///
/// Holds the document's write gate for its lifetime, so no two fix
/// executions can mutate concurrently.
pub struct WriteTransaction<'a> {
    document: &'a SourceDocument,
    _gate: MutexGuard<'a, ()>,
    snapshot: String,
    committed: bool,
}

impl WriteTransaction<'_> {
    /// Keep the mutations made while the transaction was open.
    pub fn commit(mut self) {
        self.committed = true;
        tracing::debug!(
            version = self.document.version(),
            "write transaction committed"
        );
    }
}

impl Drop for WriteTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::warn!("write transaction rolled back");
            self.document.restore(std::mem::take(&mut self.snapshot));
        }
    }
}

/// Everything a remediation action sees when probed or invoked.
pub struct FixContext<'a> {
    project: &'a ProjectContext,
    unit: &'a SourceUnit,
    document: Arc<SourceDocument>,
}

impl<'a> FixContext<'a> {
    #[must_use]
    pub fn new(
        project: &'a ProjectContext,
        unit: &'a SourceUnit,
        document: Arc<SourceDocument>,
    ) -> Self {
        Self {
            project,
            unit,
            document,
        }
    }

    #[must_use]
    pub fn project(&self) -> &ProjectContext {
        self.project
    }

    #[must_use]
    pub fn unit(&self) -> &SourceUnit {
        self.unit
    }

    #[must_use]
    pub fn document(&self) -> &Arc<SourceDocument> {
        &self.document
    }
}
