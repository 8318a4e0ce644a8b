//! Catalog construction: one analysis pass to one catalog.

use std::sync::Arc;

use serde::Deserialize;

use triage_engine::{
    AnalysisEngine, EngineError, FixContext, IndexId, IndexService, PassGate, ProjectContext,
    SourceUnit,
};
use triage_types::{LineIndex, Severity};

use crate::catalog::Problems;
use crate::error::CatalogError;
use crate::problem::Problem;

/// Supporting indexes refreshed ahead of a pass.
const SUPPORTING_INDEXES: [IndexId; 2] = [IndexId::SYMBOL_STUBS, IndexId::TODO_MARKERS];

/// Collection-time options. Defaults match the standard behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Refresh supporting indexes before the pass (best-effort).
    pub refresh_indexes: bool,
    /// Drop findings below this severity instead of materializing them.
    pub severity_floor: Option<Severity>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            refresh_indexes: true,
            severity_floor: None,
        }
    }
}

/// Runs analysis passes and materializes catalogs.
///
/// A newer `collect_from` call supersedes the previous in-flight one
/// through the shared pass gate; the superseded call fails with
/// [`CatalogError::Canceled`].
pub struct CatalogBuilder {
    engine: Arc<dyn AnalysisEngine>,
    indexes: Arc<dyn IndexService>,
    gate: PassGate,
    config: BuilderConfig,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new(engine: Arc<dyn AnalysisEngine>, indexes: Arc<dyn IndexService>) -> Self {
        Self {
            engine,
            indexes,
            gate: PassGate::new(),
            config: BuilderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one fresh analysis pass over `unit` and materialize the catalog.
    ///
    /// Blocks the caller until the pass completes, fails, or is canceled.
    /// The progress scope is released on every exit path.
    pub async fn collect_from(
        &self,
        project: &ProjectContext,
        unit: &SourceUnit,
    ) -> Result<Problems, CatalogError> {
        self.refresh_supporting_indexes(project);

        let document = project
            .document(unit)
            .ok_or(CatalogError::FatalContext("no document for source unit"))?;
        let version = document.version();

        let scope = self.gate.begin();
        self.engine.invalidate(unit);
        tracing::debug!(unit = %unit, "running fresh analysis pass");
        let raw = self
            .engine
            .run_fresh_pass(project, unit, &scope)
            .await
            .map_err(|e| match e {
                EngineError::Canceled => CatalogError::Canceled,
                other => CatalogError::Engine(other),
            })?;
        // The engine may have missed a late supersede; never hand out a
        // catalog for a pass that lost the race.
        if scope.is_canceled() {
            return Err(CatalogError::Canceled);
        }

        let lines = LineIndex::new(&document.text());
        let ctx = FixContext::new(project, unit, Arc::clone(&document));
        let mut items = Vec::new();
        for diagnostic in &raw {
            if let Some(floor) = self.config.severity_floor {
                if !diagnostic.severity().is_at_least(floor) {
                    continue;
                }
            }
            if let Some(problem) = Problem::from_raw(items.len(), diagnostic, &lines, &ctx) {
                items.push(problem);
            }
        }
        tracing::info!(unit = %unit, problems = items.len(), "catalog built");

        Ok(Problems::new(items, &document, version))
    }

    /// Best-effort: a failed refresh is logged and the pass proceeds with a
    /// possibly incomplete catalog. Skipped entirely while the project is
    /// not ready, since forcing a refresh there can deadlock.
    fn refresh_supporting_indexes(&self, project: &ProjectContext) {
        if !self.config.refresh_indexes {
            return;
        }
        if !project.is_ready() {
            tracing::debug!("project not ready; skipping index refresh");
            return;
        }
        for index in SUPPORTING_INDEXES {
            if let Err(e) = self.indexes.ensure_up_to_date(index, project) {
                tracing::warn!(index = %index, "index refresh failed: {e}");
            }
        }
    }
}
