//! The source-analysis engine contract.

use async_trait::async_trait;

use triage_types::{Severity, Span};

use crate::action::CandidateFix;
use crate::error::EngineError;
use crate::progress::ProgressScope;
use crate::project::{ProjectContext, SourceUnit};

/// One raw finding from an analysis pass, before materialization.
///
/// Engine-internal noise carries an empty message; the catalog drops those
/// during materialization.
#[derive(Debug, Clone)]
pub struct RawDiagnostic {
    severity: Severity,
    message: String,
    span: Span,
    candidate_fixes: Vec<CandidateFix>,
}

impl RawDiagnostic {
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity,
            message: message.into(),
            span,
            candidate_fixes: Vec::new(),
        }
    }

    /// Append a candidate fix; order is discovery order.
    #[must_use]
    pub fn with_fix(mut self, fix: CandidateFix) -> Self {
        self.candidate_fixes.push(fix);
        self
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn candidate_fixes(&self) -> &[CandidateFix] {
        &self.candidate_fixes
    }
}

/// The source-analysis engine, specified only at this boundary.
///
/// Implementations must observe `scope`: a superseded pass should stop at
/// its next checkpoint and return [`EngineError::Canceled`].
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Drop any cached results for `unit` so the next pass is fresh.
    fn invalidate(&self, unit: &SourceUnit);

    /// Run one full analysis pass over `unit`, returning findings in
    /// discovery order.
    async fn run_fresh_pass(
        &self,
        project: &ProjectContext,
        unit: &SourceUnit,
        scope: &ProgressScope,
    ) -> Result<Vec<RawDiagnostic>, EngineError>;
}
