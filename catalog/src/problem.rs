//! One diagnostic plus its remediation options.

use std::fmt;
use std::str::FromStr;

use triage_engine::{FixContext, RawDiagnostic};
use triage_types::{FixId, FixRecord, LineIndex, ProblemRecord, Severity, Span};

use crate::error::CatalogError;
use crate::quickfix::QuickFixDescriptor;

/// One diagnostic from one analysis pass: position, severity, message, and
/// the fixes that were applicable when the catalog was built.
///
/// Immutable after construction. The id equals the problem's position in
/// the owning catalog and is not stable across generations.
#[derive(Debug, Clone)]
pub struct Problem {
    id: usize,
    line: u32,
    col: u32,
    span: Span,
    severity: Severity,
    description: String,
    fixes: Vec<QuickFixDescriptor>,
}

impl Problem {
    /// Materialize a problem from a raw finding.
    ///
    /// Returns `None` for findings with an empty message (engine-internal
    /// noise). Candidate fixes that no longer report themselves applicable
    /// are dropped silently; the survivors get contiguous sub-ids in
    /// discovery order.
    pub(crate) fn from_raw(
        id: usize,
        raw: &RawDiagnostic,
        lines: &LineIndex,
        ctx: &FixContext<'_>,
    ) -> Option<Self> {
        if raw.message().trim().is_empty() {
            return None;
        }

        let position = lines.line_col(raw.span().start());

        let mut fixes = Vec::new();
        for candidate in raw.candidate_fixes() {
            let available = candidate
                .upgrade()
                .is_some_and(|action| action.is_available(ctx));
            if !available {
                tracing::debug!(
                    kind = candidate.action_kind(),
                    "dropping unavailable candidate fix"
                );
                continue;
            }
            let fix_id = FixId::new(id, fixes.len());
            fixes.push(QuickFixDescriptor::from_candidate(fix_id, candidate));
        }

        Some(Self {
            id,
            line: position.line,
            col: position.col,
            span: raw.span(),
            severity: raw.severity(),
            description: raw.message().to_string(),
            fixes,
        })
    }

    /// Position in the owning catalog's sequence.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// 1-based line of the problem's start offset.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the problem's start offset.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The fixes available for this problem, in discovery order.
    #[must_use]
    pub fn fixes(&self) -> &[QuickFixDescriptor] {
        &self.fixes
    }

    /// Whether `offset` falls inside the problem's range.
    #[must_use]
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.span.contains(offset)
    }

    /// Whether the problem sits on the given 1-based line.
    #[must_use]
    pub fn is_on_line(&self, line: u32) -> bool {
        self.line == line
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }

    /// Look up one of this problem's fixes by its wire id.
    pub fn locate_fix(&self, fix_id: &str) -> Result<&QuickFixDescriptor, CatalogError> {
        let parsed =
            FixId::from_str(fix_id).map_err(|_| CatalogError::InvalidId(fix_id.to_string()))?;
        self.fix_at(parsed.fix())
            .ok_or_else(|| CatalogError::InvalidId(fix_id.to_string()))
    }

    pub(crate) fn fix_at(&self, index: usize) -> Option<&QuickFixDescriptor> {
        self.fixes.get(index)
    }

    pub(crate) fn to_record(&self) -> ProblemRecord {
        ProblemRecord {
            id: self.id,
            description: self.description.clone(),
            line: self.line,
            col: self.col,
            start_offset: self.span.start(),
            end_offset: self.span.end(),
            severity: self.severity,
            fixes: self
                .fixes
                .iter()
                .map(|fix| FixRecord {
                    id: fix.id().to_string(),
                    description: fix.description().to_string(),
                    start: fix.span().start(),
                    end: fix.span().end(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}@{}:{}][{}]{}",
            self.id,
            self.line,
            self.col,
            self.severity.wire_name(),
            self.description
        )
    }
}
