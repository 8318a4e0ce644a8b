//! The problem catalog: one generation of analysis results.

use std::str::FromStr;
use std::sync::{Arc, Weak};

use triage_engine::{ActionHandle, SourceDocument};
use triage_types::{FixId, ProblemRecord, Severity};

use crate::error::CatalogError;
use crate::problem::Problem;
use crate::quickfix::QuickFixDescriptor;

/// Lifecycle state of one catalog generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    /// The source is unchanged since the pass; ids are fresh.
    Ready,
    /// The source moved on. Ids may no longer line up, but descriptors
    /// remain valid inputs to identity resolution against a newer catalog.
    Stale,
}

/// Which document state a catalog was computed from.
#[derive(Debug, Clone)]
struct SourceStamp {
    document: Weak<SourceDocument>,
    version: u64,
}

/// An ordered, immutable collection of [`Problem`]s from one analysis pass.
///
/// Insertion order is discovery order. Problem ids and fix sub-ids are only
/// meaningful within the generation that produced them; once the source
/// mutates, resolve held descriptors against a rebuilt catalog with
/// [`locate_equivalent`](Self::locate_equivalent).
#[derive(Debug, Clone)]
pub struct Problems {
    items: Vec<Problem>,
    stamp: SourceStamp,
}

impl Problems {
    pub(crate) fn new(items: Vec<Problem>, document: &Arc<SourceDocument>, version: u64) -> Self {
        Self {
            items,
            stamp: SourceStamp {
                document: Arc::downgrade(document),
                version,
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.items.iter()
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.items
    }

    /// Whether the source this catalog was computed from is unchanged.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        match self.stamp.document.upgrade() {
            Some(document) if document.version() == self.stamp.version => CatalogState::Ready,
            _ => CatalogState::Stale,
        }
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.state() == CatalogState::Stale
    }

    /// A new catalog keeping, in original relative order, exactly the
    /// problems satisfying `predicate`. The receiver is untouched.
    #[must_use]
    pub fn filter<P: FnMut(&Problem) -> bool>(&self, mut predicate: P) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|problem| predicate(problem))
                .cloned()
                .collect(),
            stamp: self.stamp.clone(),
        }
    }

    /// Sugar for [`filter`](Self::filter): keeps problems with at least one
    /// fix whose action is the capability type `A`.
    #[must_use]
    pub fn filter_by_fix_kind<A: ActionHandle>(&self) -> Self {
        self.filter(|problem| problem.fixes().iter().any(QuickFixDescriptor::is_kind::<A>))
    }

    /// Resolve a wire fix id against this generation.
    pub fn locate_fix(&self, fix_id: &str) -> Result<&QuickFixDescriptor, CatalogError> {
        if self.is_stale() {
            tracing::debug!(fix_id, "fix lookup against a stale catalog");
        }
        let parsed =
            FixId::from_str(fix_id).map_err(|_| CatalogError::InvalidId(fix_id.to_string()))?;
        let problem = self
            .items
            .get(parsed.problem())
            .ok_or_else(|| CatalogError::InvalidId(fix_id.to_string()))?;
        problem
            .fix_at(parsed.fix())
            .ok_or_else(|| CatalogError::InvalidId(fix_id.to_string()))
    }

    /// Cross-generation identity resolution.
    ///
    /// Offsets and ids drift between passes (source edits, or the very fix
    /// being resolved having shifted the text), so a descriptor held from
    /// an older catalog cannot be looked up by id. This scans every fix in
    /// the current catalog for one equivalent to `old` and returns it.
    pub fn locate_equivalent(
        &self,
        old: &QuickFixDescriptor,
    ) -> Result<&QuickFixDescriptor, CatalogError> {
        self.items
            .iter()
            .flat_map(|problem| problem.fixes().iter())
            .find(|fix| fix.is_equivalent_to(old))
            .ok_or_else(|| CatalogError::NotFound(old.description().to_string()))
    }

    /// Number of error-level problems.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity(Severity::Error)
    }

    /// Number of warning-level problems.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(Severity::Warning)
    }

    fn count_by_severity(&self, severity: Severity) -> usize {
        self.items
            .iter()
            .filter(|problem| problem.severity() == severity)
            .count()
    }

    /// Flatten the catalog into wire records. The action handles stay
    /// behind; only ids, labels, and spans cross the boundary.
    #[must_use]
    pub fn to_records(&self) -> Vec<ProblemRecord> {
        self.items.iter().map(Problem::to_record).collect()
    }
}

impl<'a> IntoIterator for &'a Problems {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogState, Problems};
    use crate::error::CatalogError;
    use crate::problem::Problem;
    use std::any::Any;
    use std::sync::Arc;
    use triage_engine::{
        ActionHandle, CandidateFix, EngineError, FixContext, ProjectContext, RawDiagnostic,
        SourceDocument, SourceUnit,
    };
    use triage_types::{LineIndex, Severity, Span};

    struct ImportAction;

    impl ActionHandle for ImportAction {
        fn is_available(&self, _ctx: &FixContext<'_>) -> bool {
            true
        }

        fn requires_write_access(&self) -> bool {
            true
        }

        fn invoke(&self, _ctx: &FixContext<'_>) -> Result<(), EngineError> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct RenameAction;

    impl ActionHandle for RenameAction {
        fn is_available(&self, _ctx: &FixContext<'_>) -> bool {
            true
        }

        fn requires_write_access(&self) -> bool {
            true
        }

        fn invoke(&self, _ctx: &FixContext<'_>) -> Result<(), EngineError> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Holds the engine-side actions alive for the catalog under test.
    struct Fixture {
        project: ProjectContext,
        unit: SourceUnit,
        document: Arc<SourceDocument>,
        import: Arc<ImportAction>,
        rename: Arc<RenameAction>,
    }

    impl Fixture {
        fn new() -> Self {
            let project = ProjectContext::new();
            let unit = SourceUnit::new("src/lib.rs");
            let document = project.insert_document(&unit, "alpha\nbeta\ngamma\n");
            Self {
                project,
                unit,
                document,
                import: Arc::new(ImportAction),
                rename: Arc::new(RenameAction),
            }
        }

        /// Three problems: #0 error with an import fix, #1 warning with a
        /// rename fix, #2 error with no fixes.
        fn catalog(&self) -> Problems {
            let raws = vec![
                RawDiagnostic::new(Severity::Error, "cannot resolve 'alpha'", Span::new(0, 5))
                    .with_fix(
                        CandidateFix::new(&self.import, Span::new(0, 5))
                            .with_display_name("Import 'alpha'"),
                    ),
                RawDiagnostic::new(Severity::Warning, "odd name 'beta'", Span::new(6, 10))
                    .with_fix(
                        CandidateFix::new(&self.rename, Span::new(6, 10))
                            .with_display_name("Rename 'beta'"),
                    ),
                RawDiagnostic::new(Severity::Error, "unresolved 'gamma'", Span::new(11, 16)),
            ];

            let lines = LineIndex::new(&self.document.text());
            let ctx = FixContext::new(&self.project, &self.unit, Arc::clone(&self.document));
            let version = self.document.version();
            let mut items = Vec::new();
            for raw in &raws {
                if let Some(problem) = Problem::from_raw(items.len(), raw, &lines, &ctx) {
                    items.push(problem);
                }
            }
            Problems::new(items, &self.document, version)
        }
    }

    #[test]
    fn ids_follow_discovery_order() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        assert_eq!(catalog.len(), 3);
        for (index, problem) in catalog.iter().enumerate() {
            assert_eq!(problem.id(), index);
        }
    }

    #[test]
    fn locate_fix_returns_the_descriptor_it_produced() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        for problem in &catalog {
            for fix in problem.fixes() {
                let found = catalog.locate_fix(&fix.id().to_string()).expect("resolves");
                assert_eq!(found.id(), fix.id());
                assert_eq!(found.description(), fix.description());
            }
        }
    }

    #[test]
    fn locate_fix_rejects_malformed_ids() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        assert!(matches!(
            catalog.locate_fix("abc"),
            Err(CatalogError::InvalidId(_))
        ));
        assert!(matches!(
            catalog.locate_fix("5.x"),
            Err(CatalogError::InvalidId(_))
        ));
    }

    #[test]
    fn locate_fix_rejects_out_of_range_problem() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        assert_eq!(catalog.len(), 3);
        assert!(matches!(
            catalog.locate_fix("99.0"),
            Err(CatalogError::InvalidId(_))
        ));
    }

    #[test]
    fn locate_fix_rejects_out_of_range_fix() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        assert!(matches!(
            catalog.locate_fix("2.0"),
            Err(CatalogError::InvalidId(_))
        ));
    }

    #[test]
    fn filter_preserves_relative_order() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        let errors = catalog.filter(Problem::is_error);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(0).unwrap().id(), 0);
        assert_eq!(errors.get(1).unwrap().id(), 2);
        // Receiver untouched.
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn filter_by_fix_kind_keeps_only_matching_capability() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();

        let importable = catalog.filter_by_fix_kind::<ImportAction>();
        assert_eq!(importable.len(), 1);
        assert_eq!(importable.get(0).unwrap().id(), 0);

        let renamable = catalog.filter_by_fix_kind::<RenameAction>();
        assert_eq!(renamable.len(), 1);
        assert_eq!(renamable.get(0).unwrap().id(), 1);
    }

    #[test]
    fn severity_counts() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        assert_eq!(catalog.error_count(), 2);
        assert_eq!(catalog.warning_count(), 1);
    }

    #[test]
    fn catalog_turns_stale_when_the_document_moves() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        assert_eq!(catalog.state(), CatalogState::Ready);

        fixture.document.replace(Span::empty(0), "// edit\n");
        assert_eq!(catalog.state(), CatalogState::Stale);
        assert!(catalog.is_stale());
    }

    #[test]
    fn catalog_is_stale_once_the_document_is_gone() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        drop(fixture);
        assert!(catalog.is_stale());
    }

    #[test]
    fn locate_equivalent_survives_id_and_span_drift() {
        let fixture = Fixture::new();
        let old_catalog = fixture.catalog();
        let held = old_catalog.locate_fix("1.0").expect("resolves").clone();

        // A rebuilt catalog where the same remediation landed at a new id
        // and a shifted span.
        let raws = vec![
            RawDiagnostic::new(Severity::Warning, "odd name 'beta'", Span::new(4, 8)).with_fix(
                CandidateFix::new(&fixture.rename, Span::new(4, 8))
                    .with_display_name("Rename 'beta'"),
            ),
        ];
        let lines = LineIndex::new(&fixture.document.text());
        let ctx = FixContext::new(&fixture.project, &fixture.unit, Arc::clone(&fixture.document));
        let mut items = Vec::new();
        for raw in &raws {
            if let Some(problem) = Problem::from_raw(items.len(), raw, &lines, &ctx) {
                items.push(problem);
            }
        }
        let new_catalog = Problems::new(items, &fixture.document, fixture.document.version());

        let resolved = new_catalog.locate_equivalent(&held).expect("equivalent");
        assert_eq!(resolved.id().to_string(), "0.0");
        assert_eq!(resolved.description(), "Rename 'beta'");
        assert_eq!(resolved.span(), Span::new(4, 8));
    }

    #[test]
    fn locate_equivalent_fails_when_nothing_matches() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        let held = catalog.locate_fix("0.0").expect("resolves").clone();

        let empty = Problems::new(Vec::new(), &fixture.document, fixture.document.version());
        assert!(matches!(
            empty.locate_equivalent(&held),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn records_flatten_the_generation() {
        let fixture = Fixture::new();
        let catalog = fixture.catalog();
        let records = catalog.to_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[0].fixes.len(), 1);
        assert_eq!(records[0].fixes[0].id, "0.0");
        assert_eq!(records[0].fixes[0].description, "Import 'alpha'");
        assert_eq!(records[2].fixes.len(), 0);
    }
}
