//! Analysis engine boundary for Triage.
//!
//! The source-analysis engine itself is an external collaborator; this
//! crate specifies it at the seam. It carries the capability traits the
//! catalog consumes ([`ActionHandle`], [`AnalysisEngine`], [`IndexService`]),
//! the raw-diagnostic data the engine produces, the project/document model
//! fixes run against, and the progress scopes that make passes cancellable.

mod action;
mod analysis;
mod error;
mod index;
mod progress;
mod project;

pub use action::{ActionHandle, CandidateFix};
pub use analysis::{AnalysisEngine, RawDiagnostic};
pub use error::EngineError;
pub use index::{IndexId, IndexService};
pub use progress::{PassGate, ProgressScope};
pub use project::{FixContext, ProjectContext, SourceDocument, SourceUnit, WriteTransaction};
