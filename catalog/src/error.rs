//! The catalog's error taxonomy.

use thiserror::Error;

use triage_engine::EngineError;

/// Failures surfaced by catalog construction, lookup, and fix execution.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A fix id string was malformed, non-numeric, or out of range.
    #[error("invalid fix id '{0}'")]
    InvalidId(String),

    /// Identity resolution found no equivalent descriptor.
    #[error("no equivalent fix for '{0}'")]
    NotFound(String),

    /// The analysis pass was superseded before completion.
    #[error("analysis pass canceled")]
    Canceled,

    /// Required project or editor context was absent. Caller misuse, not
    /// user-recoverable.
    #[error("required context missing: {0}")]
    FatalContext(&'static str),

    /// The engine no longer holds the fix's action.
    #[error("fix '{0}' is no longer available")]
    FixUnavailable(String),

    /// A failure from the engine boundary, surfaced as-is.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
