//! Engine-side failures.

use thiserror::Error;

/// Failures surfaced by the analysis engine and its capabilities.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The in-flight pass was superseded and its scope canceled.
    #[error("analysis pass canceled")]
    Canceled,

    /// A remediation action failed while being invoked.
    #[error("action failed: {0}")]
    ActionFailed(String),

    /// A supporting index could not be brought up to date.
    #[error("index refresh failed: {0}")]
    IndexRefresh(String),
}
