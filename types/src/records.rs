//! Wire-facing catalog records.
//!
//! The shape one catalog generation serializes to for the command layer.
//! The opaque action handle never appears here; fixes carry only their
//! composite id, label, and span.

use serde::{Deserialize, Serialize};

use crate::Severity;

/// One problem, flattened for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub id: usize,
    pub description: String,
    /// 1-based line of the problem's start offset.
    pub line: u32,
    /// 1-based column of the problem's start offset.
    pub col: u32,
    pub start_offset: usize,
    pub end_offset: usize,
    pub severity: Severity,
    pub fixes: Vec<FixRecord>,
}

/// One remediation action available for a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRecord {
    /// Composite wire id, `<problem>.<fix>`.
    pub id: String,
    pub description: String,
    pub start: usize,
    pub end: usize,
}
