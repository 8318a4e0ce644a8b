//! Problem severity levels.

use serde::{Deserialize, Serialize};

/// Severity ladder for reported problems, mirroring the analysis engine's
/// highlight levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
    WeakWarning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::WeakWarning => "weak warning",
            Self::Info => "info",
        }
    }

    /// The wire-format name, as serialized into records.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::WeakWarning => "WEAK_WARNING",
            Self::Info => "INFO",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Error => 3,
            Self::Warning => 2,
            Self::WeakWarning => 1,
            Self::Info => 0,
        }
    }

    /// Whether `self` is at least as severe as `floor`.
    #[must_use]
    pub fn is_at_least(self, floor: Self) -> bool {
        self.rank() >= floor.rank()
    }
}
