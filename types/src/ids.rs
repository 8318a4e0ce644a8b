//! Catalog-local identifiers.

use std::fmt;
use std::str::FromStr;

/// Separator between the problem index and the fix sub-index in a wire fix
/// id. A decimal index can never contain it.
pub const FIX_ID_SEPARATOR: char = '.';

/// Composite identifier of one quick fix within one catalog generation,
/// rendered on the wire as `<problem>.<fix>`.
///
/// Ids are assigned in discovery order during one analysis pass and are only
/// meaningful against the catalog instance that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixId {
    problem: usize,
    fix: usize,
}

impl FixId {
    #[must_use]
    pub fn new(problem: usize, fix: usize) -> Self {
        Self { problem, fix }
    }

    /// Index of the owning problem in its catalog.
    #[must_use]
    pub fn problem(self) -> usize {
        self.problem
    }

    /// Index of the fix within the owning problem's fix list.
    #[must_use]
    pub fn fix(self) -> usize {
        self.fix
    }
}

impl fmt::Display for FixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{FIX_ID_SEPARATOR}{}", self.problem, self.fix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed fix id '{0}'")]
pub struct ParseFixIdError(pub String);

impl FromStr for FixId {
    type Err = ParseFixIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseFixIdError(s.to_string());
        let (problem, fix) = s.split_once(FIX_ID_SEPARATOR).ok_or_else(malformed)?;
        let problem = problem.parse().map_err(|_| malformed())?;
        let fix = fix.parse().map_err(|_| malformed())?;
        Ok(Self { problem, fix })
    }
}
