//! Tri-state result of a cache read.

use crate::{CacheError, CacheResult};

/// Result of reading one key.
///
/// Keeps a normal miss (`Absent`) apart from an inability to answer
/// (`Failed`), with projections for callers that only want an `Option`.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOutcome<T> {
    /// The key held a value that decoded into `T`.
    Found(T),
    /// The key has no entry.
    Absent,
    /// The read could not be answered.
    Failed(CacheError),
}

impl<T> CacheOutcome<T> {
    /// Returns `true` for [`CacheOutcome::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns `true` for [`CacheOutcome::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for [`CacheOutcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the failure cause, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&CacheError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Collapses absence and failure into `None`.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::Failed(_) => None,
        }
    }

    /// Converts back into a `Result`, keeping absence as `Ok(None)`.
    pub fn into_result(self) -> CacheResult<Option<T>> {
        match self {
            Self::Found(value) => Ok(Some(value)),
            Self::Absent => Ok(None),
            Self::Failed(err) => Err(err),
        }
    }

    /// Maps a found value, leaving the other variants untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CacheOutcome<U> {
        match self {
            Self::Found(value) => CacheOutcome::Found(f(value)),
            Self::Absent => CacheOutcome::Absent,
            Self::Failed(err) => CacheOutcome::Failed(err),
        }
    }
}

impl<T> From<CacheResult<Option<T>>> for CacheOutcome<T> {
    fn from(result: CacheResult<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::Absent,
            Err(err) => Self::Failed(err),
        }
    }
}
