//! Outcome kinds reported by `PlanStore` operations

use super::persistence::PersistError;
use std::fmt;
use thiserror::Error;

/// Level of the plan tree an outcome refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// A year
    Year,
    /// A session within a year
    Session,
    /// A course within a session
    Course,
    /// A cached plan within a year
    Plan,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Year => "year",
            Self::Session => "session",
            Self::Course => "course",
            Self::Plan => "plan",
        };
        f.write_str(name)
    }
}

/// Success signal for removal operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed(pub Level);

/// Why a store operation did not produce its payload
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named year, session, course or plan is not in the store
    #[error("{0} not found")]
    NotFound(Level),

    /// An entry with that name already exists at this level
    #[error("{0} already exists")]
    AlreadyExists(Level),

    /// A planned course has no entry in its year's catalog
    #[error("{code} is not listed in the {catalog_year} catalog")]
    CatalogEntryMissing {
        /// Course code looked up
        code: String,
        /// Catalog year searched
        catalog_year: String,
    },

    /// The mutation was applied in memory but the write-through commit failed
    #[error("Failed to save plan: {0}")]
    Persist(#[from] PersistError),
}

impl StoreError {
    /// The level involved, for `NotFound` and `AlreadyExists`
    #[must_use]
    pub const fn level(&self) -> Option<Level> {
        match self {
            Self::NotFound(level) | Self::AlreadyExists(level) => Some(*level),
            Self::CatalogEntryMissing { .. } | Self::Persist(_) => None,
        }
    }

    /// True for `NotFound(level)`
    #[must_use]
    pub fn is_not_found(&self, level: Level) -> bool {
        matches!(self, Self::NotFound(l) if *l == level)
    }

    /// True for `AlreadyExists(level)`
    #[must_use]
    pub fn is_already_exists(&self, level: Level) -> bool {
        matches!(self, Self::AlreadyExists(l) if *l == level)
    }
}

/// Result of a `PlanStore` operation
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(StoreError::NotFound(Level::Session).to_string(), "session not found");
        assert_eq!(
            StoreError::AlreadyExists(Level::Course).to_string(),
            "course already exists"
        );
    }

    #[test]
    fn test_level_helpers() {
        let err = StoreError::NotFound(Level::Year);
        assert_eq!(err.level(), Some(Level::Year));
        assert!(err.is_not_found(Level::Year));
        assert!(!err.is_not_found(Level::Session));
        assert!(!err.is_already_exists(Level::Year));

        let missing = StoreError::CatalogEntryMissing {
            code: "COMP9999".to_string(),
            catalog_year: "2020".to_string(),
        };
        assert_eq!(missing.level(), None);
        assert_eq!(missing.to_string(), "COMP9999 is not listed in the 2020 catalog");
    }
}
