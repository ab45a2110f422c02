//! Sources for plan requirement documents
//!
//! `PlanStore::plan_payload_or_fetch` consults the cache first and only calls a
//! [`PlanSource`] on a miss. A failed fetch is returned to the caller and never
//! cached, so asking again later simply retries.

use super::outcome::StoreError;
use crate::core::models::PlanKind;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a plan source
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source has no document for this plan
    #[error("No {kind} requirements for {code} in {year}")]
    NotAvailable {
        /// Catalog year asked for
        year: String,
        /// Plan code asked for
        code: String,
        /// Plan kind asked for
        kind: PlanKind,
    },

    /// The source failed while reading
    #[error("Failed to fetch plan: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from a cache-first plan lookup
#[derive(Debug, Error)]
pub enum CacheError {
    /// The source could not supply the payload; nothing was cached
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The payload was fetched but storing it failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Supplier of plan requirement documents for a catalog year
pub trait PlanSource {
    /// Fetch the requirements payload for `code`
    ///
    /// # Errors
    /// Returns an error if the document is unavailable or cannot be read
    fn fetch(&self, year: &str, code: &str, kind: PlanKind) -> Result<String, FetchError>;
}

/// Plan documents mirrored on disk as `<root>/<year>/<kind>/<code>.html`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Read documents below `root`
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, year: &str, code: &str, kind: PlanKind) -> PathBuf {
        self.root
            .join(year)
            .join(kind.slug())
            .join(format!("{code}.html"))
    }
}

impl PlanSource for DirectorySource {
    fn fetch(&self, year: &str, code: &str, kind: PlanKind) -> Result<String, FetchError> {
        let path = self.document_path(year, code, kind);
        if !path.is_file() {
            return Err(FetchError::NotAvailable {
                year: year.to_string(),
                code: code.to_string(),
                kind,
            });
        }
        Ok(fs::read_to_string(path)?)
    }
}
