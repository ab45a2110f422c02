//! Durable storage for the plan document
//!
//! The store hands the whole tree to a [`PersistenceGateway`] after every
//! mutation. Gateways overwrite the stored copy in full; there are no partial
//! writes and nothing to merge.

use crate::core::models::PlanDocument;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a gateway
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded
    #[error("Invalid plan document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Commit/load contract for the plan tree
pub trait PersistenceGateway {
    /// Load the last committed document, or `None` if nothing was stored yet
    ///
    /// # Errors
    /// Returns an error if the stored copy cannot be read or decoded
    fn load(&mut self) -> Result<Option<PlanDocument>, PersistError>;

    /// Replace the stored document with `document`
    ///
    /// # Errors
    /// Returns an error if the document cannot be encoded or written
    fn commit(&mut self, document: &PlanDocument) -> Result<(), PersistError>;
}

/// Gateway keeping the serialized document in memory, like a browser key-value slot
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    stored: Option<String>,
    commits: usize,
}

impl MemoryGateway {
    /// Create an empty gateway
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway pre-loaded with a serialized document
    #[must_use]
    pub const fn with_contents(json: String) -> Self {
        Self {
            stored: Some(json),
            commits: 0,
        }
    }

    /// Raw JSON of the last commit
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.stored.as_deref()
    }

    /// Number of commits received
    #[must_use]
    pub const fn commit_count(&self) -> usize {
        self.commits
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&mut self) -> Result<Option<PlanDocument>, PersistError> {
        self.stored
            .as_deref()
            .map(PlanDocument::from_json)
            .transpose()
            .map_err(PersistError::from)
    }

    fn commit(&mut self, document: &PlanDocument) -> Result<(), PersistError> {
        self.stored = Some(document.to_json()?);
        self.commits += 1;
        Ok(())
    }
}

/// Gateway storing the document as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    /// Store the plan at `path`
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the plan file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load(&mut self) -> Result<Option<PlanDocument>, PersistError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(PlanDocument::from_json(&content)?))
    }

    fn commit(&mut self, document: &PlanDocument) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        // Write-then-rename so a crash never leaves a half-written plan behind.
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
