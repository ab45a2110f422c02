//! The persisted plan document

use super::Year;
use serde::{Deserialize, Serialize};

/// Root of the persisted tree: `{ "years": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Years in store order
    #[serde(default)]
    pub years: Vec<Year>,
}

impl PlanDocument {
    /// Parse a document from its JSON form
    ///
    /// # Errors
    /// Returns an error if the JSON does not match the document layout
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the document to compact JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails (non-finite marks)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
