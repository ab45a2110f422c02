//! Year model

use super::{Plan, Session};
use serde::{Deserialize, Serialize};

/// One academic year of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Year {
    /// Year label, unique in the store (e.g., "2020")
    pub name: String,

    /// Catalog year used to resolve course metadata for this year
    #[serde(rename = "dataSource")]
    pub data_source: String,

    /// Sessions in insertion order (see `PlanStore::sort_store` for chronological order)
    #[serde(default)]
    pub sessions: Vec<Session>,

    /// Requirement documents cached for this year
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl Year {
    /// Create an empty year
    #[must_use]
    pub const fn new(name: String, data_source: String) -> Self {
        Self {
            name,
            data_source,
            sessions: Vec::new(),
            plans: Vec::new(),
        }
    }

    /// Position of the session named `name`
    #[must_use]
    pub fn session_position(&self, name: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.name == name)
    }

    /// Look up a session by name
    #[must_use]
    pub fn session(&self, name: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.name == name)
    }

    /// Position of the cached plan with `code`
    #[must_use]
    pub fn plan_position(&self, code: &str) -> Option<usize> {
        self.plans.iter().position(|p| p.code == code)
    }

    /// True when the year has no sessions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of courses planned across all sessions
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.sessions.iter().map(|s| s.courses.len()).sum()
    }
}
