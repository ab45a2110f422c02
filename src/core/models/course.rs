//! Planned course model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}[0-9]{4}$").expect("Invalid course code pattern"));

/// Check that `code` has the catalog format: four capital letters then four digits
/// (e.g., "COMP1100").
///
/// The store accepts any string as a code; callers validate with this at the boundary.
#[must_use]
pub fn is_course_code(code: &str) -> bool {
    COURSE_CODE.is_match(code)
}

/// A course planned in one session. Distinct from the catalog's course metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Catalog code (e.g., "COMP1100")
    pub code: String,

    /// Final mark out of 100, or `None` while ungraded
    #[serde(default)]
    pub mark: Option<f64>,
}

impl Course {
    /// Create an ungraded course
    #[must_use]
    pub const fn new(code: String) -> Self {
        Self { code, mark: None }
    }

    /// Create a course with an optional mark
    #[must_use]
    pub const fn with_mark(code: String, mark: Option<f64>) -> Self {
        Self { code, mark }
    }

    /// Faculty prefix: the first four characters of the code (e.g., "COMP")
    #[must_use]
    pub fn faculty(&self) -> String {
        self.code.chars().take(4).collect()
    }

    /// Level band derived from the fifth character of the code (e.g., "COMP2300" → "2000").
    ///
    /// Returns `None` when the code is too short or the fifth character is not a digit.
    #[must_use]
    pub fn level_band(&self) -> Option<String> {
        self.code
            .chars()
            .nth(4)
            .filter(char::is_ascii_digit)
            .map(|digit| format!("{digit}000"))
    }
}
