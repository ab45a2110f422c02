//! Session model

use super::Course;
use serde::{Deserialize, Serialize};

/// One study period inside a year (e.g., "First Semester")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session label, unique within its year
    pub name: String,

    /// Planned courses in insertion order
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            courses: Vec::new(),
        }
    }

    /// Position of `code` in this session, if planned
    #[must_use]
    pub fn course_position(&self, code: &str) -> Option<usize> {
        self.courses.iter().position(|c| c.code == code)
    }

    /// Whether `code` is planned in this session
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.course_position(code).is_some()
    }

    /// True when no courses are planned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_position() {
        let mut session = Session::new("First Semester".to_string());
        assert!(session.is_empty());

        session.courses.push(Course::new("COMP1100".to_string()));
        session.courses.push(Course::new("MATH1013".to_string()));

        assert_eq!(session.course_position("MATH1013"), Some(1));
        assert!(session.contains("COMP1100"));
        assert!(!session.contains("COMP1110"));
        assert!(!session.is_empty());
    }
}
