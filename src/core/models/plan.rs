//! Cached plan (major / minor / program requirements) model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of requirement document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanKind {
    /// A major
    Major,
    /// A minor
    Minor,
    /// A whole degree program
    Program,
}

impl PlanKind {
    /// All kinds, in catalog search order
    pub const ALL: [Self; 3] = [Self::Major, Self::Minor, Self::Program];

    /// Lowercase path segment used by catalog sources (e.g., "major")
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Program => "program",
        }
    }
}

impl FromStr for PlanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "program" => Ok(Self::Program),
            _ => Err(format!("Unknown plan type: {s}")),
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "Major"),
            Self::Minor => write!(f, "Minor"),
            Self::Program => write!(f, "Program"),
        }
    }
}

/// A requirement document cached against a year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan code (e.g., "COMP-MAJ")
    pub code: String,

    /// Major, minor or program
    #[serde(rename = "type")]
    pub kind: PlanKind,

    /// Rendered requirements; opaque to the planner
    pub payload: String,
}

impl Plan {
    /// Create a cached plan entry
    #[must_use]
    pub const fn new(code: String, kind: PlanKind, payload: String) -> Self {
        Self {
            code,
            kind,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("Major".parse::<PlanKind>(), Ok(PlanKind::Major));
        assert_eq!("minor".parse::<PlanKind>(), Ok(PlanKind::Minor));
        assert_eq!("PROGRAM".parse::<PlanKind>(), Ok(PlanKind::Program));
        assert!("specialisation".parse::<PlanKind>().is_err());
        assert_eq!(PlanKind::Program.to_string(), "Program");
        assert_eq!(PlanKind::Minor.slug(), "minor");
    }

    #[test]
    fn test_plan_serializes_type_field() {
        let plan = Plan::new("COMP-MAJ".to_string(), PlanKind::Major, "<p>x</p>".to_string());
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            json,
            r#"{"code":"COMP-MAJ","type":"Major","payload":"<p>x</p>"}"#
        );
    }
}
