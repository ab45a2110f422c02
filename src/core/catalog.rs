//! Reference course catalog
//!
//! The planner only reads catalog metadata: course names, offered sessions and
//! unit weights per catalog year, plus the majors/minors/programs on offer. The
//! [`ReferenceCatalog`] trait is that boundary; [`Catalog`] is the JSON-file
//! backed implementation used by the CLI.

use crate::core::models::PlanKind;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Unit weight of a standard course, used when the catalog has no entry
pub const DEFAULT_UNIT_WEIGHT: f64 = 6.0;

/// Errors raised while loading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a catalog document
    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Course metadata for one catalog year
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogCourse {
    /// Course code (e.g., "COMP1100")
    #[serde(alias = "c")]
    pub code: String,

    /// Course title
    #[serde(alias = "n", default)]
    pub name: String,

    /// Career / level band letter (e.g., "U" for undergraduate)
    #[serde(alias = "l", alias = "levelBand", default)]
    pub level_band: String,

    /// Session labels the course runs in
    #[serde(alias = "s", alias = "sessionsOffered", default)]
    pub sessions_offered: Vec<String>,

    /// Credit units
    #[serde(
        alias = "u",
        alias = "unitWeight",
        default = "default_unit_weight",
        deserialize_with = "de_units"
    )]
    pub unit_weight: f64,
}

impl CatalogCourse {
    /// Build a catalog entry in code (mainly for tests and fixtures)
    #[must_use]
    pub fn new(code: &str, name: &str, sessions: &[&str], unit_weight: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            level_band: "U".to_string(),
            sessions_offered: sessions.iter().map(|s| (*s).to_string()).collect(),
            unit_weight,
        }
    }

    /// Whether the course runs in `session`
    #[must_use]
    pub fn is_offered_in(&self, session: &str) -> bool {
        self.sessions_offered.iter().any(|s| s == session)
    }
}

/// A major, minor or program listed by the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPlan {
    /// Plan code
    pub code: String,
    /// Plan title
    pub name: String,
    /// Major, minor or program
    pub kind: PlanKind,
    /// Career / level label
    pub level: String,
    /// Units required, when the catalog states it
    pub units: Option<f64>,
}

/// Inclusive range of catalog years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// Earliest catalog year
    pub min: u16,
    /// Latest catalog year
    pub max: u16,
}

impl YearRange {
    /// Create a range; the bounds are swapped if given in reverse
    #[must_use]
    pub const fn new(a: u16, b: u16) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Clamp a planned year label into the catalog range.
    ///
    /// Non-numeric labels resolve to the latest catalog year.
    #[must_use]
    pub fn clamp(&self, year: &str) -> String {
        year.trim()
            .parse::<u16>()
            .map_or(self.max, |y| y.clamp(self.min, self.max))
            .to_string()
    }

    /// Iterate the years of the range as labels
    pub fn labels(&self) -> impl Iterator<Item = String> {
        (self.min..=self.max).map(|y| y.to_string())
    }
}

/// Read-only access to catalog metadata, keyed by catalog year and code
pub trait ReferenceCatalog {
    /// Look up one course in a catalog year
    fn course(&self, year: &str, code: &str) -> Option<&CatalogCourse>;

    /// All courses of a catalog year (empty for unknown years)
    fn courses(&self, year: &str) -> &[CatalogCourse];

    /// Majors, minors and programs of a catalog year
    fn plans(&self, year: &str) -> &[CatalogPlan];

    /// The years this catalog covers, or `None` if it is empty
    fn year_range(&self) -> Option<YearRange>;
}

/// Filter for [`Catalog::search_courses`]; empty lists match everything
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    /// Keep courses offered in any of these sessions
    pub sessions: Vec<String>,
    /// Keep courses whose code starts with any of these faculty prefixes
    pub faculties: Vec<String>,
    /// Keep courses with any of these level bands / careers
    pub careers: Vec<String>,
}

impl CourseQuery {
    fn matches(&self, course: &CatalogCourse) -> bool {
        let session_ok = self.sessions.is_empty()
            || self.sessions.iter().any(|s| course.is_offered_in(s));
        let faculty_ok = self.faculties.is_empty()
            || self.faculties.iter().any(|f| course.code.starts_with(f.as_str()));
        let career_ok =
            self.careers.is_empty() || self.careers.iter().any(|c| *c == course.level_band);
        session_ok && faculty_ok && career_ok
    }
}

/// In-memory catalog loaded from the scraper's JSON output
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: HashMap<String, Vec<CatalogCourse>>,
    index: HashMap<String, HashMap<String, usize>>,
    plans: HashMap<String, Vec<CatalogPlan>>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    courses: HashMap<String, Vec<CatalogCourse>>,
    #[serde(default)]
    majors: HashMap<String, HashMap<String, PlanEntry>>,
    #[serde(default)]
    minors: HashMap<String, HashMap<String, PlanEntry>>,
    #[serde(default)]
    programs: HashMap<String, HashMap<String, PlanEntry>>,
}

#[derive(Deserialize)]
struct PlanEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    level: String,
    #[serde(default, deserialize_with = "de_opt_units")]
    units: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UnitsField {
    Number(f64),
    Text(String),
}

impl UnitsField {
    fn value<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(t) => t
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid unit value '{t}'"))),
        }
    }
}

const fn default_unit_weight() -> f64 {
    DEFAULT_UNIT_WEIGHT
}

fn de_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    UnitsField::deserialize(deserializer)?.value()
}

fn de_opt_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<UnitsField>::deserialize(deserializer)?
        .map(UnitsField::value)
        .transpose()
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog document.
    ///
    /// Accepts `{"courses": {year: [...]}, "majors": {year: {code: {...}}}, "minors": ..., "programs": ...}`
    /// where course entries use either full field names or the compact `c/n/l/s/u` keys.
    ///
    /// # Errors
    /// Returns an error if the JSON does not match the catalog layout
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        for (year, courses) in file.courses {
            for course in courses {
                catalog.insert_course(&year, course);
            }
        }

        for (kind, by_year) in [
            (PlanKind::Major, file.majors),
            (PlanKind::Minor, file.minors),
            (PlanKind::Program, file.programs),
        ] {
            for (year, entries) in by_year {
                let mut entries: Vec<_> = entries.into_iter().collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                for (code, entry) in entries {
                    catalog.insert_plan(
                        &year,
                        CatalogPlan {
                            code,
                            name: entry.name,
                            kind,
                            level: entry.level,
                            units: entry.units,
                        },
                    );
                }
            }
        }

        Ok(catalog)
    }

    /// Load a catalog file from disk
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Add or replace a course in a catalog year
    pub fn insert_course(&mut self, year: &str, course: CatalogCourse) {
        let courses = self.courses.entry(year.to_string()).or_default();
        let index = self.index.entry(year.to_string()).or_default();
        if let Some(&pos) = index.get(&course.code) {
            courses[pos] = course;
        } else {
            index.insert(course.code.clone(), courses.len());
            courses.push(course);
        }
    }

    /// Add a major/minor/program to a catalog year
    pub fn insert_plan(&mut self, year: &str, plan: CatalogPlan) {
        self.plans.entry(year.to_string()).or_default().push(plan);
    }

    /// Courses of `year` matching `query`, sorted by code
    #[must_use]
    pub fn search_courses(&self, year: &str, query: &CourseQuery) -> Vec<&CatalogCourse> {
        let mut found: Vec<_> = self
            .courses(year)
            .iter()
            .filter(|c| query.matches(c))
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        found
    }

    /// Number of catalog years with course data
    #[must_use]
    pub fn year_count(&self) -> usize {
        self.courses.len()
    }
}

impl ReferenceCatalog for Catalog {
    fn course(&self, year: &str, code: &str) -> Option<&CatalogCourse> {
        let pos = *self.index.get(year)?.get(code)?;
        self.courses.get(year)?.get(pos)
    }

    fn courses(&self, year: &str) -> &[CatalogCourse] {
        self.courses.get(year).map(Vec::as_slice).unwrap_or_default()
    }

    fn plans(&self, year: &str) -> &[CatalogPlan] {
        self.plans.get(year).map(Vec::as_slice).unwrap_or_default()
    }

    fn year_range(&self) -> Option<YearRange> {
        let mut years = self
            .courses
            .keys()
            .chain(self.plans.keys())
            .filter_map(|y| y.parse::<u16>().ok());
        let first = years.next()?;
        let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Some(YearRange::new(min, max))
    }
}
