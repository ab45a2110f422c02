//! Report generation for the plan and its unit summaries
//!
//! A [`ReportContext`] is built once from a store snapshot and the catalog;
//! each [`ReportGenerator`] renders one of its tables ([`ReportKind`]) in its
//! own format.

pub mod crosstab;
pub mod formats;

use crate::core::catalog::ReferenceCatalog;
use crate::core::planner::ordering::{compare_levels, compare_names, compare_sessions, compare_years};
use crate::core::planner::{PersistenceGateway, PlanStore};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use crosstab::{format_units, CrossTab, CrossTabRow, TotalsOptions};
pub use formats::{CsvReporter, HtmlReporter, ReportFormat};

/// Name shown for planned courses the catalog does not list
pub const COURSE_NOT_FOUND: &str = "Course not found";

/// Header of the plan export
pub const PLAN_HEADER: [&str; 5] = ["Year", "Session", "Code", "Name", "Units"];

/// One planned course resolved against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    /// Year name
    pub year: String,
    /// Session name
    pub session: String,
    /// Course code
    pub code: String,
    /// Catalog name, or [`COURSE_NOT_FOUND`]
    pub name: String,
    /// Catalog units, or the default unit weight
    pub units: f64,
}

impl PlanRow {
    /// The row as export fields
    #[must_use]
    pub fn record(&self) -> [String; 5] {
        [
            self.year.clone(),
            self.session.clone(),
            self.code.clone(),
            self.name.clone(),
            format_units(self.units),
        ]
    }
}

/// A plan row with the row spans of its Year and Session cells.
///
/// A span of 0 means the cell is covered by a row above.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintRow {
    /// Year cell span
    pub year_span: usize,
    /// Session cell span
    pub session_span: usize,
    /// The underlying row
    pub row: PlanRow,
}

/// Group consecutive rows by year and session, computing row spans
#[must_use]
pub fn print_rows(rows: &[PlanRow]) -> Vec<PrintRow> {
    let mut printed = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let starts_year = idx == 0 || rows[idx - 1].year != row.year;
        let starts_session = starts_year || rows[idx - 1].session != row.session;

        let year_span = if starts_year {
            rows[idx..].iter().take_while(|r| r.year == row.year).count()
        } else {
            0
        };
        let session_span = if starts_session {
            rows[idx..]
                .iter()
                .take_while(|r| r.year == row.year && r.session == row.session)
                .count()
        } else {
            0
        };
        printed.push(PrintRow {
            year_span,
            session_span,
            row: row.clone(),
        });
    }
    printed
}

/// Which table of the context to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Every planned course in chronological order
    Plan,
    /// Units by level band and faculty
    Levels,
    /// Units by year and session
    Sessions,
}

impl ReportKind {
    /// Title used by formats that show one
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Plan => "Degree Plan",
            Self::Levels => "Units by Level",
            Self::Sessions => "Units by Session",
        }
    }

    /// File stem used for exports
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Levels => "levels",
            Self::Sessions => "sessions",
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plan" => Ok(Self::Plan),
            "levels" | "level" => Ok(Self::Levels),
            "sessions" | "session" => Ok(Self::Sessions),
            _ => Err(format!("Unknown report: {s}")),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Data needed to render any report
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Planned courses in chronological order
    pub plan: Vec<PlanRow>,
    /// Units by level band (rows) and faculty (columns)
    pub by_level: CrossTab,
    /// Units by year (rows) and session (columns)
    pub by_session: CrossTab,
}

impl ReportContext {
    /// Resolve the store's plan against `catalog`
    #[must_use]
    pub fn build<G: PersistenceGateway, C: ReferenceCatalog>(
        store: &PlanStore<G>,
        catalog: &C,
    ) -> Self {
        let plan = store
            .timeline()
            .into_iter()
            .flat_map(|entry| {
                entry.session.courses.iter().map(move |course| {
                    let name = catalog
                        .course(&entry.year.data_source, &course.code)
                        .map_or_else(|| COURSE_NOT_FOUND.to_string(), |c| c.name.clone());
                    PlanRow {
                        year: entry.year.name.clone(),
                        session: entry.session.name.clone(),
                        code: course.code.clone(),
                        name,
                        units: store.units_for(entry.year, &course.code, catalog),
                    }
                })
            })
            .collect();

        let summary = store.data_summary(catalog);
        Self {
            plan,
            by_level: CrossTab::build(
                &summary.by_level,
                "Level",
                TotalsOptions::ALL,
                Some(compare_levels),
                Some(compare_names),
            ),
            by_session: CrossTab::build(
                &summary.by_session,
                "Year",
                TotalsOptions::ALL,
                Some(compare_years),
                Some(compare_sessions),
            ),
        }
    }

    /// The cross-tab behind a summary report, `None` for [`ReportKind::Plan`]
    #[must_use]
    pub const fn table(&self, kind: ReportKind) -> Option<&CrossTab> {
        match kind {
            ReportKind::Plan => None,
            ReportKind::Levels => Some(&self.by_level),
            ReportKind::Sessions => Some(&self.by_session),
        }
    }

    /// Total units planned
    #[must_use]
    pub fn total_units(&self) -> f64 {
        self.plan.iter().map(|r| r.units).sum()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render one report as a string
    ///
    /// # Errors
    /// Returns an error if encoding or templating fails
    fn render(&self, ctx: &ReportContext, kind: ReportKind) -> Result<String, Box<dyn Error>>;

    /// Render one report to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(
        &self,
        ctx: &ReportContext,
        kind: ReportKind,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx, kind)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: &str, session: &str, code: &str) -> PlanRow {
        PlanRow {
            year: year.to_string(),
            session: session.to_string(),
            code: code.to_string(),
            name: COURSE_NOT_FOUND.to_string(),
            units: 6.0,
        }
    }

    #[test]
    fn test_print_rows_spans() {
        let rows = vec![
            row("2020", "First Semester", "COMP1100"),
            row("2020", "First Semester", "MATH1013"),
            row("2020", "Second Semester", "COMP1110"),
            row("2021", "First Semester", "COMP2100"),
        ];
        let spans: Vec<(usize, usize)> = print_rows(&rows)
            .iter()
            .map(|p| (p.year_span, p.session_span))
            .collect();
        assert_eq!(spans, vec![(3, 2), (0, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_report_kind_from_str() {
        assert_eq!("Levels".parse::<ReportKind>(), Ok(ReportKind::Levels));
        assert_eq!("plan".parse::<ReportKind>(), Ok(ReportKind::Plan));
        assert!("grades".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_plan_record() {
        assert_eq!(
            row("2020", "First Semester", "COMP1100").record(),
            ["2020", "First Semester", "COMP1100", "Course not found", "6"]
        );
    }
}
