//! HTML report generator
//!
//! Renders self-contained pages through askama templates: the unit summaries
//! as cross-tab tables and the plan as a print table whose Year and Session
//! cells span their rows.

use crate::core::report::crosstab::{format_units, CrossTab};
use crate::core::report::{
    print_rows, PlanRow, ReportContext, ReportGenerator, ReportKind, PLAN_HEADER,
};
use askama::Template;
use std::error::Error;

#[derive(Template)]
#[template(path = "crosstab.html")]
struct CrossTabPage<'a> {
    title: &'a str,
    header: Vec<String>,
    records: Vec<Vec<String>>,
    footer: Vec<String>,
}

/// Cells of one print-table row, pre-formatted for the template
struct PrintCells {
    year_span: usize,
    session_span: usize,
    year: String,
    session: String,
    code: String,
    name: String,
    units: String,
}

#[derive(Template)]
#[template(path = "print_table.html")]
struct PrintTablePage<'a> {
    title: &'a str,
    header: [&'a str; 5],
    rows: Vec<PrintCells>,
    total: String,
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn table_html(title: &str, table: &CrossTab) -> askama::Result<String> {
        CrossTabPage {
            title,
            header: table.header(),
            records: table.records(),
            footer: table.footer().unwrap_or_default(),
        }
        .render()
    }

    fn plan_html(title: &str, plan: &[PlanRow]) -> askama::Result<String> {
        let rows = print_rows(plan)
            .into_iter()
            .map(|printed| PrintCells {
                year_span: printed.year_span,
                session_span: printed.session_span,
                units: format_units(printed.row.units),
                year: printed.row.year,
                session: printed.row.session,
                code: printed.row.code,
                name: printed.row.name,
            })
            .collect();
        PrintTablePage {
            title,
            header: PLAN_HEADER,
            rows,
            total: format_units(plan.iter().map(|r| r.units).sum()),
        }
        .render()
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, ctx: &ReportContext, kind: ReportKind) -> Result<String, Box<dyn Error>> {
        let html = match ctx.table(kind) {
            Some(table) => Self::table_html(kind.title(), table)?,
            None => Self::plan_html(kind.title(), &ctx.plan)?,
        };
        Ok(html)
    }
}
