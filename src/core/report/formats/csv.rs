//! CSV report generator

use crate::core::report::crosstab::CrossTab;
use crate::core::report::{PlanRow, ReportContext, ReportGenerator, ReportKind, PLAN_HEADER};
use std::error::Error;

/// CSV report generator
pub struct CsvReporter;

impl CsvReporter {
    /// Create a new CSV reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn plan_csv(rows: &[PlanRow]) -> Result<String, Box<dyn Error>> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(PLAN_HEADER)?;
        for row in rows {
            writer.write_record(row.record())?;
        }
        finish(writer)
    }

    fn table_csv(table: &CrossTab) -> Result<String, Box<dyn Error>> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(table.header())?;
        for record in table.records() {
            writer.write_record(&record)?;
        }
        if let Some(footer) = table.footer() {
            writer.write_record(&footer)?;
        }
        finish(writer)
    }
}

fn finish(writer: ::csv::Writer<Vec<u8>>) -> Result<String, Box<dyn Error>> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn render(&self, ctx: &ReportContext, kind: ReportKind) -> Result<String, Box<dyn Error>> {
        match ctx.table(kind) {
            Some(table) => Self::table_csv(table),
            None => Self::plan_csv(&ctx.plan),
        }
    }
}
