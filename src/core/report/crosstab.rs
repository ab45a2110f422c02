//! Cross-tabulation of a [`Tally`] into a rectangular table
//!
//! Both the CSV and HTML reporters render from the same [`CrossTab`], so the
//! ordering and totals logic lives here only.

use crate::core::planner::Tally;
use std::cmp::Ordering;

/// Comparator for row or column labels
pub type LabelOrder = fn(&str, &str) -> Ordering;

/// Label used for total rows and columns
pub const TOTAL_LABEL: &str = "Total";

/// Which totals to include in a [`CrossTab`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalsOptions {
    /// Append a total column to each row
    pub row_totals: bool,
    /// Append a row of column totals (with the grand total when rows are totalled too)
    pub column_totals: bool,
}

impl TotalsOptions {
    /// Both row and column totals
    pub const ALL: Self = Self {
        row_totals: true,
        column_totals: true,
    };
}

/// One labelled row of a [`CrossTab`]
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTabRow {
    /// Row label
    pub label: String,
    /// Cell values, aligned with [`CrossTab::columns`]; untouched cells are 0
    pub cells: Vec<f64>,
    /// Sum of the row, if row totals were requested
    pub total: Option<f64>,
}

/// Rectangular view of a tally with optional totals
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    corner: String,
    columns: Vec<String>,
    rows: Vec<CrossTabRow>,
    row_totals: bool,
    column_totals: Option<Vec<f64>>,
    grand_total: Option<f64>,
}

impl CrossTab {
    /// Build a table from `tally`.
    ///
    /// Rows and columns keep the tally's first-seen order unless a comparator is given.
    #[must_use]
    pub fn build(
        tally: &Tally,
        corner: &str,
        options: TotalsOptions,
        row_order: Option<LabelOrder>,
        column_order: Option<LabelOrder>,
    ) -> Self {
        let mut row_labels: Vec<&str> = tally.rows().collect();
        if let Some(order) = row_order {
            row_labels.sort_by(|a, b| order(a, b));
        }
        let mut columns = tally.columns();
        if let Some(order) = column_order {
            columns.sort_by(|a, b| order(a, b));
        }

        let rows: Vec<CrossTabRow> = row_labels
            .iter()
            .map(|row| {
                let cells: Vec<f64> = columns
                    .iter()
                    .map(|column| tally.get(row, column).unwrap_or(0.0))
                    .collect();
                CrossTabRow {
                    label: (*row).to_string(),
                    total: options.row_totals.then(|| cells.iter().sum()),
                    cells,
                }
            })
            .collect();

        let column_totals = options.column_totals.then(|| {
            (0..columns.len())
                .map(|i| rows.iter().map(|r| r.cells[i]).sum())
                .collect::<Vec<f64>>()
        });
        let grand_total = (options.row_totals && options.column_totals).then(|| tally.total());

        Self {
            corner: corner.to_string(),
            columns: columns.into_iter().map(str::to_string).collect(),
            rows,
            row_totals: options.row_totals,
            column_totals,
            grand_total,
        }
    }

    /// Label of the top-left cell
    #[must_use]
    pub fn corner(&self) -> &str {
        &self.corner
    }

    /// Column labels in display order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in display order
    #[must_use]
    pub fn rows(&self) -> &[CrossTabRow] {
        &self.rows
    }

    /// Column totals, if requested
    #[must_use]
    pub fn column_totals(&self) -> Option<&[f64]> {
        self.column_totals.as_deref()
    }

    /// Sum of every cell, when both row and column totals were requested
    #[must_use]
    pub const fn grand_total(&self) -> Option<f64> {
        self.grand_total
    }

    /// True when the tally had no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header record: corner, column labels, then "Total" when rows are totalled
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len() + 2);
        header.push(self.corner.clone());
        header.extend(self.columns.iter().cloned());
        if self.row_totals {
            header.push(TOTAL_LABEL.to_string());
        }
        header
    }

    /// Body records with formatted values, one per row
    #[must_use]
    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = vec![row.label.clone()];
                record.extend(row.cells.iter().copied().map(format_units));
                record.extend(row.total.map(format_units));
                record
            })
            .collect()
    }

    /// Column-total record, if requested
    #[must_use]
    pub fn footer(&self) -> Option<Vec<String>> {
        let totals = self.column_totals.as_ref()?;
        let mut record = vec![TOTAL_LABEL.to_string()];
        record.extend(totals.iter().copied().map(format_units));
        record.extend(self.grand_total.map(format_units));
        Some(record)
    }
}

/// Format a unit amount: whole numbers without decimals, others as-is
#[must_use]
pub fn format_units(units: f64) -> String {
    if units.fract() == 0.0 {
        format!("{units:.0}")
    } else {
        format!("{units}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::planner::ordering::{compare_levels, compare_names};

    fn tally() -> Tally {
        let mut tally = Tally::new();
        tally.add("2000", "MATH", 6.0);
        tally.add("1000", "COMP", 6.0);
        tally.add("1000", "MATH", 12.0);
        tally
    }

    #[test]
    fn test_empty_tally_keeps_total_column() {
        let table = CrossTab::build(&Tally::new(), "Year", TotalsOptions::ALL, None, None);
        assert!(table.is_empty());
        assert_eq!(table.header(), vec!["Year", "Total"]);
        assert_eq!(
            table.footer(),
            Some(vec!["Total".to_string(), "0".to_string()])
        );
    }

    #[test]
    fn test_build_with_totals() {
        let table = CrossTab::build(
            &tally(),
            "Level",
            TotalsOptions::ALL,
            Some(compare_levels),
            Some(compare_names),
        );
        assert_eq!(table.header(), vec!["Level", "COMP", "MATH", "Total"]);
        assert_eq!(
            table.records(),
            vec![vec!["1000", "6", "12", "18"], vec!["2000", "0", "6", "6"]]
        );
        assert_eq!(
            table.footer(),
            Some(vec![
                "Total".to_string(),
                "6".to_string(),
                "18".to_string(),
                "24".to_string()
            ])
        );
        assert_eq!(table.grand_total(), Some(24.0));
    }

    #[test]
    fn test_build_without_totals_keeps_first_seen_order() {
        let table = CrossTab::build(&tally(), "Level", TotalsOptions::default(), None, None);
        assert_eq!(table.header(), vec!["Level", "MATH", "COMP"]);
        assert_eq!(table.rows()[0].label, "2000");
        assert_eq!(table.rows()[0].total, None);
        assert!(table.footer().is_none());
        assert!(table.grand_total().is_none());
    }

    #[test]
    fn test_column_totals_only() {
        let options = TotalsOptions {
            row_totals: false,
            column_totals: true,
        };
        let table = CrossTab::build(&tally(), "Level", options, Some(compare_levels), None);
        assert_eq!(table.column_totals(), Some(&[18.0, 6.0][..]));
        assert_eq!(table.footer().map(|f| f.len()), Some(3));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(6.0), "6");
        assert_eq!(format_units(7.5), "7.5");
        assert_eq!(format_units(0.0), "0");
    }
}
