//! Unit tallies derived from the plan

/// Two-level tally of units: row label → column label → amount.
///
/// Rows and columns keep first-seen order; per-parent cardinality is small so
/// lookups are linear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    rows: Vec<(String, Vec<(String, f64)>)>,
}

impl Tally {
    /// Create an empty tally
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the cell at (`row`, `column`)
    pub fn add(&mut self, row: &str, column: &str, amount: f64) {
        let cells = if let Some(pos) = self.rows.iter().position(|(r, _)| r == row) {
            &mut self.rows[pos].1
        } else {
            self.rows.push((row.to_string(), Vec::new()));
            let last = self.rows.len() - 1;
            &mut self.rows[last].1
        };
        if let Some(cell) = cells.iter_mut().find(|(c, _)| c == column) {
            cell.1 += amount;
        } else {
            cells.push((column.to_string(), amount));
        }
    }

    /// Amount at (`row`, `column`), if that cell was ever touched
    #[must_use]
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|(r, _)| r == row)?
            .1
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, amount)| *amount)
    }

    /// Row labels in first-seen order
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(r, _)| r.as_str())
    }

    /// Column labels across all rows in first-seen order
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for (column, _) in self.rows.iter().flat_map(|(_, cells)| cells) {
            if !columns.contains(&column.as_str()) {
                columns.push(column);
            }
        }
        columns
    }

    /// Sum of one row (0 for an unknown row)
    #[must_use]
    pub fn row_total(&self, row: &str) -> f64 {
        self.rows
            .iter()
            .find(|(r, _)| r == row)
            .map_or(0.0, |(_, cells)| cells.iter().map(|(_, a)| a).sum())
    }

    /// Sum of every cell
    #[must_use]
    pub fn total(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|(_, cells)| cells)
            .map(|(_, a)| a)
            .sum()
    }

    /// True when no cell was ever added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Units planned, grouped two ways
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSummary {
    /// Level band ("1000", "2000", ...) → faculty prefix → units
    pub by_level: Tally,
    /// Year → session → units
    pub by_session: Tally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut tally = Tally::new();
        assert!(tally.is_empty());

        tally.add("1000", "COMP", 6.0);
        tally.add("1000", "MATH", 6.0);
        tally.add("2000", "COMP", 6.0);
        tally.add("1000", "COMP", 12.0);

        assert_eq!(tally.get("1000", "COMP"), Some(18.0));
        assert_eq!(tally.get("2000", "MATH"), None);
        assert_eq!(tally.rows().collect::<Vec<_>>(), vec!["1000", "2000"]);
        assert_eq!(tally.columns(), vec!["COMP", "MATH"]);
        assert!((tally.row_total("1000") - 24.0).abs() < f64::EPSILON);
        assert!((tally.total() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_columns_first_seen_across_rows() {
        let mut tally = Tally::new();
        tally.add("2020", "Second Semester", 6.0);
        tally.add("2021", "First Semester", 6.0);
        tally.add("2021", "Second Semester", 6.0);
        assert_eq!(tally.columns(), vec!["Second Semester", "First Semester"]);
    }
}
