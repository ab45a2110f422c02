//! GPA and WAM calculations
//!
//! Grade data is carried as a 5-slot count of results per band, highest first:
//! `[HD, D, C, P, N]`. Everything here is a pure function of its inputs.

use std::fmt;
use thiserror::Error;

/// Counts of results per grade band, ordered `[HD, D, C, P, N]`
pub type GradeCounts = [u32; 5];

/// Grade band, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// High Distinction (80+)
    HighDistinction,
    /// Distinction (70–79)
    Distinction,
    /// Credit (60–69)
    Credit,
    /// Pass (50–59)
    Pass,
    /// Fail (below 50)
    Fail,
}

impl Grade {
    /// All bands in slot order
    pub const ALL: [Self; 5] = [
        Self::HighDistinction,
        Self::Distinction,
        Self::Credit,
        Self::Pass,
        Self::Fail,
    ];

    /// Short label (HD, D, C, P, N)
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighDistinction => "HD",
            Self::Distinction => "D",
            Self::Credit => "C",
            Self::Pass => "P",
            Self::Fail => "N",
        }
    }

    /// Grade points on the 7-point scale
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::HighDistinction => 7,
            Self::Distinction => 6,
            Self::Credit => 5,
            Self::Pass => 4,
            Self::Fail => 0,
        }
    }

    /// Slot of this band in a [`GradeCounts`] array
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Band for a numeric mark; `None` when the mark is not a number in 0–100
    #[must_use]
    pub fn from_mark(mark: f64) -> Option<Self> {
        if !(0.0..=100.0).contains(&mark) {
            return None;
        }
        Some(if mark >= 80.0 {
            Self::HighDistinction
        } else if mark >= 70.0 {
            Self::Distinction
        } else if mark >= 60.0 {
            Self::Credit
        } else if mark >= 50.0 {
            Self::Pass
        } else {
            Self::Fail
        })
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display grade for raw mark input. Renders as `""`, a band label, or `"Err"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkGrade {
    /// No mark entered
    Blank,
    /// A valid mark in a band
    Graded(Grade),
    /// Input that is not a mark between 0 and 100
    Invalid,
}

impl fmt::Display for MarkGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Graded(grade) => write!(f, "{grade}"),
            Self::Invalid => f.write_str("Err"),
        }
    }
}

/// Grade label for raw user input.
///
/// Empty input gives [`MarkGrade::Blank`]; anything that does not parse as a
/// number between 0 and 100 gives [`MarkGrade::Invalid`].
#[must_use]
pub fn grade_from_mark(input: &str) -> MarkGrade {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return MarkGrade::Blank;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Grade::from_mark)
        .map_or(MarkGrade::Invalid, MarkGrade::Graded)
}

/// Unformatted GPA for a grade tally; 0 when the tally is empty
#[must_use]
pub fn gpa_value(counts: &GradeCounts) -> f64 {
    if counts.iter().all(|count| *count == 0) {
        return 0.0;
    }
    let total: f64 = counts.iter().copied().map(f64::from).sum();
    let points: f64 = Grade::ALL
        .iter()
        .zip(counts)
        .map(|(grade, count)| f64::from(grade.weight()) * f64::from(*count))
        .sum();
    points / total
}

/// Number of courses a grade tally covers
#[must_use]
pub fn graded_count(counts: &GradeCounts) -> u32 {
    counts.iter().fold(0, |total, count| total.saturating_add(*count))
}

/// GPA for a grade tally, formatted to two decimals ("0.00" when empty)
#[must_use]
pub fn calculate_gpa(counts: &GradeCounts) -> String {
    format!("{:.2}", gpa_value(counts))
}

/// Mean of `marks`, formatted to two decimals ("0.00" when empty)
#[must_use]
pub fn calculate_wam(marks: &[f64]) -> String {
    if marks.is_empty() {
        return "0.00".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = marks.iter().sum::<f64>() / marks.len() as f64;
    format!("{mean:.2}")
}

/// Tally marks into grade bands. Marks outside 0–100 are skipped.
#[must_use]
pub fn grade_counts_from_marks(marks: &[f64]) -> GradeCounts {
    let mut counts = [0; 5];
    for grade in marks.iter().filter_map(|m| Grade::from_mark(*m)) {
        counts[grade.slot()] += 1;
    }
    counts
}

/// Convert raw credit units into whole course slots of `unit_weight` units each
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn course_equivalents(units: f64, unit_weight: f64) -> u32 {
    if unit_weight <= 0.0 || units <= 0.0 {
        return 0;
    }
    (units / unit_weight).floor() as u32
}

/// Errors from [`minimum_grades_for_target`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// The starting tally does not account for exactly the available slots
    #[error("Starting grades cover {actual} courses but {expected} are available")]
    SlotMismatch {
        /// Slots available
        expected: u32,
        /// Slots in the starting tally
        actual: u64,
    },
}

/// Result of the minimum-grade search
#[derive(Debug, Clone, PartialEq)]
pub struct GradeProjection {
    /// Assumed grades for the remaining courses
    pub counts: GradeCounts,
    /// Overall GPA those grades would give
    pub gpa: f64,
    /// Whether the goal is reached
    pub reached: bool,
}

/// Overall GPA if the remaining courses score `counts` on top of the current record
#[must_use]
pub fn blended_gpa(
    counts: &GradeCounts,
    current_gpa: f64,
    units_completed: u32,
    units_available: u32,
) -> f64 {
    if units_completed == 0 && units_available == 0 {
        return 0.0;
    }
    let total = f64::from(units_completed) + f64::from(units_available);
    let future = gpa_value(counts) * f64::from(units_available);
    let past = current_gpa * f64::from(units_completed);
    (future + past) / total
}

/// Find the smallest set of grade upgrades that reaches `goal_gpa`.
///
/// `initial` assigns each of the `units_available` remaining courses a grade
/// (usually all N). Each step upgrades one course from the worst occupied band
/// to the band above, until the blended GPA reaches the goal or every course is
/// already HD. Units are course slots, not credit points.
///
/// # Errors
/// Returns [`GradeError::SlotMismatch`] when `initial` does not sum to `units_available`.
pub fn minimum_grades_for_target(
    initial: GradeCounts,
    goal_gpa: f64,
    current_gpa: f64,
    units_completed: u32,
    units_available: u32,
) -> Result<GradeProjection, GradeError> {
    let actual: u64 = initial.iter().copied().map(u64::from).sum();
    if actual != u64::from(units_available) {
        return Err(GradeError::SlotMismatch {
            expected: units_available,
            actual,
        });
    }

    let mut counts = initial;
    loop {
        let gpa = blended_gpa(&counts, current_gpa, units_completed, units_available);
        if gpa >= goal_gpa {
            return Ok(GradeProjection {
                counts,
                gpa,
                reached: true,
            });
        }
        // Every course already HD: the goal is out of reach.
        let Some(worst) = (1..counts.len()).rev().find(|&slot| counts[slot] > 0) else {
            return Ok(GradeProjection {
                counts,
                gpa,
                reached: false,
            });
        };
        counts[worst] -= 1;
        counts[worst - 1] += 1;
    }
}
