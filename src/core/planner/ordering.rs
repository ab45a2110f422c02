//! Session label tables and the orderings built on them

use std::cmp::Ordering;

/// Session labels offered when adding a session, in display order
pub const DEFAULT_SESSIONS: [&str; 6] = [
    "First Semester",
    "Second Semester",
    "Summer Session",
    "Winter Session",
    "Autumn Session",
    "Spring Session",
];

/// Session labels in the order they occur within a calendar year
pub const CHRONOLOGICAL_SESSIONS: [&str; 6] = [
    "First Semester",
    "Autumn Session",
    "Winter Session",
    "Second Semester",
    "Spring Session",
    "Summer Session",
];

/// Position of `session` within the year. Unknown labels rank after every known one.
#[must_use]
pub fn session_rank(session: &str) -> usize {
    CHRONOLOGICAL_SESSIONS
        .iter()
        .position(|s| *s == session)
        .unwrap_or(CHRONOLOGICAL_SESSIONS.len())
}

/// Compare session labels chronologically; unknown labels compare by name after known ones
#[must_use]
pub fn compare_sessions(a: &str, b: &str) -> Ordering {
    session_rank(a)
        .cmp(&session_rank(b))
        .then_with(|| a.cmp(b))
}

/// Compare year labels. Years sort by name, which is chronological for four-digit years.
#[must_use]
pub fn compare_years(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Compare `(year, session)` points in time
#[must_use]
pub fn compare_points(a: (&str, &str), b: (&str, &str)) -> Ordering {
    compare_years(a.0, b.0).then_with(|| compare_sessions(a.1, b.1))
}

/// Compare level bands ("1000", "2000", ...) numerically; non-numeric bands sort last
#[must_use]
pub fn compare_levels(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Plain lexicographic comparison, for use where a comparator is expected
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}
