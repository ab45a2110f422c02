//! Parser for pasted academic transcript text
//!
//! A transcript lists results as a `<Session>, <Year>` line, the course code on
//! a following line and, once graded, the mark. Everything else (titles, unit
//! counts, grade letters, headers) is noise and skipped.

use super::ordering::DEFAULT_SESSIONS;
use crate::core::models::course::is_course_code;
use regex::Regex;
use std::sync::LazyLock;

static SESSION_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<session>[A-Za-z ]+), (?P<year>20[0-9]{2})$")
        .expect("Invalid session/year pattern")
});

static MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{1,2}|100)$").expect("Invalid mark pattern"));

/// One result recovered from a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    /// Year label (e.g., "2019")
    pub year: String,
    /// Session label (e.g., "First Semester")
    pub session: String,
    /// Course code
    pub code: String,
    /// Mark, when the transcript shows one
    pub mark: Option<f64>,
}

/// Split a `<Session>, <Year>` line; only the default session labels are recognised
fn session_year(line: &str) -> Option<(String, String)> {
    let caps = SESSION_YEAR.captures(line)?;
    let session = caps.name("session")?.as_str();
    if !DEFAULT_SESSIONS.contains(&session) {
        return None;
    }
    Some((session.to_string(), caps.name("year")?.as_str().to_string()))
}

fn mark(line: &str) -> Option<f64> {
    MARK.is_match(line).then(|| line.parse().ok()).flatten()
}

/// Extract transcript entries from pasted text, in the order they appear.
///
/// A session line only yields an entry when the next relevant line is a course
/// code; the mark is taken from the relevant line after the code, if it is one.
#[must_use]
pub fn parse_transcript(text: &str) -> Vec<TranscriptEntry> {
    let relevant: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| session_year(line).is_some() || mark(line).is_some() || is_course_code(line))
        .collect();

    let mut entries = Vec::new();
    for (idx, line) in relevant.iter().enumerate() {
        let Some((session, year)) = session_year(line) else {
            continue;
        };
        let Some(code) = relevant.get(idx + 1).filter(|l| is_course_code(l)) else {
            continue;
        };
        let mark = relevant.get(idx + 2).and_then(|l| mark(l));
        entries.push(TranscriptEntry {
            year,
            session,
            code: (*code).to_string(),
            mark,
        });
    }
    entries
}
