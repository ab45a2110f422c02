//! Integration tests for the plan store

use degree_planner::core::catalog::{Catalog, CatalogCourse, YearRange};
use degree_planner::core::grades::graded_count;
use degree_planner::core::models::{PlanDocument, PlanKind};
use degree_planner::core::planner::{
    parse_transcript, CacheError, FetchError, JsonFileGateway, Level, MemoryGateway, PersistError,
    PersistenceGateway, PlanSource, PlanStore, StoreError,
};
use std::cell::Cell;
use std::collections::BTreeSet;
use tempfile::TempDir;

fn memory_store() -> PlanStore<MemoryGateway> {
    PlanStore::new(MemoryGateway::new())
}

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert_course(
        "2020",
        CatalogCourse::new(
            "COMP1100",
            "Programming as Problem Solving",
            &["First Semester", "Second Semester"],
            6.0,
        ),
    );
    catalog.insert_course(
        "2020",
        CatalogCourse::new("COMP2300", "Computer Organisation", &["First Semester"], 12.0),
    );
    catalog
}

/// Gateway whose commits always fail
struct ReadOnlyGateway;

impl PersistenceGateway for ReadOnlyGateway {
    fn load(&mut self) -> Result<Option<PlanDocument>, PersistError> {
        Ok(None)
    }

    fn commit(&mut self, _document: &PlanDocument) -> Result<(), PersistError> {
        Err(PersistError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

/// Plan source that counts calls and only knows one plan
struct CountingSource {
    calls: Cell<usize>,
}

impl PlanSource for CountingSource {
    fn fetch(&self, year: &str, code: &str, kind: PlanKind) -> Result<String, FetchError> {
        self.calls.set(self.calls.get() + 1);
        if code == "COMP-MAJ" {
            Ok(format!("<p>{code} requirements for {year}</p>"))
        } else {
            Err(FetchError::NotAvailable {
                year: year.to_string(),
                code: code.to_string(),
                kind,
            })
        }
    }
}

#[test]
fn test_year_sequence_matches_set_model() {
    let mut store = memory_store();
    let mut model = BTreeSet::new();

    // Deterministic pseudo-random add/remove sequence over a small name pool
    let mut seed: u32 = 17;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let name = format!("20{:02}", (seed >> 8) % 8);
        if (seed >> 4) % 3 == 0 {
            let removed = store.remove_year(&name);
            assert_eq!(removed.is_ok(), model.remove(&name));
        } else {
            let added = store.add_year(&name, None);
            if model.insert(name.clone()) {
                assert!(added.is_ok());
            } else {
                assert!(added.unwrap_err().is_already_exists(Level::Year));
            }
        }

        let current: Vec<&str> = store.current_years().collect();
        let unique: BTreeSet<&str> = current.iter().copied().collect();
        assert_eq!(unique.len(), current.len(), "duplicate year names coexist");
        assert_eq!(unique, model.iter().map(String::as_str).collect());
    }
}

#[test]
fn test_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("plan.json");

    let mut store = PlanStore::new(JsonFileGateway::new(&path));
    store
        .add_course("2020", "First Semester", "COMP1100", true, Some(85.0))
        .unwrap();
    store
        .add_course("2020", "Winter Session", "MATH1013", true, None)
        .unwrap();
    store
        .set_plan_cache("2020", "COMP-MAJ", PlanKind::Major, "<ul/>".to_string(), true)
        .unwrap();
    let saved = store.document().clone();

    let reopened = PlanStore::open(JsonFileGateway::new(&path)).unwrap();
    assert_eq!(reopened.document(), &saved);
    assert_eq!(
        reopened.get_mark("2020", "First Semester", "COMP1100").unwrap(),
        Some(85.0)
    );
    assert_eq!(reopened.cached_plan("2020", "COMP-MAJ").unwrap().payload, "<ul/>");

    // Saving again without changes reproduces the same file
    let first = std::fs::read_to_string(&path).unwrap();
    let mut again = reopened;
    again.commit().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_document_layout() {
    let mut store = memory_store();
    store
        .add_course("2021", "First Semester", "COMP1100", true, None)
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(store.gateway().contents().unwrap()).unwrap();

    let year = &json["years"][0];
    assert_eq!(year["name"], "2021");
    assert_eq!(year["dataSource"], "2021");
    assert_eq!(year["sessions"][0]["courses"][0]["code"], "COMP1100");
    assert!(year["sessions"][0]["courses"][0]["mark"].is_null());
    assert!(year["plans"].as_array().unwrap().is_empty());
}

#[test]
fn test_completion_order_within_year() {
    let mut store = memory_store();
    store
        .add_course("2020", "First Semester", "COMP1100", true, None)
        .unwrap();
    assert!(store.is_course_completed("2020", "Second Semester", "COMP1100"));
    assert!(store.is_course_completed("2020", "First Semester", "COMP1100"));
    assert!(store.is_course_completed("2021", "First Semester", "COMP1100"));
    assert!(!store.is_course_completed("2019", "Summer Session", "COMP1100"));

    let mut later = memory_store();
    later
        .add_course("2020", "Spring Session", "COMP1100", true, None)
        .unwrap();
    assert!(!later.is_course_completed("2020", "Second Semester", "COMP1100"));
}

#[test]
fn test_completion_with_custom_session_labels() {
    let mut store = memory_store();
    store
        .add_course("2020", "Trimester 3", "COMP1100", true, None)
        .unwrap();
    store.add_session("2020", "Trimester 1", false).unwrap();

    assert!(!store.is_course_completed("2020", "Trimester 1", "COMP1100"));
    assert!(store.is_course_completed("2020", "Trimester 3", "COMP1100"));
    assert!(store.is_course_completed("2021", "Trimester 1", "COMP1100"));

    // Completion agrees with the sorted order
    store.sort_store().unwrap();
    let sessions: Vec<&str> = store.years()[0]
        .sessions
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(sessions, vec!["Trimester 1", "Trimester 3"]);
}

#[test]
fn test_grade_counts_ignore_out_of_range_marks() {
    let mut store = memory_store();
    store
        .add_course("2020", "First Semester", "COMP1100", true, Some(85.0))
        .unwrap();
    store
        .add_course("2020", "First Semester", "MATH1013", true, Some(140.0))
        .unwrap();
    assert_eq!(store.marks().len(), 2);
    assert_eq!(graded_count(&store.grade_counts()), 1);
}

#[test]
fn test_add_course_to_missing_session_leaves_tree_unchanged() {
    let mut store = memory_store();
    store.add_year("2020", None).unwrap();
    let before = store.document().clone();
    let commits = store.gateway().commit_count();

    let err = store
        .add_course("2020", "First Semester", "COMP1100", false, None)
        .unwrap_err();
    assert!(err.is_not_found(Level::Session));
    assert_eq!(store.document(), &before);
    assert_eq!(store.gateway().commit_count(), commits);
}

#[test]
fn test_summary_scenario() {
    let catalog = catalog();
    let mut store = memory_store();
    store.add_year("2020", None).unwrap();
    store.add_session("2020", "First Semester", false).unwrap();
    store
        .add_course("2020", "First Semester", "COMP1100", false, None)
        .unwrap();
    store
        .add_course("2020", "First Semester", "COMP2300", false, None)
        .unwrap();
    store
        .add_course("2020", "First Semester", "ABCD1000", false, None)
        .unwrap();

    let summary = store.data_summary(&catalog);
    assert_eq!(summary.by_session.get("2020", "First Semester"), Some(24.0));
    assert_eq!(summary.by_level.get("1000", "COMP"), Some(6.0));
    assert_eq!(summary.by_level.get("2000", "COMP"), Some(12.0));
    // Missing from the catalog: default weight
    assert_eq!(summary.by_level.get("1000", "ABCD"), Some(6.0));
}

#[test]
fn test_summary_uses_configured_default_weight() {
    let mut store = memory_store().with_default_unit_weight(3.0);
    store
        .add_course("2020", "First Semester", "ZZZZ1000", true, None)
        .unwrap();
    let summary = store.data_summary(&Catalog::new());
    assert_eq!(summary.by_session.get("2020", "First Semester"), Some(3.0));
}

#[test]
fn test_commit_count_tracks_successful_mutations() {
    let mut store = memory_store();
    store.add_year("2020", None).unwrap(); // 1
    store.add_session("2020", "First Semester", false).unwrap(); // 2
    store
        .add_course("2020", "First Semester", "COMP1100", false, None)
        .unwrap(); // 3
    assert!(store.add_year("2020", None).is_err());
    assert!(store.remove_session("2020", "Autumn Session").is_err());
    store
        .set_mark("2020", "First Semester", "COMP1100", Some(60.0))
        .unwrap(); // 4
    store.sort_store().unwrap(); // 5
    store.remove_year("2020").unwrap(); // 6
    assert_eq!(store.gateway().commit_count(), 6);
}

#[test]
fn test_failed_commit_keeps_mutation_and_reports_persist_error() {
    let mut store = PlanStore::new(ReadOnlyGateway);
    let err = store.add_year("2020", None).unwrap_err();
    assert!(matches!(err, StoreError::Persist(_)));
    assert_eq!(err.level(), None);
    // The in-memory tree has the year; a later commit retries
    assert!(store.year("2020").is_some());
    assert!(matches!(store.commit(), Err(StoreError::Persist(_))));
}

#[test]
fn test_catalog_clamping_and_details() {
    let catalog = catalog();
    let mut store = memory_store().with_catalog_years(Some(YearRange::new(2020, 2020)));
    store
        .add_course("2024", "Second Semester", "COMP1100", true, None)
        .unwrap();
    store
        .add_course("2024", "Second Semester", "COMP2300", true, None)
        .unwrap();

    assert_eq!(store.data_source("2024").unwrap(), "2020");
    let details = store.course_details("2024", "COMP1100", &catalog).unwrap();
    assert_eq!(details.name, "Programming as Problem Solving");
    assert!(store
        .is_course_available_in_session("2024", "Second Semester", "COMP1100", &catalog)
        .unwrap());
    assert!(!store
        .is_course_available_in_session("2024", "Second Semester", "COMP2300", &catalog)
        .unwrap());

    let missing = store.course_details("2024", "COMP9999", &catalog).unwrap_err();
    assert!(matches!(
        missing,
        StoreError::CatalogEntryMissing { ref catalog_year, .. } if catalog_year == "2020"
    ));
    assert!(store
        .course_details("2030", "COMP1100", &catalog)
        .unwrap_err()
        .is_not_found(Level::Year));
}

#[test]
fn test_missing_catalog_entries() {
    let catalog = catalog();
    let mut store = memory_store();
    store
        .add_course("2020", "First Semester", "COMP1100", true, None)
        .unwrap();
    store
        .add_course("2020", "First Semester", "HIST1111", true, None)
        .unwrap();
    store
        .add_course("2021", "First Semester", "COMP1100", true, None)
        .unwrap();

    let missing = store.missing_catalog_entries(&catalog);
    let codes: Vec<(&str, &str)> = missing
        .iter()
        .map(|m| (m.year.as_str(), m.code.as_str()))
        .collect();
    // 2021 has no catalog data, so its COMP1100 is missing too
    assert_eq!(codes, vec![("2020", "HIST1111"), ("2021", "COMP1100")]);
}

#[test]
fn test_fetch_through_caches_success_only() {
    let source = CountingSource { calls: Cell::new(0) };
    let mut store = memory_store();

    let payload = store
        .plan_payload_or_fetch("2020", "COMP-MAJ", PlanKind::Major, &source)
        .unwrap();
    assert!(payload.contains("COMP-MAJ"));
    assert!(store.is_plan_cached("2020", "COMP-MAJ"));
    assert_eq!(source.calls.get(), 1);

    // Cache hit: no further fetch
    let again = store
        .plan_payload_or_fetch("2020", "COMP-MAJ", PlanKind::Major, &source)
        .unwrap();
    assert_eq!(again, payload);
    assert_eq!(source.calls.get(), 1);

    // Failure is returned and nothing is cached
    let commits = store.gateway().commit_count();
    let err = store
        .plan_payload_or_fetch("2020", "MATH-MIN", PlanKind::Minor, &source)
        .unwrap_err();
    assert!(matches!(err, CacheError::Fetch(FetchError::NotAvailable { .. })));
    assert!(!store.is_plan_cached("2020", "MATH-MIN"));
    assert_eq!(store.gateway().commit_count(), commits);

    // Retrying asks the source again
    let _ = store.plan_payload_or_fetch("2020", "MATH-MIN", PlanKind::Minor, &source);
    assert_eq!(source.calls.get(), 3);
}

#[test]
fn test_fetch_uses_clamped_catalog_year_for_new_years() {
    let source = CountingSource { calls: Cell::new(0) };
    let mut store = memory_store().with_catalog_years(Some(YearRange::new(2017, 2020)));
    let payload = store
        .plan_payload_or_fetch("2025", "COMP-MAJ", PlanKind::Major, &source)
        .unwrap();
    assert!(payload.ends_with("for 2020</p>"));
    assert_eq!(store.data_source("2025").unwrap(), "2020");
}

#[test]
fn test_import_transcript() {
    let text = "\
Academic Transcript
First Semester, 2019
COMP1100
Programming as Problem Solving
6.00
85
HD
Second Semester, 2019
COMP1110
Structured Programming
6.00
";
    let entries = parse_transcript(text);
    let mut store = memory_store();
    store
        .add_course("2019", "First Semester", "COMP1100", true, Some(85.0))
        .unwrap();
    let commits = store.gateway().commit_count();

    let report = store.import_transcript(&entries).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.gateway().commit_count(), commits + 1);
    assert_eq!(
        store.get_mark("2019", "Second Semester", "COMP1110").unwrap(),
        None
    );
    assert_eq!(store.marks(), vec![85.0]);
    assert_eq!(store.ungraded_count(), 1);
}

#[test]
fn test_timeline_is_chronological() {
    let mut store = memory_store();
    store.add_session("2021", "First Semester", true).unwrap();
    store.add_session("2020", "Summer Session", true).unwrap();
    store.add_session("2020", "Autumn Session", true).unwrap();

    let order: Vec<(&str, &str)> = store
        .timeline()
        .iter()
        .map(|e| (e.year.name.as_str(), e.session.name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("2020", "Autumn Session"),
            ("2020", "Summer Session"),
            ("2021", "First Semester"),
        ]
    );
    // timeline does not reorder the store itself
    assert_eq!(store.current_years().next(), Some("2021"));
}
