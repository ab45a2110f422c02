//! The plan store: years → sessions → courses, plus cached plans per year
//!
//! Every mutating operation writes the whole tree through the store's
//! [`PersistenceGateway`] before returning. Expected conditions (missing or
//! duplicate entries) come back as [`StoreError`] kinds; the store never panics
//! on user input and does not validate course code format.

use super::fetch::{CacheError, PlanSource};
use super::ordering::{compare_points, compare_sessions, compare_years, DEFAULT_SESSIONS};
use super::outcome::{Level, Removed, StoreError, StoreResult};
use super::persistence::{PersistError, PersistenceGateway};
use super::summary::DataSummary;
use super::transcript::TranscriptEntry;
use crate::core::catalog::{CatalogCourse, ReferenceCatalog, YearRange, DEFAULT_UNIT_WEIGHT};
use crate::core::grades::{grade_counts_from_marks, GradeCounts};
use crate::core::models::{Course, Plan, PlanDocument, PlanKind, Session, Year};
use crate::{debug, error, warn};
use std::cmp::Ordering;

/// Level band used for codes without a digit in the fifth position
const UNKNOWN_LEVEL: &str = "Other";

/// A planned course with no entry in its year's catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    /// Planned year
    pub year: String,
    /// Planned session
    pub session: String,
    /// Course code
    pub code: String,
    /// Catalog year that was searched
    pub catalog_year: String,
}

/// One session of the plan with its year, as yielded by [`PlanStore::timeline`]
#[derive(Debug, Clone, Copy)]
pub struct TimelineEntry<'a> {
    /// The owning year
    pub year: &'a Year,
    /// The session
    pub session: &'a Session,
}

/// Counts from a transcript import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Courses added
    pub added: usize,
    /// Entries skipped because the course was already planned in that session
    pub skipped: usize,
}

/// In-memory plan tree with write-through persistence
#[derive(Debug)]
pub struct PlanStore<G: PersistenceGateway> {
    document: PlanDocument,
    gateway: G,
    catalog_years: Option<YearRange>,
    default_unit_weight: f64,
}

impl<G: PersistenceGateway> PlanStore<G> {
    /// Create an empty store that commits to `gateway`. Nothing is loaded.
    #[must_use]
    pub const fn new(gateway: G) -> Self {
        Self {
            document: PlanDocument { years: Vec::new() },
            gateway,
            catalog_years: None,
            default_unit_weight: DEFAULT_UNIT_WEIGHT,
        }
    }

    /// Create a store from the gateway's last committed document (empty if none)
    ///
    /// # Errors
    /// Returns an error if the stored document cannot be read or decoded
    pub fn open(mut gateway: G) -> Result<Self, PersistError> {
        let document = gateway.load()?.unwrap_or_default();
        debug!("Loaded plan with {} year(s)", document.years.len());
        Ok(Self {
            document,
            ..Self::new(gateway)
        })
    }

    /// Clamp year data sources into `range` when years are added
    #[must_use]
    pub const fn with_catalog_years(mut self, range: Option<YearRange>) -> Self {
        self.catalog_years = range;
        self
    }

    /// Units assumed for a course the catalog does not know
    #[must_use]
    pub const fn with_default_unit_weight(mut self, weight: f64) -> Self {
        self.default_unit_weight = weight;
        self
    }

    /// The whole tree
    #[must_use]
    pub const fn document(&self) -> &PlanDocument {
        &self.document
    }

    /// Years in store order
    #[must_use]
    pub fn years(&self) -> &[Year] {
        &self.document.years
    }

    /// Look up a year by name
    #[must_use]
    pub fn year(&self, name: &str) -> Option<&Year> {
        self.document.years.iter().find(|y| y.name == name)
    }

    /// The gateway commits go to
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Write the current tree through the gateway.
    ///
    /// Mutations call this themselves; call it directly to retry after a failed commit.
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] if the gateway rejects the document
    pub fn commit(&mut self) -> StoreResult<()> {
        self.gateway.commit(&self.document).map_err(|e| {
            error!("Failed to commit plan: {e}");
            StoreError::from(e)
        })
    }

    // --- lookups -----------------------------------------------------------

    fn year_position(&self, year: &str) -> Option<usize> {
        self.document.years.iter().position(|y| y.name == year)
    }

    fn session_position(&self, year: &str, session: &str) -> StoreResult<(usize, usize)> {
        let yi = self.year_index(year)?;
        let si = self.document.years[yi]
            .session_position(session)
            .ok_or(StoreError::NotFound(Level::Session))?;
        Ok((yi, si))
    }

    fn course_position(
        &self,
        year: &str,
        session: &str,
        code: &str,
    ) -> StoreResult<(usize, usize, usize)> {
        let (yi, si) = self.session_position(year, session)?;
        let ci = self.document.years[yi].sessions[si]
            .course_position(code)
            .ok_or(StoreError::NotFound(Level::Course))?;
        Ok((yi, si, ci))
    }

    /// Position of `year` in store order
    ///
    /// # Errors
    /// `NotFound(Year)`
    pub fn year_index(&self, year: &str) -> StoreResult<usize> {
        self.year_position(year)
            .ok_or(StoreError::NotFound(Level::Year))
    }

    /// Position of `session` within `year`
    ///
    /// # Errors
    /// `NotFound(Year)` or `NotFound(Session)`
    pub fn session_index(&self, year: &str, session: &str) -> StoreResult<usize> {
        self.session_position(year, session).map(|(_, si)| si)
    }

    /// Position of `code` within `year`/`session`
    ///
    /// # Errors
    /// `NotFound` at the first missing level
    pub fn course_index(&self, year: &str, session: &str, code: &str) -> StoreResult<usize> {
        self.course_position(year, session, code)
            .map(|(_, _, ci)| ci)
    }

    /// The planned course at `year`/`session`/`code`
    ///
    /// # Errors
    /// `NotFound` at the first missing level
    pub fn course(&self, year: &str, session: &str, code: &str) -> StoreResult<&Course> {
        let (yi, si, ci) = self.course_position(year, session, code)?;
        Ok(&self.document.years[yi].sessions[si].courses[ci])
    }

    /// Whether `year` has no sessions
    ///
    /// # Errors
    /// `NotFound(Year)`
    pub fn is_year_empty(&self, year: &str) -> StoreResult<bool> {
        let yi = self.year_index(year)?;
        Ok(self.document.years[yi].is_empty())
    }

    /// Whether `year`/`session` has no courses
    ///
    /// # Errors
    /// `NotFound(Year)` or `NotFound(Session)`
    pub fn is_session_empty(&self, year: &str, session: &str) -> StoreResult<bool> {
        let (yi, si) = self.session_position(year, session)?;
        Ok(self.document.years[yi].sessions[si].is_empty())
    }

    /// Year names in store order (not necessarily sorted)
    pub fn current_years(&self) -> impl Iterator<Item = &str> + '_ {
        self.document.years.iter().map(|y| y.name.as_str())
    }

    /// Catalog year used for `year`
    ///
    /// # Errors
    /// `NotFound(Year)`
    pub fn data_source(&self, year: &str) -> StoreResult<&str> {
        let yi = self.year_index(year)?;
        Ok(&self.document.years[yi].data_source)
    }

    /// Years of `range` that are not yet in the store
    #[must_use]
    pub fn new_year_options(&self, range: YearRange) -> Vec<String> {
        range
            .labels()
            .filter(|label| self.year_position(label).is_none())
            .collect()
    }

    /// Default session labels not yet used in `year`
    ///
    /// # Errors
    /// `NotFound(Year)`
    pub fn new_session_options(&self, year: &str) -> StoreResult<Vec<&'static str>> {
        let yi = self.year_index(year)?;
        let existing = &self.document.years[yi];
        Ok(DEFAULT_SESSIONS
            .iter()
            .copied()
            .filter(|s| existing.session_position(s).is_none())
            .collect())
    }

    // --- year / session / course mutations -----------------------------------

    fn insert_year(&mut self, name: &str, data_source: Option<&str>) -> usize {
        let requested = data_source.unwrap_or(name);
        let source = self
            .catalog_years
            .map_or_else(|| requested.to_string(), |range| range.clamp(requested));
        debug!("Adding year {name} (catalog {source})");
        self.document
            .years
            .push(Year::new(name.to_string(), source));
        self.document.years.len() - 1
    }

    fn insert_session(&mut self, yi: usize, name: &str) -> usize {
        let year = &mut self.document.years[yi];
        debug!("Adding session {name} to {}", year.name);
        year.sessions.push(Session::new(name.to_string()));
        year.sessions.len() - 1
    }

    /// Add an empty year. `data_source` defaults to the year name and is clamped
    /// into the catalog range. Returns the new position.
    ///
    /// # Errors
    /// `AlreadyExists(Year)`, or `Persist` if the commit fails
    pub fn add_year(&mut self, name: &str, data_source: Option<&str>) -> StoreResult<usize> {
        if self.year_position(name).is_some() {
            return Err(StoreError::AlreadyExists(Level::Year));
        }
        let pos = self.insert_year(name, data_source);
        self.commit()?;
        Ok(pos)
    }

    /// Remove a year with all its sessions, courses and cached plans
    ///
    /// # Errors
    /// `NotFound(Year)`, or `Persist` if the commit fails
    pub fn remove_year(&mut self, name: &str) -> StoreResult<Removed> {
        let yi = self.year_index(name)?;
        let removed = self.document.years.remove(yi);
        debug!(
            "Removed year {name} ({} course(s), {} plan(s))",
            removed.course_count(),
            removed.plans.len()
        );
        self.commit()?;
        Ok(Removed(Level::Year))
    }

    /// Add an empty session to `year`, creating the year first when
    /// `force_create_year` is set. Any label is accepted. Returns the new position.
    ///
    /// # Errors
    /// `NotFound(Year)`, `AlreadyExists(Session)`, or `Persist` if the commit fails
    pub fn add_session(
        &mut self,
        year: &str,
        name: &str,
        force_create_year: bool,
    ) -> StoreResult<usize> {
        let yi = match self.year_position(year) {
            Some(yi) => {
                if self.document.years[yi].session_position(name).is_some() {
                    return Err(StoreError::AlreadyExists(Level::Session));
                }
                yi
            }
            None if force_create_year => self.insert_year(year, None),
            None => return Err(StoreError::NotFound(Level::Year)),
        };
        let pos = self.insert_session(yi, name);
        self.commit()?;
        Ok(pos)
    }

    /// Remove a session and its courses
    ///
    /// # Errors
    /// `NotFound(Year)`, `NotFound(Session)`, or `Persist` if the commit fails
    pub fn remove_session(&mut self, year: &str, name: &str) -> StoreResult<Removed> {
        let (yi, si) = self.session_position(year, name)?;
        self.document.years[yi].sessions.remove(si);
        debug!("Removed session {name} from {year}");
        self.commit()?;
        Ok(Removed(Level::Session))
    }

    /// Plan `code` in `year`/`session`. With `force_create` the missing year and
    /// session are created; without it nothing changes when either is missing.
    /// The same code may be planned in different sessions. Returns the new position.
    ///
    /// # Errors
    /// `NotFound(Year)`, `NotFound(Session)`, `AlreadyExists(Course)`, or `Persist`
    pub fn add_course(
        &mut self,
        year: &str,
        session: &str,
        code: &str,
        force_create: bool,
        mark: Option<f64>,
    ) -> StoreResult<usize> {
        let pos = self.insert_course(year, session, code, force_create, mark)?;
        self.commit()?;
        Ok(pos)
    }

    fn insert_course(
        &mut self,
        year: &str,
        session: &str,
        code: &str,
        force_create: bool,
        mark: Option<f64>,
    ) -> StoreResult<usize> {
        let year_pos = self.year_position(year);
        let session_pos =
            year_pos.and_then(|yi| self.document.years[yi].session_position(session));

        match (year_pos, session_pos) {
            (Some(yi), Some(si)) if self.document.years[yi].sessions[si].contains(code) => {
                return Err(StoreError::AlreadyExists(Level::Course));
            }
            (None, _) if !force_create => return Err(StoreError::NotFound(Level::Year)),
            (Some(_), None) if !force_create => {
                return Err(StoreError::NotFound(Level::Session))
            }
            _ => {}
        }

        let yi = year_pos.unwrap_or_else(|| self.insert_year(year, None));
        let si = session_pos.unwrap_or_else(|| self.insert_session(yi, session));
        let courses = &mut self.document.years[yi].sessions[si].courses;
        courses.push(Course::with_mark(code.to_string(), mark));
        debug!("Planned {code} in {year} {session}");
        Ok(courses.len() - 1)
    }

    /// Remove a planned course
    ///
    /// # Errors
    /// `NotFound` at the first missing level, or `Persist` if the commit fails
    pub fn remove_course(&mut self, year: &str, session: &str, code: &str) -> StoreResult<Removed> {
        let (yi, si, ci) = self.course_position(year, session, code)?;
        self.document.years[yi].sessions[si].courses.remove(ci);
        debug!("Removed {code} from {year} {session}");
        self.commit()?;
        Ok(Removed(Level::Course))
    }

    /// Record (or clear, with `None`) the mark of a planned course
    ///
    /// # Errors
    /// `NotFound` at the first missing level, or `Persist` if the commit fails
    pub fn set_mark(
        &mut self,
        year: &str,
        session: &str,
        code: &str,
        mark: Option<f64>,
    ) -> StoreResult<()> {
        let (yi, si, ci) = self.course_position(year, session, code)?;
        self.document.years[yi].sessions[si].courses[ci].mark = mark;
        self.commit()
    }

    /// Mark of a planned course (`None` while ungraded)
    ///
    /// # Errors
    /// `NotFound` at the first missing level
    pub fn get_mark(&self, year: &str, session: &str, code: &str) -> StoreResult<Option<f64>> {
        self.course(year, session, code).map(|c| c.mark)
    }

    /// Reorder years by name and sessions chronologically within each year
    ///
    /// # Errors
    /// `Persist` if the commit fails
    pub fn sort_store(&mut self) -> StoreResult<()> {
        self.document
            .years
            .sort_by(|a, b| compare_years(&a.name, &b.name));
        for year in &mut self.document.years {
            year.sessions
                .sort_by(|a, b| compare_sessions(&a.name, &b.name));
        }
        self.commit()
    }

    /// Load transcript results, creating years and sessions as needed.
    /// Results already planned in the same session are skipped. Commits once.
    ///
    /// # Errors
    /// `Persist` if the commit fails
    pub fn import_transcript(&mut self, entries: &[TranscriptEntry]) -> StoreResult<ImportReport> {
        let mut report = ImportReport::default();
        for entry in entries {
            match self.insert_course(&entry.year, &entry.session, &entry.code, true, entry.mark) {
                Ok(_) => report.added += 1,
                Err(e) if e.is_already_exists(Level::Course) => report.skipped += 1,
                Err(e) => return Err(e),
            }
        }
        self.commit()?;
        Ok(report)
    }

    // --- queries -------------------------------------------------------------

    /// Sessions in chronological order (years by name, sessions by the calendar table)
    #[must_use]
    pub fn timeline(&self) -> Vec<TimelineEntry<'_>> {
        let mut entries: Vec<_> = self
            .document
            .years
            .iter()
            .flat_map(|year| {
                year.sessions
                    .iter()
                    .map(move |session| TimelineEntry { year, session })
            })
            .collect();
        entries.sort_by(|a, b| {
            compare_years(&a.year.name, &b.year.name)
                .then_with(|| compare_sessions(&a.session.name, &b.session.name))
        });
        entries
    }

    /// Whether `code` is planned in any session at or before `by_year`/`by_session`.
    ///
    /// Sessions earlier in the same year, and the target session itself, count;
    /// later sessions of the same year do not.
    #[must_use]
    pub fn is_course_completed(&self, by_year: &str, by_session: &str, code: &str) -> bool {
        self.document.years.iter().any(|year| {
            year.sessions.iter().any(|session| {
                compare_points((year.name.as_str(), session.name.as_str()), (by_year, by_session))
                    != Ordering::Greater
                    && session.contains(code)
            })
        })
    }

    /// Catalog metadata for a course planned (or about to be planned) in `year`
    ///
    /// # Errors
    /// `NotFound(Year)` or `CatalogEntryMissing`
    pub fn course_details<'c, C: ReferenceCatalog>(
        &self,
        year: &str,
        code: &str,
        catalog: &'c C,
    ) -> StoreResult<&'c CatalogCourse> {
        let source = self.data_source(year)?;
        catalog
            .course(source, code)
            .ok_or_else(|| StoreError::CatalogEntryMissing {
                code: code.to_string(),
                catalog_year: source.to_string(),
            })
    }

    /// Whether the catalog lists `session` among the sessions `code` runs in
    ///
    /// # Errors
    /// `NotFound(Year)` or `CatalogEntryMissing`
    pub fn is_course_available_in_session<C: ReferenceCatalog>(
        &self,
        year: &str,
        session: &str,
        code: &str,
        catalog: &C,
    ) -> StoreResult<bool> {
        Ok(self.course_details(year, code, catalog)?.is_offered_in(session))
    }

    /// Every planned course that its year's catalog does not list
    #[must_use]
    pub fn missing_catalog_entries<C: ReferenceCatalog>(&self, catalog: &C) -> Vec<MissingEntry> {
        let mut missing = Vec::new();
        for year in &self.document.years {
            for session in &year.sessions {
                for course in &session.courses {
                    if catalog.course(&year.data_source, &course.code).is_none() {
                        missing.push(MissingEntry {
                            year: year.name.clone(),
                            session: session.name.clone(),
                            code: course.code.clone(),
                            catalog_year: year.data_source.clone(),
                        });
                    }
                }
            }
        }
        if !missing.is_empty() {
            warn!("{} planned course(s) not found in the catalog", missing.len());
        }
        missing
    }

    /// Units of a planned course, falling back to the default weight
    #[must_use]
    pub fn units_for<C: ReferenceCatalog>(&self, year: &Year, code: &str, catalog: &C) -> f64 {
        catalog
            .course(&year.data_source, code)
            .map_or(self.default_unit_weight, |c| c.unit_weight)
    }

    /// Units planned by (level band, faculty) and by (year, session)
    #[must_use]
    pub fn data_summary<C: ReferenceCatalog>(&self, catalog: &C) -> DataSummary {
        let mut summary = DataSummary::default();
        for year in &self.document.years {
            for session in &year.sessions {
                for course in &session.courses {
                    let units = self.units_for(year, &course.code, catalog);
                    let level = course
                        .level_band()
                        .unwrap_or_else(|| UNKNOWN_LEVEL.to_string());
                    summary.by_level.add(&level, &course.faculty(), units);
                    summary.by_session.add(&year.name, &session.name, units);
                }
            }
        }
        summary
    }

    /// Every recorded mark, in store order
    #[must_use]
    pub fn marks(&self) -> Vec<f64> {
        self.courses().filter_map(|c| c.mark).collect()
    }

    /// HD/D/C/P/N tally of the recorded marks
    #[must_use]
    pub fn grade_counts(&self) -> GradeCounts {
        grade_counts_from_marks(&self.marks())
    }

    /// Number of planned courses without a mark
    #[must_use]
    pub fn ungraded_count(&self) -> usize {
        self.courses().filter(|c| c.mark.is_none()).count()
    }

    fn courses(&self) -> impl Iterator<Item = &Course> {
        self.document
            .years
            .iter()
            .flat_map(|y| &y.sessions)
            .flat_map(|s| &s.courses)
    }

    // --- plan cache ----------------------------------------------------------

    /// Position of the cached plan `code` within `year`
    ///
    /// # Errors
    /// `NotFound(Year)` or `NotFound(Plan)`
    pub fn plan_index(&self, year: &str, code: &str) -> StoreResult<usize> {
        let yi = self.year_index(year)?;
        self.document.years[yi]
            .plan_position(code)
            .ok_or(StoreError::NotFound(Level::Plan))
    }

    /// Whether `code` is cached for `year`
    #[must_use]
    pub fn is_plan_cached(&self, year: &str, code: &str) -> bool {
        self.plan_index(year, code).is_ok()
    }

    /// Cache a plan payload for `year`, replacing any earlier entry for `code`.
    /// With `force` a missing year is created. Returns the entry's position.
    ///
    /// # Errors
    /// `NotFound(Year)` without `force`, or `Persist` if the commit fails
    pub fn set_plan_cache(
        &mut self,
        year: &str,
        code: &str,
        kind: PlanKind,
        payload: String,
        force: bool,
    ) -> StoreResult<usize> {
        let yi = match self.year_position(year) {
            Some(yi) => yi,
            None if force => self.insert_year(year, None),
            None => return Err(StoreError::NotFound(Level::Year)),
        };
        let plans = &mut self.document.years[yi].plans;
        let entry = Plan::new(code.to_string(), kind, payload);
        let pos = if let Some(pos) = plans.iter().position(|p| p.code == code) {
            plans[pos] = entry;
            pos
        } else {
            plans.push(entry);
            plans.len() - 1
        };
        debug!("Cached {kind} {code} for {year}");
        self.commit()?;
        Ok(pos)
    }

    /// The cached plan `code` for `year`
    ///
    /// # Errors
    /// `NotFound(Year)` or `NotFound(Plan)`
    pub fn cached_plan(&self, year: &str, code: &str) -> StoreResult<&Plan> {
        let pos = self.plan_index(year, code)?;
        let yi = self.year_index(year)?;
        Ok(&self.document.years[yi].plans[pos])
    }

    /// Every cached plan with its year
    #[must_use]
    pub fn cached_plans(&self) -> Vec<(&str, &Plan)> {
        self.document
            .years
            .iter()
            .flat_map(|y| y.plans.iter().map(move |p| (y.name.as_str(), p)))
            .collect()
    }

    /// Drop every cached plan
    ///
    /// # Errors
    /// `Persist` if the commit fails
    pub fn reset_plan_cache(&mut self) -> StoreResult<()> {
        for year in &mut self.document.years {
            year.plans.clear();
        }
        self.commit()
    }

    /// Cached payload for `code`, fetching it from `source` on a miss.
    ///
    /// A fetched payload is cached (creating the year if needed) before it is
    /// returned; a failed fetch caches nothing. The source is asked for the
    /// catalog year the planned year resolves to.
    ///
    /// # Errors
    /// `CacheError::Fetch` when the source fails, `CacheError::Store` when caching fails
    pub fn plan_payload_or_fetch<S: PlanSource>(
        &mut self,
        year: &str,
        code: &str,
        kind: PlanKind,
        source: &S,
    ) -> Result<String, CacheError> {
        if let Ok(plan) = self.cached_plan(year, code) {
            return Ok(plan.payload.clone());
        }
        let catalog_year = self.data_source(year).map_or_else(
            |_| {
                self.catalog_years
                    .map_or_else(|| year.to_string(), |range| range.clamp(year))
            },
            str::to_string,
        );
        let payload = source.fetch(&catalog_year, code, kind).map_err(|e| {
            warn!("Plan {code} for {year} not fetched: {e}");
            e
        })?;
        self.set_plan_cache(year, code, kind, payload.clone(), true)?;
        Ok(payload)
    }
}
