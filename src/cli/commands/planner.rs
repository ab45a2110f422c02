//! Planner command handlers: years, sessions, courses and cached plans

use super::{check_code, check_mark, load_catalog, open_store, Store};
use crate::args::{CourseAction, PlanAction, SessionAction, YearAction};
use degree_planner::config::Config;
use degree_planner::core::catalog::{Catalog, CourseQuery, ReferenceCatalog};
use degree_planner::core::grades::grade_from_mark;
use degree_planner::core::planner::{parse_transcript, DirectorySource, StoreError};
use degree_planner::{info, verbose, warn};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn fail(what: &str, err: &StoreError) -> String {
    format!("✗ {what}: {err}")
}

fn open(config: &Config) -> Result<(Catalog, Store), String> {
    let catalog = load_catalog(config)?;
    let store = open_store(config, &catalog)?;
    Ok((catalog, store))
}

/// Print the plan tree with catalog names and grades
pub fn show(config: &Config) -> Result<(), String> {
    let (catalog, store) = open(config)?;
    if store.years().is_empty() {
        println!("No years planned yet. Add one with `degreeplanner year add <YEAR>`.");
        return Ok(());
    }

    for year in store.years() {
        println!("{} (catalog {})", year.name, year.data_source);
        for session in &year.sessions {
            println!("  {}", session.name);
            for course in &session.courses {
                let name = catalog
                    .course(&year.data_source, &course.code)
                    .map_or("(not in catalog)", |c| c.name.as_str());
                let units = store.units_for(year, &course.code, &catalog);
                let result = course.mark.map_or_else(String::new, |m| {
                    format!("  {m} {}", grade_from_mark(&m.to_string()))
                });
                println!("    {:<9} {name} [{units}]{result}", course.code);
            }
        }
        for plan in &year.plans {
            println!("  * {} {}", plan.kind, plan.code);
        }
    }
    Ok(())
}

/// Handle `year` actions
pub fn year(action: YearAction, config: &Config) -> Result<(), String> {
    let (_, mut store) = open(config)?;
    match action {
        YearAction::Add { name, catalog_year } => {
            store
                .add_year(&name, catalog_year.as_deref())
                .map_err(|e| fail(&format!("Cannot add {name}"), &e))?;
            let source = store.data_source(&name).unwrap_or_default();
            println!("✓ Added {name} (catalog {source})");
        }
        YearAction::Remove { name } => {
            store
                .remove_year(&name)
                .map_err(|e| fail(&format!("Cannot remove {name}"), &e))?;
            println!("✓ Removed {name}");
        }
        YearAction::Options => {
            let range = config
                .planner
                .year_options()
                .ok_or_else(|| "✗ No year range configured (set first_year and last_year)".to_string())?;
            for option in store.new_year_options(range) {
                println!("{option}");
            }
        }
    }
    Ok(())
}

/// Handle `session` actions
pub fn session(action: SessionAction, config: &Config) -> Result<(), String> {
    let (_, mut store) = open(config)?;
    match action {
        SessionAction::Add {
            year,
            name,
            create_year,
        } => {
            store
                .add_session(&year, &name, create_year)
                .map_err(|e| fail(&format!("Cannot add {name} to {year}"), &e))?;
            println!("✓ Added {name} to {year}");
        }
        SessionAction::Remove { year, name } => {
            store
                .remove_session(&year, &name)
                .map_err(|e| fail(&format!("Cannot remove {name} from {year}"), &e))?;
            println!("✓ Removed {name} from {year}");
        }
        SessionAction::Options { year } => {
            let options = store
                .new_session_options(&year)
                .map_err(|e| fail(&year, &e))?;
            for option in options {
                println!("{option}");
            }
        }
    }
    Ok(())
}

/// Handle `course` actions
pub fn course(action: CourseAction, config: &Config) -> Result<(), String> {
    let (catalog, mut store) = open(config)?;
    match action {
        CourseAction::Add {
            year,
            session,
            code,
            mark,
            force,
        } => {
            check_code(&code)?;
            check_mark(mark)?;
            store
                .add_course(&year, &session, &code, force, mark)
                .map_err(|e| fail(&format!("Cannot plan {code} in {year} {session}"), &e))?;
            println!("✓ Planned {code} in {year} {session}");
            match store.is_course_available_in_session(&year, &session, &code, &catalog) {
                Ok(true) => verbose!("  {code} is offered in {session}"),
                Ok(false) => println!("! {code} is not listed as offered in {session}"),
                Err(e) => warn!("{e}"),
            }
        }
        CourseAction::Remove {
            year,
            session,
            code,
        } => {
            store
                .remove_course(&year, &session, &code)
                .map_err(|e| fail(&format!("Cannot remove {code}"), &e))?;
            println!("✓ Removed {code} from {year} {session}");
        }
        CourseAction::Mark {
            year,
            session,
            code,
            mark,
        } => {
            check_mark(mark)?;
            store
                .set_mark(&year, &session, &code, mark)
                .map_err(|e| fail(&format!("Cannot mark {code}"), &e))?;
            match mark {
                Some(m) => println!("✓ {code}: {m} ({})", grade_from_mark(&m.to_string())),
                None => println!("✓ Cleared mark for {code}"),
            }
        }
        CourseAction::Info { year, code } => {
            let details = store
                .course_details(&year, &code, &catalog)
                .map_err(|e| format!("✗ {e}"))?;
            println!("{} {}", details.code, details.name);
            println!("  Level:    {}", details.level_band);
            println!("  Units:    {}", details.unit_weight);
            println!("  Sessions: {}", details.sessions_offered.join(", "));
        }
        CourseAction::Search {
            year,
            sessions,
            faculties,
            levels,
        } => {
            let source = store
                .data_source(&year)
                .map_err(|e| fail(&year, &e))?
                .to_string();
            let query = CourseQuery {
                sessions,
                faculties,
                careers: levels,
            };
            let found = catalog.search_courses(&source, &query);
            for course in &found {
                println!("{:<9} {}", course.code, course.name);
            }
            info!("{} course(s) matched in the {source} catalog", found.len());
        }
    }
    Ok(())
}

/// Handle `plan` actions
pub fn plan(action: PlanAction, config: &Config) -> Result<(), String> {
    let (catalog, mut store) = open(config)?;
    match action {
        PlanAction::Show { year, code, kind } => {
            let cached = store.is_plan_cached(&year, &code);
            let source = DirectorySource::new(&config.paths.plans_dir);
            let payload = store
                .plan_payload_or_fetch(&year, &code, kind, &source)
                .map_err(|e| format!("✗ {e}"))?;
            let name = store
                .data_source(&year)
                .ok()
                .and_then(|src| catalog.plans(src).iter().find(|p| p.code == code))
                .map_or_else(String::new, |p| format!(" {}", p.name));
            println!("{kind} {code}{name}{}", if cached { " (cached)" } else { "" });
            println!("{payload}");
        }
        PlanAction::List => {
            for (year, plan) in store.cached_plans() {
                println!("{year}  {:<8} {}", plan.kind.to_string(), plan.code);
            }
        }
        PlanAction::Reset => {
            store.reset_plan_cache().map_err(|e| format!("✗ {e}"))?;
            println!("✓ Plan cache cleared");
        }
    }
    Ok(())
}

/// Sort years and sessions chronologically
pub fn sort(config: &Config) -> Result<(), String> {
    let (_, mut store) = open(config)?;
    store.sort_store().map_err(|e| format!("✗ {e}"))?;
    println!("✓ Plan sorted");
    Ok(())
}

/// Report whether `code` is planned at or before `year`/`session`
pub fn completed(year: &str, session: &str, code: &str, config: &Config) -> Result<(), String> {
    let (_, store) = open(config)?;
    if store.is_course_completed(year, session, code) {
        println!("✓ {code} is completed by {year} {session}");
    } else {
        println!("✗ {code} is not completed by {year} {session}");
    }
    Ok(())
}

fn read_input(file: &Path) -> io::Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(file)
    }
}

/// Import transcript results into the plan
pub fn import(file: &Path, config: &Config) -> Result<(), String> {
    let text = read_input(file)
        .map_err(|e| format!("✗ Failed to read {}: {e}", file.display()))?;
    let entries = parse_transcript(&text);
    if entries.is_empty() {
        return Err(format!("✗ No results found in {}", file.display()));
    }
    let (_, mut store) = open(config)?;
    let report = store
        .import_transcript(&entries)
        .map_err(|e| format!("✗ {e}"))?;
    println!(
        "✓ Imported {} result(s); {} already planned",
        report.added, report.skipped
    );
    Ok(())
}
