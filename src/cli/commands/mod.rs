//! CLI command handlers for the degree planner.
//!
//! Each handler returns `Err` with a printable `✗ ...` message; `main` prints
//! it and exits non-zero.

pub mod config;
pub mod grades;
pub mod planner;
pub mod report;

use degree_planner::config::Config;
use degree_planner::core::catalog::{Catalog, ReferenceCatalog};
use degree_planner::core::models::course::is_course_code;
use degree_planner::core::planner::{JsonFileGateway, PlanStore};
use degree_planner::{error, info, warn};
use std::path::Path;

/// Store type used by every command
pub type Store = PlanStore<JsonFileGateway>;

/// Load the catalog named in the config; a missing file gives an empty catalog
pub fn load_catalog(config: &Config) -> Result<Catalog, String> {
    let path = Path::new(&config.paths.catalog_file);
    if config.paths.catalog_file.is_empty() || !path.exists() {
        warn!(
            "No catalog at '{}'; course details are unavailable",
            config.paths.catalog_file
        );
        return Ok(Catalog::new());
    }
    let catalog = Catalog::load(path).map_err(|e| {
        error!("Failed to load catalog {}: {e}", path.display());
        format!("✗ Failed to load catalog {}: {e}", path.display())
    })?;
    info!(
        "Catalog loaded from {} ({} year(s))",
        path.display(),
        catalog.year_count()
    );
    Ok(catalog)
}

/// Open the plan store named in the config, clamping new years into the catalog's range
pub fn open_store(config: &Config, catalog: &Catalog) -> Result<Store, String> {
    if config.paths.store_file.is_empty() {
        return Err("✗ No store file configured (set `store_file`)".to_string());
    }
    let gateway = JsonFileGateway::new(&config.paths.store_file);
    let store = PlanStore::open(gateway).map_err(|e| {
        error!("Failed to open plan {}: {e}", config.paths.store_file);
        format!("✗ Failed to open plan {}: {e}", config.paths.store_file)
    })?;
    Ok(store
        .with_catalog_years(catalog.year_range())
        .with_default_unit_weight(config.planner.unit_weight()))
}

/// Reject codes that are not four letters followed by four digits
pub fn check_code(code: &str) -> Result<(), String> {
    if is_course_code(code) {
        Ok(())
    } else {
        Err(format!(
            "✗ Invalid course code '{code}' (expected four letters and four digits, e.g. COMP1100)"
        ))
    }
}

/// Reject marks outside 0-100
pub fn check_mark(mark: Option<f64>) -> Result<(), String> {
    match mark {
        Some(m) if !(0.0..=100.0).contains(&m) => {
            Err(format!("✗ Invalid mark {m} (expected 0-100)"))
        }
        _ => Ok(()),
    }
}
