//! Summary, export and validation command handlers

use super::{load_catalog, open_store};
use degree_planner::config::Config;
use degree_planner::core::report::{
    format_units, CrossTab, ReportContext, ReportFormat, ReportKind,
};
use degree_planner::{error, info};
use std::path::{Path, PathBuf};

const ALL_REPORTS: [ReportKind; 3] = [ReportKind::Plan, ReportKind::Levels, ReportKind::Sessions];

fn print_table(title: &str, table: &CrossTab) {
    println!("\n=== {title} ===\n");
    if table.is_empty() {
        println!("(nothing planned)");
        return;
    }
    let header = table.header();
    let width = header
        .iter()
        .chain(table.records().iter().flatten())
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    let line = |cells: &[String]| {
        let Some((label, values)) = cells.split_first() else {
            return;
        };
        let values: Vec<String> = values.iter().map(|v| format!("{v:>width$}")).collect();
        println!("{label:<width$} {}", values.join(" "));
    };
    line(&header);
    for record in table.records() {
        line(&record);
    }
    if let Some(footer) = table.footer() {
        line(&footer);
    }
}

/// Print units by level and by session
pub fn summary(config: &Config) -> Result<(), String> {
    let catalog = load_catalog(config)?;
    let store = open_store(config, &catalog)?;
    let ctx = ReportContext::build(&store, &catalog);

    print_table(ReportKind::Levels.title(), &ctx.by_level);
    print_table(ReportKind::Sessions.title(), &ctx.by_session);
    println!(
        "\n{} course(s), {} units",
        ctx.plan.len(),
        format_units(ctx.total_units())
    );
    Ok(())
}

/// Write the requested reports into `output` (or the configured exports directory)
pub fn export(
    format: ReportFormat,
    reports: &[ReportKind],
    output: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let out_dir = output.map_or_else(|| PathBuf::from(&config.paths.exports_dir), Path::to_path_buf);
    if out_dir.as_os_str().is_empty() {
        return Err("✗ No exports directory configured (set `exports_dir` or pass --output)".to_string());
    }

    let catalog = load_catalog(config)?;
    let store = open_store(config, &catalog)?;
    let ctx = ReportContext::build(&store, &catalog);
    let generator = format.generator();

    let kinds = if reports.is_empty() { &ALL_REPORTS[..] } else { reports };
    for kind in kinds {
        let path = out_dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
        generator.generate(&ctx, *kind, &path).map_err(|e| {
            error!("Failed to write {}: {e}", path.display());
            format!("✗ Failed to write {}: {e}", path.display())
        })?;
        println!("✓ Report generated: {}", path.display());
    }
    info!("Exported {} {format} report(s)", kinds.len());
    Ok(())
}

/// List planned courses missing from the catalog or not offered in their session
pub fn validate(config: &Config) -> Result<(), String> {
    let catalog = load_catalog(config)?;
    let store = open_store(config, &catalog)?;

    let missing = store.missing_catalog_entries(&catalog);
    for entry in &missing {
        println!(
            "✗ {} ({} {}) is not in the {} catalog",
            entry.code, entry.year, entry.session, entry.catalog_year
        );
    }

    let mut unavailable = 0;
    for year in store.years() {
        for session in &year.sessions {
            for course in &session.courses {
                if let Ok(false) =
                    store.is_course_available_in_session(&year.name, &session.name, &course.code, &catalog)
                {
                    unavailable += 1;
                    println!(
                        "! {} is not listed as offered in {} {}",
                        course.code, year.name, session.name
                    );
                }
            }
        }
    }

    if missing.is_empty() && unavailable == 0 {
        println!("✓ Every planned course is in the catalog and offered in its session");
        Ok(())
    } else {
        Err(format!(
            "✗ {} missing, {unavailable} not offered in their session",
            missing.len()
        ))
    }
}
