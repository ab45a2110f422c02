//! CLI argument definitions for the degree planner

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use degree_planner::config::ConfigOverrides;
use degree_planner::core::models::PlanKind;
use degree_planner::core::report::{ReportFormat, ReportKind};
use degree_planner::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key to display (e.g., `level`, `store_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (asks for confirmation unless --yes).
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum YearAction {
    /// Add an empty year
    Add {
        /// Year name (e.g., 2024)
        name: String,
        /// Catalog year to resolve courses against (defaults to the year itself)
        #[arg(long, value_name = "YEAR")]
        catalog_year: Option<String>,
    },
    /// Remove a year with its sessions, courses and cached plans
    Remove {
        /// Year name
        name: String,
    },
    /// List years that can still be added
    Options,
}

#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Add an empty session
    Add {
        /// Year name
        year: String,
        /// Session label (e.g., "First Semester")
        name: String,
        /// Create the year if it does not exist
        #[arg(long)]
        create_year: bool,
    },
    /// Remove a session and its courses
    Remove {
        /// Year name
        year: String,
        /// Session label
        name: String,
    },
    /// List default session labels not yet used in a year
    Options {
        /// Year name
        year: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseAction {
    /// Plan a course in a session
    Add {
        /// Year name
        year: String,
        /// Session label
        session: String,
        /// Course code (e.g., COMP1100)
        code: String,
        /// Mark already achieved (0-100)
        #[arg(long)]
        mark: Option<f64>,
        /// Create the year and session if they do not exist
        #[arg(short, long)]
        force: bool,
    },
    /// Remove a planned course
    Remove {
        /// Year name
        year: String,
        /// Session label
        session: String,
        /// Course code
        code: String,
    },
    /// Record a mark; omit MARK to clear it
    Mark {
        /// Year name
        year: String,
        /// Session label
        session: String,
        /// Course code
        code: String,
        /// Mark (0-100)
        mark: Option<f64>,
    },
    /// Show catalog details for a course in a year's catalog
    Info {
        /// Year name
        year: String,
        /// Course code
        code: String,
    },
    /// Search the catalog of a year
    Search {
        /// Year name
        year: String,
        /// Only courses offered in these sessions
        #[arg(long = "session", value_name = "SESSION")]
        sessions: Vec<String>,
        /// Only courses with these faculty prefixes (e.g., COMP)
        #[arg(long = "faculty", value_name = "PREFIX")]
        faculties: Vec<String>,
        /// Only courses at these level bands (e.g., 1000)
        #[arg(long = "level", value_name = "BAND")]
        levels: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlanAction {
    /// Show a plan's requirements, fetching them on first use
    Show {
        /// Year name
        year: String,
        /// Plan code (e.g., COMP-MAJ)
        code: String,
        /// Plan kind: major, minor or program
        #[arg(short, long, default_value = "major")]
        kind: PlanKind,
    },
    /// List cached plans
    List,
    /// Drop every cached plan
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum GradesAction {
    /// GPA of the recorded marks
    Gpa,
    /// Weighted average mark of the recorded marks
    Wam,
    /// Grade band for a mark
    Grade {
        /// Mark (0-100)
        mark: String,
    },
    /// Minimum grades needed on the remaining courses to reach a GPA
    Target {
        /// GPA to reach
        goal: f64,
        /// Remaining courses (defaults to the ungraded courses in the plan)
        #[arg(long)]
        remaining: Option<u32>,
        /// Remaining credit units, converted to courses of the default unit weight
        #[arg(long, conflicts_with = "remaining")]
        remaining_units: Option<f64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Show the plan
    Show,
    /// Add or remove years
    Year {
        #[command(subcommand)]
        action: YearAction,
    },
    /// Add or remove sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Plan courses and record marks
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Cached major, minor and program requirements
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },
    /// Sort years and sessions chronologically
    Sort,
    /// Print units by level and by session
    Summary,
    /// Write reports to the exports directory
    Export {
        /// Report format: csv or html
        #[arg(short, long, value_name = "FORMAT", default_value = "csv")]
        format: ReportFormat,
        /// Reports to write: plan, levels, sessions (default: all)
        #[arg(short, long, value_name = "REPORT")]
        report: Vec<ReportKind>,
        /// Output directory (defaults to config `exports_dir`)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// GPA and WAM calculations
    Grades {
        #[command(subcommand)]
        action: GradesAction,
    },
    /// Check whether a course is planned at or before a session
    Completed {
        /// Year name
        year: String,
        /// Session label
        session: String,
        /// Course code
        code: String,
    },
    /// Import results from transcript text
    Import {
        /// Transcript text file ("-" reads stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Report planned courses missing from the catalog or not offered in their session
    Validate,
}

#[derive(Parser, Debug)]
#[command(
    name = "degreeplanner",
    about = "Plan a degree session by session and track grades",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config plan store file
    #[arg(long = "config-store-file", value_name = "PATH")]
    pub config_store_file: Option<PathBuf>,

    /// Override config plan store file (short form)
    #[arg(long = "store", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Override config catalog file
    #[arg(long = "config-catalog-file", value_name = "PATH")]
    pub config_catalog_file: Option<PathBuf>,

    /// Override config catalog file (short form)
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Override config plan documents directory
    #[arg(long = "config-plans-dir", value_name = "DIR")]
    pub config_plans_dir: Option<PathBuf>,

    /// Override config exports directory
    #[arg(long = "config-exports-dir", value_name = "DIR")]
    pub config_exports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--store`) take precedence over long-form flags
    /// (e.g., `--config-store-file`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            store_file: path_string(self.store.as_ref().or(self.config_store_file.as_ref())),
            catalog_file: path_string(self.catalog.as_ref().or(self.config_catalog_file.as_ref())),
            plans_dir: path_string(self.config_plans_dir.as_ref()),
            exports_dir: path_string(self.config_exports_dir.as_ref()),
        }
    }
}
