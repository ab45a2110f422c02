//! Command-line interface entry point for the degree planner

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use degree_planner::config::Config;
use degree_planner::info;
use degree_planner::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path =
        (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Show => commands::planner::show(&config),
        Command::Year { action } => commands::planner::year(action, &config),
        Command::Session { action } => commands::planner::session(action, &config),
        Command::Course { action } => commands::planner::course(action, &config),
        Command::Plan { action } => commands::planner::plan(action, &config),
        Command::Sort => commands::planner::sort(&config),
        Command::Completed {
            year,
            session,
            code,
        } => commands::planner::completed(&year, &session, &code, &config),
        Command::Import { file } => commands::planner::import(&file, &config),
        Command::Grades { action } => commands::grades::run(action, &config),
        Command::Summary => commands::report::summary(&config),
        Command::Export {
            format,
            report,
            output,
        } => commands::report::export(format, &report, output.as_deref(), &config),
        Command::Validate => commands::report::validate(&config),
    };

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
