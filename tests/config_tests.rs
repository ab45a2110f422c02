//! Integration tests for configuration management

use degree_planner::config::{Config, ConfigOverrides};
use degree_planner::core::catalog::YearRange;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(!config.logging.level.is_empty(), "Default log level should not be empty");
    assert!(!config.paths.store_file.is_empty(), "Default store_file should not be empty");
    assert!(!config.paths.exports_dir.is_empty(), "Default exports_dir should not be empty");
    assert!(config.planner.year_options().is_some());
    assert!((config.planner.unit_weight() - 6.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
store_file = "./plan.json"
catalog_file = "./catalog.json"
plans_dir = "./plans"
exports_dir = "./exports"

[planner]
first_year = 2019
last_year = 2024
default_unit_weight = 6.0
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.store_file, "./plan.json");
    assert_eq!(config.paths.catalog_file, "./catalog.json");
    assert_eq!(config.paths.plans_dir, "./plans");
    assert_eq!(config.paths.exports_dir, "./exports");
    assert_eq!(config.planner.year_options(), Some(YearRange::new(2019, 2024)));
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.store_file, "");
    // Unset planner values fall back
    assert!(config.planner.year_options().is_none());
    assert!((config.planner.unit_weight() - 6.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$DEGREE_PLANNER/test.log"

[paths]
store_file = "$DEGREE_PLANNER/plan.json"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("degreeplanner"));
    assert!(!config.logging.file.contains("$DEGREE_PLANNER"));
    assert!(config.paths.store_file.ends_with("plan.json"));
    assert!(!config.paths.store_file.contains("$DEGREE_PLANNER"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config.set("verbose", "true").expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config.set("first-year", "2018").expect("Failed to set first year");
    assert_eq!(config.get("first_year").unwrap(), "2018");

    config
        .set("default_unit_weight", "12")
        .expect("Failed to set unit weight");
    assert!((config.planner.unit_weight() - 12.0).abs() < f64::EPSILON);

    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.set("last_year", "next").is_err());
    assert!(config.set("default_unit_weight", "-1").is_err());
    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("store_file", "/elsewhere.json").expect("Failed to set store file");

    config.unset("level", &defaults).expect("Failed to unset level");
    config.unset("store-file", &defaults).expect("Failed to unset store file");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.paths.store_file, defaults.paths.store_file);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_toml_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file: PathBuf = temp_dir.path().join("config.toml");

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("last_year", "2026").expect("Failed to set last year");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded.logging.level, "info");
    assert_eq!(loaded.planner.last_year, 2026);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        store_file: Some("/custom/plan.json".to_string()),
        catalog_file: Some("$DEGREE_PLANNER/other.json".to_string()),
        plans_dir: Some("./plans".to_string()),
        exports_dir: Some("./out".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.store_file, "/custom/plan.json");
    assert!(config.paths.catalog_file.ends_with("other.json"));
    assert!(!config.paths.catalog_file.contains('$'));
    assert_eq!(config.paths.plans_dir, "./plans");
    assert_eq!(config.paths.exports_dir, "./out");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let store_file = config.paths.store_file.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..Default::default()
    };
    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.store_file, store_file);
}

#[test]
fn test_config_display_format() {
    let display_str = format!("{}", Config::from_defaults());

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[planner]"));
    assert!(display_str.contains("store_file"));
    assert!(display_str.contains("default_unit_weight"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
store_file = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    assert!(config.merge_defaults(&defaults), "merge_defaults should report added fields");
    assert_eq!(config.paths.store_file, defaults.paths.store_file);
    assert_eq!(config.planner.first_year, defaults.planner.first_year);
    assert!(!config.merge_defaults(&defaults), "a second merge changes nothing");
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"

[planner]
first_year = 2010
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    config.merge_defaults(&Config::from_defaults());

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.planner.first_year, 2010);
}

#[test]
fn test_get_planner_dir() {
    let dir = Config::get_planner_dir();
    assert!(dir.to_string_lossy().contains("degreeplanner"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();
    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
