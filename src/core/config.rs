//! Configuration module for the degree planner

use crate::core::catalog::{YearRange, DEFAULT_UNIT_WEIGHT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the planner's config directory
const DIR_VARIABLE: &str = "$DEGREE_PLANNER";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON file holding the plan document
    #[serde(default)]
    pub store_file: String,
    /// JSON course catalog
    #[serde(default)]
    pub catalog_file: String,
    /// Directory of mirrored plan requirement documents
    #[serde(default)]
    pub plans_dir: String,
    /// Directory for CSV and HTML exports
    #[serde(default)]
    pub exports_dir: String,
}

/// Planner settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// First year offered when adding years
    #[serde(default)]
    pub first_year: u16,
    /// Last year offered when adding years
    #[serde(default)]
    pub last_year: u16,
    /// Units assumed for courses missing from the catalog
    #[serde(default)]
    pub default_unit_weight: f64,
}

impl PlannerConfig {
    /// Years offered when adding a year, if both bounds are set
    #[must_use]
    pub const fn year_options(&self) -> Option<YearRange> {
        if self.first_year == 0 || self.last_year == 0 {
            None
        } else {
            Some(YearRange::new(self.first_year, self.last_year))
        }
    }

    /// The configured unit weight, or the built-in default when unset
    #[must_use]
    pub fn unit_weight(&self) -> f64 {
        if self.default_unit_weight > 0.0 {
            self.default_unit_weight
        } else {
            DEFAULT_UNIT_WEIGHT
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Planner settings
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override plan store file
    pub store_file: Option<String>,
    /// Override catalog file
    pub catalog_file: Option<String>,
    /// Override plan documents directory
    pub plans_dir: Option<String>,
    /// Override exports directory
    pub exports_dir: Option<String>,
}

impl Config {
    /// Get the `$DEGREE_PLANNER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/degreeplanner`
    /// - macOS: `~/Library/Application Support/degreeplanner`
    /// - Windows: `%APPDATA%\degreeplanner`
    #[must_use]
    pub fn get_planner_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("degreeplanner")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading configuration so that fields added in a newer release
    /// are populated. Only fields that are empty (or zero) here and set in
    /// `defaults` are updated.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        for (field, default) in [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.store_file, &defaults.paths.store_file),
            (&mut self.paths.catalog_file, &defaults.paths.catalog_file),
            (&mut self.paths.plans_dir, &defaults.paths.plans_dir),
            (&mut self.paths.exports_dir, &defaults.paths.exports_dir),
        ] {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        }

        if self.planner.first_year == 0 && defaults.planner.first_year != 0 {
            self.planner.first_year = defaults.planner.first_year;
            changed = true;
        }
        if self.planner.last_year == 0 && defaults.planner.last_year != 0 {
            self.planner.last_year = defaults.planner.last_year;
            changed = true;
        }
        if self.planner.default_unit_weight <= 0.0 && defaults.planner.default_unit_weight > 0.0 {
            self.planner.default_unit_weight = defaults.planner.default_unit_weight;
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for one run only; the config file is not modified. Only
    /// non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(store_file) = &overrides.store_file {
            self.paths.store_file = Self::expand_variables(store_file);
        }
        if let Some(catalog_file) = &overrides.catalog_file {
            self.paths.catalog_file = Self::expand_variables(catalog_file);
        }
        if let Some(plans_dir) = &overrides.plans_dir {
            self.paths.plans_dir = Self::expand_variables(plans_dir);
        }
        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir = Self::expand_variables(exports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in the
    /// directory returned by [`get_planner_dir`].
    ///
    /// [`get_planner_dir`]: Self::get_planner_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_planner_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$DEGREE_PLANNER` to the planner's config directory
    ///
    /// ```ignore
    /// let expanded = Config::expand_variables("$DEGREE_PLANNER/plan.json");
    /// // "/home/user/.config/degreeplanner/plan.json"
    /// ```
    #[must_use]
    pub fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let planner_dir = Self::get_planner_dir();
            value.replace(DIR_VARIABLE, planner_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults (empty strings, `false`, zero).
    /// `$DEGREE_PLANNER` is expanded in path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.store_file = Self::expand_variables(&config.paths.store_file);
        config.paths.catalog_file = Self::expand_variables(&config.paths.catalog_file);
        config.paths.plans_dir = Self::expand_variables(&config.paths.plans_dir);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary, so this is a build defect.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file is merged with the defaults (and re-saved when fields
    /// were added). On first run the config directory and file are created.
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `store_file`, `catalog_file`,
    /// `plans_dir`, `exports_dir`, `first_year`, `last_year`,
    /// `default_unit_weight` (dashes are accepted in place of underscores).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "store_file" | "store-file" => Some(self.paths.store_file.clone()),
            "catalog_file" | "catalog-file" => Some(self.paths.catalog_file.clone()),
            "plans_dir" | "plans-dir" => Some(self.paths.plans_dir.clone()),
            "exports_dir" | "exports-dir" => Some(self.paths.exports_dir.clone()),
            "first_year" | "first-year" => Some(self.planner.first_year.to_string()),
            "last_year" | "last-year" => Some(self.planner.last_year.to_string()),
            "default_unit_weight" | "default-unit-weight" => {
                Some(self.planner.default_unit_weight.to_string())
            }
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be
    /// parsed for that key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "store_file" | "store-file" => self.paths.store_file = value.to_string(),
            "catalog_file" | "catalog-file" => self.paths.catalog_file = value.to_string(),
            "plans_dir" | "plans-dir" => self.paths.plans_dir = value.to_string(),
            "exports_dir" | "exports-dir" => self.paths.exports_dir = value.to_string(),
            "first_year" | "first-year" => {
                self.planner.first_year = parse_year(key, value)?;
            }
            "last_year" | "last-year" => {
                self.planner.last_year = parse_year(key, value)?;
            }
            "default_unit_weight" | "default-unit-weight" => {
                self.planner.default_unit_weight = value
                    .parse::<f64>()
                    .ok()
                    .filter(|w| *w > 0.0)
                    .ok_or_else(|| format!("Invalid unit weight for '{key}': '{value}'"))?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to the value in `defaults`)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "store_file" | "store-file" => {
                self.paths.store_file.clone_from(&defaults.paths.store_file);
            }
            "catalog_file" | "catalog-file" => self
                .paths
                .catalog_file
                .clone_from(&defaults.paths.catalog_file),
            "plans_dir" | "plans-dir" => self.paths.plans_dir.clone_from(&defaults.paths.plans_dir),
            "exports_dir" | "exports-dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "first_year" | "first-year" => self.planner.first_year = defaults.planner.first_year,
            "last_year" | "last-year" => self.planner.last_year = defaults.planner.last_year,
            "default_unit_weight" | "default-unit-weight" => {
                self.planner.default_unit_weight = defaults.planner.default_unit_weight;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_year(key: &str, value: &str) -> Result<u16, String> {
    value
        .parse::<u16>()
        .map_err(|_| format!("Invalid year for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  store_file = \"{}\"", self.paths.store_file)?;
        writeln!(f, "  catalog_file = \"{}\"", self.paths.catalog_file)?;
        writeln!(f, "  plans_dir = \"{}\"", self.paths.plans_dir)?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        writeln!(f, "\n[planner]")?;
        writeln!(f, "  first_year = {}", self.planner.first_year)?;
        writeln!(f, "  last_year = {}", self.planner.last_year)?;
        writeln!(f, "  default_unit_weight = {}", self.planner.default_unit_weight)?;

        Ok(())
    }
}
