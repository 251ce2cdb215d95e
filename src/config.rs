//! Configuration for the gettsim-personas CLI
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (GETTSIM_PERSONAS_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "GETTSIM_PERSONAS_";

/// First year in which any bundled persona is available
pub const FIRST_PERSONA_YEAR: i32 = 2005;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonasConfig {
    /// Logging configuration
    pub logging: LoggingSettings,

    /// JSON output settings
    pub output: OutputSettings,

    /// Year range checked by `validate`
    pub validation: ValidationSettings,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Years covered by persona validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            start_year: FIRST_PERSONA_YEAR,
            end_year: chrono::Local::now().year(),
        }
    }
}

impl PersonasConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // Explicit path must exist
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        for path in search_paths() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Logging settings
        if let Some(val) = env_var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = env_var("LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = env_var("LOG_JSON") {
            self.logging.json_format = parse_bool(&val);
        }

        // Output settings
        if let Some(val) = env_var("PRETTY") {
            self.output.pretty = parse_bool(&val);
        }

        // Validation settings
        if let Some(n) = env_var("START_YEAR").and_then(|v| v.parse().ok()) {
            self.validation.start_year = n;
        }
        if let Some(n) = env_var("END_YEAR").and_then(|v| v.parse().ok()) {
            self.validation.end_year = n;
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.logging.max_files == 0 {
            return Err(Error::config_field_invalid(
                "logging.max_files",
                "max_files must be at least 1",
            ));
        }

        if self.validation.start_year < FIRST_PERSONA_YEAR {
            return Err(Error::config_field_invalid(
                "validation.start_year",
                format!("start_year must not be before {FIRST_PERSONA_YEAR}"),
            ));
        }
        if self.validation.start_year > self.validation.end_year {
            return Err(Error::config_field_invalid(
                "validation.end_year",
                format!(
                    "end_year {} is before start_year {}",
                    self.validation.end_year, self.validation.start_year
                ),
            ));
        }

        Ok(())
    }
}

/// Standard configuration file locations, in search order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("gettsim-personas.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("gettsim-personas").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".gettsim-personas.toml"));
    }
    paths
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}")).ok()
}

fn parse_bool(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file, returning its path
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => PathBuf::from(expand_path(p)),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gettsim-personas")
            .join("config.toml"),
    };

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: config_path.clone(),
        source,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
pub fn generate_default_config() -> String {
    format!(
        r#"# gettsim-personas configuration

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (omit to log to stderr only)
# file = "~/.local/share/gettsim-personas/personas.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Emit JSON log lines
json_format = false

[output]
# Pretty-print JSON written to stdout
pretty = true

[validation]
# Years checked by `gettsim-personas validate`
start_year = {FIRST_PERSONA_YEAR}
end_year = {end_year}
"#,
        end_year = ValidationSettings::default().end_year,
    )
}
