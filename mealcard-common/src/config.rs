//! Bootstrap configuration loading and root folder resolution
//!
//! Configuration comes from an optional TOML file. Everything in it has a
//! built-in default, so a missing file only produces a warning.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MEALCARD_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MEALCARD_ROOT_FOLDER";

/// Environment variable naming the TOML config file
pub const CONFIG_FILE_ENV: &str = "MEALCARD_CONFIG";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "mealcards.db";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the record store (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database file, overrides `<root_folder>/mealcards.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Folder for timestamp-named output documents (default: current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub institution: InstitutionConfig,

    #[serde(default)]
    pub roster: RosterConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Fixed text and artwork printed on every card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionConfig {
    #[serde(default = "default_institution_name")]
    pub name: String,

    /// Text inside the highlighted band
    #[serde(default = "default_card_label")]
    pub label: String,

    /// Image drawn in the top-right corner of each card (optional)
    #[serde(default)]
    pub logo: Option<PathBuf>,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            name: default_institution_name(),
            label: default_card_label(),
            logo: None,
        }
    }
}

/// Roster reading options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Sheets to read from every workbook; empty means the first sheet only
    #[serde(default)]
    pub sheets: Vec<String>,
}

/// Card grid geometry, in inches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub card_width: f32,
    pub card_height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub cards_per_row: usize,
    pub cards_per_column: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 3.37,
            card_height: 2.12,
            margin_x: 0.5,
            margin_y: 0.5,
            spacing_x: 0.25,
            spacing_y: 0.25,
            cards_per_row: 2,
            cards_per_column: 4,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_institution_name() -> String {
    "MOI FORCES ACADEMY".to_string()
}

fn default_card_label() -> String {
    "MEAL CARD".to_string()
}

/// Built-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        // ~/.local/share/mealcard, ~/Library/Application Support/mealcard, %LOCALAPPDATA%\mealcard
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("mealcard"))
            .unwrap_or_else(|| PathBuf::from("./mealcard_data"));

        Self { root_folder }
    }
}

/// Where the bootstrap configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file was named or found
    Defaults,
    /// A config file was named but does not exist; defaults were used
    Missing(PathBuf),
    /// Parsed from this file
    File(PathBuf),
}

impl ConfigSource {
    /// Report the source; call once a subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => debug!("No config file found, using built-in defaults"),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::File(path) => info!("Config file: {}", path.display()),
        }
    }
}

/// Find the TOML config file to load, if any
///
/// Priority: explicit path, `MEALCARD_CONFIG`, `<config_dir>/mealcard/config.toml`.
/// Only the platform default location is checked for existence here.
pub fn locate_config_file(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("mealcard").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load bootstrap configuration
///
/// `None` or a path that does not exist yields defaults; a file that exists
/// but does not parse is an error. Nothing is logged here since this runs
/// before logging is set up; report the returned [`ConfigSource`] afterwards.
pub fn load_toml_config(path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let Some(path) = path else {
        return Ok((TomlConfig::default(), ConfigSource::Defaults));
    };

    if !path.exists() {
        return Ok((
            TomlConfig::default(),
            ConfigSource::Missing(path.to_path_buf()),
        ));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok((config, ConfigSource::File(path.to_path_buf())))
}

/// Parse bootstrap configuration from TOML text
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Resolves the root folder from CLI, environment, TOML and compiled defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_root: Option<PathBuf>) -> Self {
        Self { cli_arg, toml_root }
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Derives paths inside the root folder
///
/// The folder itself is created when the record store is opened.
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
