//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration lives in a single TOML file. Everything in it is
//! optional: a missing file yields defaults with a warning, never an error.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`PSD_ROOT_FOLDER`, then `PSD_ROOT`)
//! 3. TOML config file (`root_folder`)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "PSD_ROOT_FOLDER";

/// Alternative (short) root folder environment variable
pub const ROOT_ENV: &str = "PSD_ROOT";

/// Compiled-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was built for
    ///
    /// The library lives under the user's music folder on every platform:
    /// `~/Music/piano` (Linux, macOS) or `%USERPROFILE%\Music\piano` (Windows).
    pub fn for_current_platform() -> Self {
        let music = dirs::audio_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
            .unwrap_or_else(|| PathBuf::from("./Music"));

        Self {
            root_folder: music.join("piano"),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Library root folder (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Library layout (optional)
    #[serde(default)]
    pub library: LibraryConfig,

    /// Scoring vocabulary overrides, interpreted by the grader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<toml::Table>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Library directory layout
///
/// Documents live at `<root>/<category>/<song>/<tier>/<subcategory>/<file>.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Top-level category folders to scan
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Tier folder whose documents get re-graded
    #[serde(default = "default_source_tier")]
    pub source_tier: String,

    /// Instrument folder under each tier folder
    #[serde(default = "default_subcategory")]
    pub subcategory: String,

    /// Upper bound on documents graded at once (defaults to CPU count)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            source_tier: default_source_tier(),
            subcategory: default_subcategory(),
            max_concurrency: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_categories() -> Vec<String> {
    vec!["printed".to_string(), "not print".to_string()]
}

fn default_source_tier() -> String {
    "Easy".to_string()
}

fn default_subcategory() -> String {
    "Piano".to_string()
}

/// Root folder resolution
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self {
            cli_arg: None,
            toml_root: None,
        }
    }

    /// Command-line override (priority 1)
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Value from the loaded TOML file (priority 3)
    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    /// Resolve the library root folder
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!(root = %path.display(), "Root folder from command line");
            return path.clone();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    debug!(root = %path, env = var, "Root folder from environment");
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            debug!(root = %path.display(), "Root folder from TOML config");
            return path.clone();
        }

        let fallback = CompiledDefaults::for_current_platform().root_folder;
        debug!(root = %fallback.display(), "Root folder from compiled default");
        fallback
    }
}

impl Default for RootFolderResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Default configuration file path: `<config_dir>/psd/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("psd").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load TOML configuration
///
/// A missing file is not an error: defaults are returned and a warning logged.
/// A file that exists but does not parse is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Write TOML configuration atomically
///
/// Serializes to a sibling temp file, then renames over the target so a
/// crash never leaves a half-written config behind.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::Io(e));
    }

    info!(path = %path.display(), "Wrote config file");
    Ok(())
}
