//! Configuration loading and data folder resolution
//!
//! Data folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TOURWATCH_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing config file is not an error: a warning is logged and compiled
//! defaults apply. A config file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable overriding the data folder
pub const ROOT_FOLDER_ENV: &str = "TOURWATCH_ROOT_FOLDER";

pub const DEFAULT_ARTIST: &str = "Sum 41";
pub const DEFAULT_BASE_URL: &str = "https://rest.bandsintown.com/artists/";
pub const DEFAULT_DENIED_COUNTRIES: [&str; 3] = ["Japan", "Canada", "United States"];
pub const DEFAULT_HIGHLIGHTED_COUNTRY: &str = "United Kingdom";
/// Twice per day
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60 * 60 * 12;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Bandsintown application id; the artist name is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load the config file at `path`
    ///
    /// Returns defaults (with a warning) when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file not found at {}, using compiled defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Default config file location: `<config dir>/tourwatch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tourwatch").join("config.toml"))
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
        }
    }
}

/// Get OS-dependent default data folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tourwatch
        dirs::data_dir()
            .map(|d| d.join("tourwatch"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tourwatch"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tourwatch
        dirs::data_local_dir()
            .map(|d| d.join("tourwatch"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tourwatch"))
    } else {
        // ~/.local/share/tourwatch
        dirs::data_local_dir()
            .map(|d| d.join("tourwatch"))
            .unwrap_or_else(|| PathBuf::from("./tourwatch_data"))
    }
}

/// Resolves the data folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    /// Resolve the data folder; never fails
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("Data folder from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                debug!("Data folder from {}: {}", ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            debug!("Data folder from config file: {}", path.display());
            return path.clone();
        }

        let path = CompiledDefaults::for_current_platform().root_folder;
        debug!("Data folder from compiled default: {}", path.display());
        path
    }
}

/// Ensures the data folder exists and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the data folder (and parents) if missing; idempotent
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            info!("Creating data folder: {}", self.root_folder.display());
        }
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    /// Path of the persisted event log inside the data folder
    pub fn event_log_path(&self, file_name: &str) -> PathBuf {
        self.root_folder.join(file_name)
    }
}

/// Fully resolved settings for a tour watcher
#[derive(Debug, Clone, PartialEq)]
pub struct TourSettings {
    pub artist: String,
    pub app_id: String,
    pub base_url: String,
    pub denied_countries: Vec<String>,
    pub highlighted_country: String,
    pub log_file_name: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
}

impl TourSettings {
    /// Apply compiled defaults to every key the config leaves unset
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let artist = config
            .artist
            .clone()
            .unwrap_or_else(|| DEFAULT_ARTIST.to_string());
        if artist.trim().is_empty() {
            return Err(Error::Config("artist must not be empty".to_string()));
        }

        let refresh_interval_secs = config
            .refresh_interval_secs
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
        if refresh_interval_secs == 0 {
            return Err(Error::Config(
                "refresh_interval_secs must be greater than zero".to_string(),
            ));
        }

        let request_timeout_secs = config
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let log_file_name = match &config.log_file_name {
            Some(name) if name.contains(['/', '\\']) => {
                return Err(Error::Config(format!(
                    "log_file_name must be a bare file name, got '{}'",
                    name
                )));
            }
            Some(name) => name.clone(),
            None => default_log_file_name(&artist),
        };

        Ok(Self {
            app_id: config.app_id.clone().unwrap_or_else(|| artist.clone()),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            denied_countries: config.denied_countries.clone().unwrap_or_else(|| {
                DEFAULT_DENIED_COUNTRIES
                    .iter()
                    .map(|c| c.to_string())
                    .collect()
            }),
            highlighted_country: config
                .highlighted_country
                .clone()
                .unwrap_or_else(|| DEFAULT_HIGHLIGHTED_COUNTRY.to_string()),
            log_file_name,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            artist,
        })
    }
}

impl Default for TourSettings {
    fn default() -> Self {
        Self {
            artist: DEFAULT_ARTIST.to_string(),
            app_id: DEFAULT_ARTIST.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            denied_countries: DEFAULT_DENIED_COUNTRIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            highlighted_country: DEFAULT_HIGHLIGHTED_COUNTRY.to_string(),
            log_file_name: default_log_file_name(DEFAULT_ARTIST),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Hidden per-artist log file name, e.g. `.Sum41events`
pub fn default_log_file_name(artist: &str) -> String {
    let compact: String = artist.chars().filter(|c| !c.is_whitespace()).collect();
    format!(".{}events", compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_file_name_strips_spaces() {
        assert_eq!(default_log_file_name("Sum 41"), ".Sum41events");
        assert_eq!(default_log_file_name("Rise Against"), ".RiseAgainstevents");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = TourSettings::default();
        assert_eq!(settings.artist, "Sum 41");
        assert_eq!(settings.app_id, "Sum 41");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            settings.denied_countries,
            vec!["Japan", "Canada", "United States"]
        );
        assert_eq!(settings.highlighted_country, "United Kingdom");
        assert_eq!(settings.log_file_name, ".Sum41events");
        assert_eq!(settings.refresh_interval, Duration::from_secs(43_200));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_settings_from_empty_toml_match_default() {
        let settings = TourSettings::from_toml(&TomlConfig::default()).unwrap();
        assert_eq!(settings, TourSettings::default());
    }

    #[test]
    fn test_settings_app_id_follows_artist() {
        let config = TomlConfig {
            artist: Some("Blink 182".to_string()),
            ..Default::default()
        };
        let settings = TourSettings::from_toml(&config).unwrap();
        assert_eq!(settings.app_id, "Blink 182");
        assert_eq!(settings.log_file_name, ".Blink182events");
    }

    #[test]
    fn test_settings_reject_zero_interval() {
        let config = TomlConfig {
            refresh_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            TourSettings::from_toml(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_settings_reject_log_file_with_separator() {
        let config = TomlConfig {
            log_file_name: Some("../escape".to_string()),
            ..Default::default()
        };
        assert!(TourSettings::from_toml(&config).is_err());
    }

    #[test]
    fn test_settings_reject_blank_artist() {
        let config = TomlConfig {
            artist: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(TourSettings::from_toml(&config).is_err());
    }
}
