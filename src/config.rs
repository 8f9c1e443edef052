//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-shelf\config.toml
//! - macOS: ~/Library/Application Support/music-shelf/config.toml
//! - Linux: ~/.config/music-shelf/config.toml
//!
//! The config file is human-readable and editable. Command-line flags
//! override individual values for a single run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::player::AudioMode;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the song catalog comes from
    pub catalog: CatalogConfig,

    /// Audio resolution settings
    pub audio: AudioConfig,

    /// Cover image settings
    pub covers: CoverConfig,

    /// Library browsing settings
    pub library: LibraryConfig,
}

/// Catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// File path or http(s) URL of the catalog JSON document
    pub source: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "duration_fix.json".to_string(),
        }
    }
}

/// Audio resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// "local" probes files under `songs_dir`, "remote" asks the streaming host
    pub mode: String,

    /// Base directory for local audio files
    pub songs_dir: PathBuf,

    /// Extensions tried for local files, in order
    pub extensions: Vec<String>,

    /// Streaming host for remote mode
    pub remote_base_url: String,

    /// Delay between local candidate attempts
    pub retry_delay_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            mode: "local".to_string(),
            songs_dir: PathBuf::from("songs"),
            extensions: vec!["m4a".to_string(), "mp3".to_string()],
            remote_base_url: "http://localhost:5000".to_string(),
            retry_delay_ms: 150,
        }
    }
}

impl AudioConfig {
    /// Build the audio resolution mode from these settings.
    pub fn audio_mode(&self) -> Result<AudioMode, ConfigError> {
        match self.mode.as_str() {
            "local" => Ok(AudioMode::LocalFiles {
                base_dir: self.songs_dir.clone(),
                extensions: self.extensions.clone(),
            }),
            "remote" => Ok(AudioMode::Remote {
                base_url: self.remote_base_url.trim_end_matches('/').to_string(),
            }),
            other => Err(ConfigError::InvalidValue {
                key: "audio.mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Cover image settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Directory holding `<song id>.jpg` covers
    pub dir: PathBuf,

    /// Reference used when a cover is missing
    pub placeholder: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("real_covers"),
            placeholder: "https://via.placeholder.com/400x300?text=No+Cover".to_string(),
        }
    }
}

/// Library browsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// How many songs the visible window grows by
    pub page_size: usize,

    /// Where persisted state (likes) lives; defaults to the OS data dir
    pub data_dir: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            page_size: crate::library::DEFAULT_CHUNK,
            data_dir: None,
        }
    }
}

impl LibraryConfig {
    /// Resolve the directory for persisted state.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("music-shelf")))
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-shelf"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

// ============================================================================
// Tests
// ============================================================================
