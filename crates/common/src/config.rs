//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ClipmarkError, ClipmarkResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the mark log, manifest, and selector state.
    pub data_dir: PathBuf,

    /// File name of the raw mark log inside `data_dir`.
    pub mark_log_file: String,

    /// File name of the clip manifest inside `data_dir`.
    pub manifest_file: String,

    /// Media player HTTP interface.
    pub player: PlayerConfig,

    /// Closed label lists the selectors rotate over.
    pub labels: LabelConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Connection settings for the player's HTTP status interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base URL, e.g. `http://127.0.0.1:8080`.
    pub url: String,

    /// Basic-auth user (VLC leaves this empty).
    pub username: String,

    /// Basic-auth password configured in the player.
    pub password: String,
}

/// Artwork and distance labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub artworks: Vec<String>,
    pub distances: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipmark=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            mark_log_file: "clip_timestamps.csv".to_string(),
            manifest_file: "testing_videos.csv".to_string(),
            player: PlayerConfig::default(),
            labels: LabelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            username: String::new(),
            password: "abc".to_string(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        let artworks = [
            "2-3_sfikas",
            "armament_phinikarides",
            "ascent_ladommatos",
            "autumn_chrysochos",
            "crucified_savvides",
            "game_of_shapes_chrysochos",
            "ground_plan_hadjida",
            "no_artwork",
            "presence_votsis",
            "secession_bargilly",
            "the_cyclist_votsis",
            "the_great_greek_encyclopaedia_makrides",
            "the_observer_kyriakou",
            "throne_ii_chrysochos",
            "untitled_hadjida",
            "untitled_kouroussis",
            "untitled_votsis",
        ];
        let distances = ["1m", "1.5m", "2.5m"];

        Self {
            artworks: artworks.iter().map(|s| s.to_string()).collect(),
            distances: distances.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location.
    pub fn load() -> ClipmarkResult<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is a `Config` error.
    pub fn load_from(config_path: &Path) -> ClipmarkResult<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            ClipmarkError::config(format!(
                "failed to read {}: {e}",
                config_path.display()
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ClipmarkError::config(format!(
                "failed to parse {}: {e}",
                config_path.display()
            ))
        })
    }

    /// Reject configurations the selectors cannot rotate over.
    pub fn validate(&self) -> ClipmarkResult<()> {
        if self.labels.artworks.is_empty() {
            return Err(ClipmarkError::config("artwork label list is empty"));
        }
        if self.labels.distances.is_empty() {
            return Err(ClipmarkError::config("distance label list is empty"));
        }
        Ok(())
    }

    /// Full path of the raw mark log.
    pub fn mark_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.mark_log_file)
    }

    /// Full path of the clip manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(&self.manifest_file)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("clipmark").join("config.json")
}

/// Default data directory.
fn default_data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("clipmark")
}
