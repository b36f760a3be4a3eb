//! Settings layering: defaults, then the TOML file, then CLI flags.
//!
//! The config file lives at `<config dir>/game-tracker/config.toml`
//! unless `--config` points elsewhere. It is only ever read.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::views::FormMode;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server origin; a trailing `/api` is tolerated.
    pub base_url: String,
    /// Game whose reviews the reviews panel opens with.
    pub review_game_id: String,
    pub form_mode: FormMode,
    /// Show cover URLs and descriptions on game cards.
    pub show_covers: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            review_game_id: String::new(),
            form_mode: FormMode::default(),
            show_covers: true,
            log_file: None,
        }
    }
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub review_game_id: Option<String>,
    pub form_mode: Option<FormMode>,
    pub compact: bool,
    pub log_file: Option<PathBuf>,
}

/// Where the settings came from, for the startup log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Defaults,
}

impl Config {
    /// Load from `explicit` (which must exist) or the default location
    /// (which may not).
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Source), ConfigError> {
        match explicit {
            Some(path) => Ok((Self::from_file(path)?, Source::File(path.to_path_buf()))),
            None => match default_path() {
                Some(path) if path.exists() => {
                    Ok((Self::from_file(&path)?, Source::File(path)))
                }
                _ => Ok((Self::default(), Source::Defaults)),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if let Some(id) = overrides.review_game_id {
            self.review_game_id = id;
        }
        if let Some(mode) = overrides.form_mode {
            self.form_mode = mode;
        }
        if overrides.compact {
            self.show_covers = false;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    /// Log file path, falling back to the user cache directory.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(std::env::temp_dir)
            .join("game-tracker.log")
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "gametracker", "game-tracker")
}

pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
