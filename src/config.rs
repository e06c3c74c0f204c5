use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::species::{DexError, SpeciesDb};
use crate::sprite::SpriteHosts;

pub const BACKEND_URL_ENV: &str = "TRAINERDEX_BACKEND_URL";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the bot backend; profile is `{base}/{id}`, status feed is
    /// `{base}/pokedex/{id}`
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Sprite asset hosts
    #[serde(default)]
    pub sprites: SpriteHosts,

    /// Species database file; the bundled table is used when unset
    #[serde(default)]
    pub dex_path: Option<PathBuf>,

    /// Showdown data directory (`pokedex.json`, `learnsets.json`,
    /// `moves.json`); `dex_path` wins when both are set
    #[serde(default)]
    pub showdown_dir: Option<PathBuf>,

    /// Directory for rolling log files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// One of trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:3000/api/backend".to_string()
}

fn default_log_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .map(|dir| dir.join("trainerdex").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            sprites: SpriteHosts::default(),
            dex_path: None,
            showdown_dir: None,
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `<config_dir>/trainerdex/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("trainerdex").join("config.toml"))
    }

    /// Explicit path if given, otherwise the default path when it exists,
    /// otherwise built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
    }

    pub fn apply_backend_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
    }

    /// `dex_path`, else `showdown_dir`, else the bundled table.
    pub fn load_species(&self) -> Result<SpeciesDb, DexError> {
        match (&self.dex_path, &self.showdown_dir) {
            (Some(path), _) => SpeciesDb::load(path),
            (None, Some(dir)) => SpeciesDb::load_showdown(dir),
            (None, None) => SpeciesDb::bundled(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
