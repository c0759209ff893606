//! # Configuration
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. `marquee.toml` (optional)
//! 3. Environment: `MARQUEE_API_URL`, `MARQUEE_API_KEY`, `MARQUEE_IMAGE_URL`
//! 4. CLI flags (applied by the `cli` module)
//!
//! ```toml
//! [api]
//! base_url = "https://api.themoviedb.org/3"
//! api_key = "..."
//! timeout_secs = 10
//!
//! [query]
//! folding = "unicode"      # or "ascii"
//! whitespace = "preserve"  # or "trim"
//! clear_on_submit = true
//!
//! [storage]
//! backend = "redb"         # memory | file | redb
//! path = "marquee.db"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```

use clap::ValueEnum;
use marquee_core::{ControllerOptions, FavoritesStore, MarqueeError, StorageBackend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "marquee.toml";

// =============================================================================
// SECTIONS
// =============================================================================

/// Remote movie API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where favorites are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Volatile, lost at exit.
    Memory,
    /// Single favorites file.
    File,
    /// redb database.
    #[default]
    Redb,
}

/// Favorites storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: PathBuf::from("marquee.db"),
        }
    }
}

impl StorageConfig {
    /// Open the configured favorites store.
    pub fn open(&self) -> Result<FavoritesStore, MarqueeError> {
        match self.backend {
            BackendKind::Memory => FavoritesStore::open(StorageBackend::default()),
            BackendKind::File => FavoritesStore::with_file(&self.path),
            BackendKind::Redb => FavoritesStore::with_redb(&self.path),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub query: ControllerOptions,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, MarqueeError> {
        toml::from_str(s).map_err(|e| MarqueeError::Config(e.to_string()))
    }

    /// Load configuration from `path`, or from `marquee.toml` if it exists.
    ///
    /// An explicit path must exist. Environment overrides are applied.
    pub fn load(path: Option<&Path>) -> Result<Self, MarqueeError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::read_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, MarqueeError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MarqueeError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Self::from_toml_str(&text)
    }

    /// Apply `MARQUEE_*` overrides using `lookup` to read variables.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MARQUEE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(key) = lookup("MARQUEE_API_KEY").filter(|k| !k.is_empty()) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup("MARQUEE_IMAGE_URL") {
            self.api.image_base_url = url;
        }
    }

    /// Whether a remote API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

// =============================================================================
// TESTS
// =============================================================================
