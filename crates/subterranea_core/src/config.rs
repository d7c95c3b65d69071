//! Application configuration.
//!
//! # Responsibility
//! - Read the optional `subterranea.toml` file.
//! - Overlay store settings from the environment.
//! - Validate layout constants at configuration time.
//!
//! # Invariants
//! - Missing store settings are reported by name, before any connection.
//! - The access key never appears in `Debug` output.

use crate::layout::{LayoutConfig, LayoutConfigError, NumberingPolicy};
use crate::layout::{INVENTORY_LEFT_ZONE_CAPACITY, INVENTORY_RECORDS_PER_PAGE};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable carrying the store endpoint.
pub const ENV_STORE_URL: &str = "SUBTERRANEA_STORE_URL";
/// Environment variable carrying the store access key.
pub const ENV_STORE_KEY: &str = "SUBTERRANEA_STORE_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid layout settings: {0}")]
    Layout(#[from] LayoutConfigError),
}

/// A required store setting that was absent or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing store setting `{0}`")]
pub struct MissingSetting(pub &'static str);

/// Store settings as read, possibly incomplete.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
}

impl Debug for StoreSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("endpoint", &self.endpoint)
            .field("access_key_present", &self.access_key.is_some())
            .finish()
    }
}

impl StoreSettings {
    /// Replaces each setting with the environment value when one is set.
    pub fn overlay_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_STORE_URL) {
            self.endpoint = Some(endpoint);
        }
        if let Some(access_key) = lookup(ENV_STORE_KEY) {
            self.access_key = Some(access_key);
        }
    }

    /// Resolves complete connection settings.
    ///
    /// # Errors
    /// Returns the first setting that is absent or blank.
    pub fn resolve(&self) -> Result<StoreConfig, MissingSetting> {
        let endpoint = non_blank(self.endpoint.as_deref()).ok_or(MissingSetting("endpoint"))?;
        let access_key =
            non_blank(self.access_key.as_deref()).ok_or(MissingSetting("access_key"))?;
        Ok(StoreConfig {
            endpoint: endpoint.to_string(),
            access_key: access_key.to_string(),
        })
    }
}

/// Complete store connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the SQLite catalog file.
    pub endpoint: String,
    pub access_key: String,
}

impl Debug for StoreConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Layout settings as read from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
    pub records_per_page: usize,
    pub left_zone_capacity: usize,
    pub numbering: NumberingPolicy,
    /// Shuffle the working set once after each load.
    pub shuffle: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            records_per_page: INVENTORY_RECORDS_PER_PAGE,
            left_zone_capacity: INVENTORY_LEFT_ZONE_CAPACITY,
            numbering: NumberingPolicy::default(),
            shuffle: false,
        }
    }
}

impl LayoutSettings {
    pub fn layout_config(&self) -> Result<LayoutConfig, LayoutConfigError> {
        Ok(LayoutConfig::new(self.records_per_page, self.left_zone_capacity)?
            .with_numbering(self.numbering))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub layout: LayoutSettings,
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Parses configuration text and validates its layout section.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.layout.layout_config()?;
        Ok(config)
    }

    /// Loads configuration from `path` (defaults when `None`), then overlays
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text, path)?
            }
            None => Self::default(),
        };
        config.store.overlay_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Validated layout constants.
    pub fn layout_config(&self) -> Result<LayoutConfig, ConfigError> {
        Ok(self.layout.layout_config()?)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
