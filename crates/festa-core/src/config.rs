//! Festa configuration system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{FestaError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FestaConfig {
    /// Guest count above which an extra `need` task is generated.
    #[serde(default = "default_large_event_threshold")]
    pub large_event_threshold: u32,
    /// Per task-type overrides of the built-in scheduling rules, keyed by
    /// task type tag (`shopping`, `cooking`, ...).
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_large_event_threshold() -> u32 { 20 }

impl Default for FestaConfig {
    fn default() -> Self {
        Self {
            large_event_threshold: default_large_event_threshold(),
            rules: BTreeMap::new(),
            store: StoreConfig::default(),
        }
    }
}

impl FestaConfig {
    /// Load config from the default path (~/.festa/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FestaError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FestaError::Config(format!("Failed to parse config: {e}")))
    }

    /// Save config to the given path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| FestaError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Festa home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".festa")
    }
}

/// Partial override of one scheduling rule. Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOverride {
    /// Hours.
    #[serde(default)]
    pub default_duration: Option<f32>,
    /// `low`, `medium`, `high` or `urgent`.
    #[serde(default)]
    pub default_priority: Option<String>,
    #[serde(default)]
    pub ideal_days_before: Option<i64>,
    /// `logistics` or `cook`.
    #[serde(default)]
    pub assigned_to_role: Option<String>,
}

/// Task board persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String { "~/.festa/board.json".into() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}
