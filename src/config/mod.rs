//! Application-level configuration, stored separately from ledger data.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::utils::{config_file, ensure_dir};
use crate::domain::common::RecordId;
use crate::errors::StoreError;

/// Settings that apply across ledgers: quick-add fallbacks, report defaults,
/// and the ledger to reopen on startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub quick_add_currency: String,
    pub quick_add_account_id: RecordId,
    pub quick_add_category_id: RecordId,
    pub trend_months: u32,
    pub backup_retention: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            quick_add_currency: "INR".to_string(),
            quick_add_account_id: RecordId(1),
            quick_add_category_id: RecordId(1),
            trend_months: 6,
            backup_retention: crate::storage::DEFAULT_BACKUP_RETENTION,
            last_opened_ledger: None,
        }
    }
}

/// Loads and saves the config file, tolerating a missing one.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StoreError> {
        let path = config_file();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    /// Manager rooted somewhere other than the default data directory.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, StoreError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join("config.json"),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing file means defaults; a malformed one is an error rather than a
    /// silent reset.
    pub fn load(&self) -> Result<Config, StoreError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("create temp dir");
        let manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("create manager");
        let config = manager.load().expect("load config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().expect("create temp dir");
        let manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("create manager");
        let mut config = Config::default();
        config.trend_months = 12;
        config.last_opened_ledger = Some("personal".to_string());
        manager.save(&config).expect("save config");
        let loaded = manager.load().expect("load config");
        assert_eq!(loaded.trend_months, 12);
        assert_eq!(loaded.last_opened_ledger.as_deref(), Some("personal"));
    }

    #[test]
    fn partial_files_fill_from_defaults() {
        let temp = TempDir::new().expect("create temp dir");
        let manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("create manager");
        fs::write(manager.path(), r#"{"trend_months": 3}"#).expect("write partial config");
        let loaded = manager.load().expect("load config");
        assert_eq!(loaded.trend_months, 3);
        assert_eq!(loaded.currency, "USD");
    }
}
