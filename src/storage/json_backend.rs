use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::core::utils::{app_data_dir, ensure_dir, BACKUP_DIR, LEDGER_DIR};
use crate::errors::StoreError;
use crate::ledger::{Ledger, CURRENT_SCHEMA_VERSION};
use crate::storage::{StorageBackend, DEFAULT_BACKUP_RETENTION, LEDGER_EXTENSION};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// File-per-ledger JSON persistence with timestamped backups.
///
/// Writes go to a temporary sibling first and land via rename, so a crash
/// mid-write never leaves a truncated ledger behind.
pub struct JsonStorage {
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    /// Backend rooted at `base_dir`, defaulting to the app data directory.
    /// `retention` caps how many backups are kept per ledger.
    pub fn new(base_dir: Option<PathBuf>, retention: Option<usize>) -> Result<Self, StoreError> {
        let base = base_dir.unwrap_or_else(app_data_dir);
        let ledgers_dir = base.join(LEDGER_DIR);
        let backups_dir = base.join(BACKUP_DIR);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_BACKUP_RETENTION),
        })
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{LEDGER_EXTENSION}", canonical_name(name)))
    }

    pub fn ledger_exists(&self, name: &str) -> bool {
        self.ledger_path(name).exists()
    }

    /// Loads the named ledger, or seeds a fresh one with the default
    /// categories and accounts when no file exists yet.
    pub fn load_or_init(&self, name: &str) -> Result<Ledger, StoreError> {
        if self.ledger_exists(name) {
            self.load(name)
        } else {
            tracing::info!(name, "no stored ledger, seeding defaults");
            Ok(Ledger::with_defaults(name))
        }
    }

    /// Names of every stored ledger, sorted.
    pub fn list_ledgers(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(LEDGER_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn backup_prefix(name: &str) -> String {
        canonical_name(name)
    }

    fn prune_backups(&self, name: &str) -> Result<(), StoreError> {
        let backups = self.sorted_backups(name)?;
        for (_, path) in backups.into_iter().skip(self.retention) {
            tracing::debug!(path = %path.display(), "pruning old backup");
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Backups for the ledger, newest first.
    fn sorted_backups(&self, name: &str) -> Result<Vec<(NaiveDateTime, PathBuf)>, StoreError> {
        let prefix = Self::backup_prefix(name);
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(stamp) = parse_backup_timestamp(file_name, &prefix) {
                backups.push((stamp, path));
            }
        }
        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups)
    }

    fn ensure_schema_support(ledger: &Ledger) -> Result<(), StoreError> {
        if ledger.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(StoreError::Storage(format!(
                "ledger schema v{} is newer than the supported v{CURRENT_SCHEMA_VERSION}",
                ledger.schema_version
            )));
        }
        Ok(())
    }

    fn read_ledger_file(path: &Path) -> Result<Ledger, StoreError> {
        let contents = fs::read_to_string(path)?;
        let ledger: Ledger = serde_json::from_str(&contents)?;
        Self::ensure_schema_support(&ledger)?;
        Ok(ledger)
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<(), StoreError> {
        let path = self.ledger_path(name);
        if path.exists() {
            self.backup(name)?;
        }
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        tracing::info!(name, path = %path.display(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger, StoreError> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(StoreError::Storage(format!(
                "ledger '{name}' does not exist"
            )));
        }
        Self::read_ledger_file(&path)
    }

    fn backup(&self, name: &str) -> Result<PathBuf, StoreError> {
        let source = self.ledger_path(name);
        if !source.exists() {
            return Err(StoreError::Storage(format!(
                "ledger '{name}' has nothing to back up"
            )));
        }
        let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT);
        let target = self.backups_dir.join(format!(
            "{}_{stamp}.{LEDGER_EXTENSION}",
            Self::backup_prefix(name)
        ));
        fs::copy(&source, &target)?;
        self.prune_backups(name)?;
        tracing::debug!(name, backup = %target.display(), "backup created");
        Ok(target)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<PathBuf>, StoreError> {
        Ok(self
            .sorted_backups(name)?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    fn restore(&self, name: &str, backup: &Path) -> Result<Ledger, StoreError> {
        if !backup.exists() {
            return Err(StoreError::Storage(format!(
                "backup '{}' does not exist",
                backup.display()
            )));
        }
        // Validate before touching the live file.
        let restored = Self::read_ledger_file(backup)?;
        fs::copy(backup, self.ledger_path(name))?;
        tracing::info!(name, backup = %backup.display(), "ledger restored");
        Ok(restored)
    }
}

fn canonical_name(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if slug.is_empty() {
        "ledger".to_string()
    } else {
        slug
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Extracts the timestamp from `<prefix>_<stamp>.json`, rejecting files that
/// belong to other ledgers.
fn parse_backup_timestamp(file_name: &str, prefix: &str) -> Option<NaiveDateTime> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('_')?;
    let stamp = rest.strip_suffix(&format!(".{LEDGER_EXTENSION}"))?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("create temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3))
            .expect("create storage backend");
        (storage, temp)
    }

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("My Ledger 2024"), "my_ledger_2024");
        assert_eq!(canonical_name("  Café!  "), "caf__");
        assert_eq!(canonical_name(""), "ledger");
    }

    #[test]
    fn timestamp_parsing_rejects_foreign_files() {
        assert!(parse_backup_timestamp("demo_20240301_1200.json", "demo").is_some());
        assert!(parse_backup_timestamp("other_20240301_1200.json", "demo").is_none());
        assert!(parse_backup_timestamp("demo_garbage.json", "demo").is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (storage, _temp) = storage_with_temp_dir();
        let ledger = Ledger::with_defaults("Demo");
        storage.save(&ledger, "Demo").expect("save ledger");
        let loaded = storage.load("Demo").expect("load ledger");
        assert_eq!(loaded.name, "Demo");
        assert_eq!(loaded.categories.len(), 15);
    }

    #[test]
    fn load_or_init_seeds_missing_ledgers() {
        let (storage, _temp) = storage_with_temp_dir();
        let ledger = storage.load_or_init("Fresh").expect("seed ledger");
        assert_eq!(ledger.accounts.len(), 3);
        assert!(!storage.ledger_exists("Fresh"));
    }

    #[test]
    fn prune_keeps_only_the_newest_backups() {
        let (storage, _temp) = storage_with_temp_dir();
        let ledger = Ledger::with_defaults("Demo");
        storage.save(&ledger, "Demo").expect("save ledger");
        for stamp in ["20240101_1000", "20240102_1000", "20240103_1000", "20240104_1000"] {
            let path = storage.backups_dir.join(format!("demo_{stamp}.json"));
            fs::write(&path, "{}").expect("write synthetic backup");
        }
        storage.backup("Demo").expect("create backup");
        let backups = storage.list_backups("Demo").expect("list backups");
        assert_eq!(backups.len(), 3);
    }

    #[test]
    fn newer_schema_is_refused() {
        let (storage, _temp) = storage_with_temp_dir();
        let mut ledger = Ledger::with_defaults("Demo");
        ledger.schema_version = CURRENT_SCHEMA_VERSION + 1;
        storage.save(&ledger, "Demo").expect("save ledger");
        let err = storage.load("Demo").expect_err("newer schema");
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
