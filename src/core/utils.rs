use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "DAYBOOK_HOME";
const DEFAULT_DIR_NAME: &str = ".daybook";
pub(crate) const LEDGER_DIR: &str = "ledgers";
pub(crate) const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Base data directory. `DAYBOOK_HOME` overrides the default location under
/// the user's home directory.
pub fn app_data_dir() -> PathBuf {
    if let Ok(custom) = env::var(HOME_ENV) {
        if !custom.trim().is_empty() {
            return PathBuf::from(custom);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ledgers_dir() -> PathBuf {
    app_data_dir().join(LEDGER_DIR)
}

pub fn backups_root() -> PathBuf {
    app_data_dir().join(BACKUP_DIR)
}

pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
