//! Ledger persistence.

pub mod json_backend;

pub use json_backend::JsonStorage;

use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::ledger::Ledger;

pub const LEDGER_EXTENSION: &str = "json";
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// Persistence seam for ledger files and their backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<(), StoreError>;
    fn load(&self, name: &str) -> Result<Ledger, StoreError>;
    fn backup(&self, name: &str) -> Result<PathBuf, StoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<PathBuf>, StoreError>;
    fn restore(&self, name: &str, backup: &Path) -> Result<Ledger, StoreError>;
}
