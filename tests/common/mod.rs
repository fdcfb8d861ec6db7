use std::sync::Mutex;

use daybook_core::config::ConfigManager;
use daybook_core::storage::JsonStorage;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated storage backend and config manager for each test.
pub fn setup_test_env() -> (JsonStorage, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage =
        JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage backend");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (storage, config_manager)
}
