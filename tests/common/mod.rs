use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use once_cell::sync::Lazy;
use recurring_core::{engine::Engine, storage::JsonStore};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an engine backed by a unique scratch directory for each test.
pub fn setup_engine() -> (Engine<JsonStore>, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonStore::open(Some(base.clone()), Some(3)).expect("create json store");
    (Engine::new(Arc::new(store)), base)
}
