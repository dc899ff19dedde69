use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".recurring_core";
const JOURNAL_FILE: &str = "journal.json";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.recurring_core`.
///
/// `RECURRING_CORE_HOME` overrides the location, which is how tests and
/// embedders point the engine at a scratch directory.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("RECURRING_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path to the journal document inside a data directory.
pub fn journal_file_in(base: &Path) -> PathBuf {
    base.join(JOURNAL_FILE)
}

/// Directory holding timestamped journal backups.
pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

/// Path to the engine configuration file.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Creates the directory (and any missing parents) when absent.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
