//! Engine configuration persisted next to the journal document.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::{EngineError, Result},
    utils::paths::{app_data_dir, config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_MAX_OCCURRENCES_PER_RUN: usize = 365;
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// Tuning knobs for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on occurrences one pattern may generate in a single run.
    #[serde(default = "Config::default_max_occurrences")]
    pub max_occurrences_per_run: usize,
    /// How many journal backups to keep before the oldest are pruned.
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.max_occurrences_per_run == 0 {
            return Err(EngineError::Config(
                "max_occurrences_per_run must be at least 1".into(),
            ));
        }
        if self.backup_retention == 0 {
            return Err(EngineError::Config(
                "backup_retention must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn default_max_occurrences() -> usize {
        DEFAULT_MAX_OCCURRENCES_PER_RUN
    }

    pub fn default_backup_retention() -> usize {
        DEFAULT_BACKUP_RETENTION
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_occurrences_per_run: DEFAULT_MAX_OCCURRENCES_PER_RUN,
            backup_retention: DEFAULT_BACKUP_RETENTION,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Loads the stored configuration, or defaults when no file exists yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
