use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};
use uuid::Uuid;

use crate::{
    errors::EngineError,
    journal::{Expense, Journal, RecurringExpense, CURRENT_SCHEMA_VERSION},
    utils::paths::{app_data_dir, backups_dir_in, ensure_dir, journal_file_in},
};

use super::{ExpenseStore, PatternStore, Result};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const BACKUP_PREFIX: &str = "journal";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// File-backed store implementing both persistence contracts over one
/// journal document.
///
/// Every mutation rewrites the whole document through a tmp-file-and-rename
/// sequence, so readers never observe a half-written journal. The in-memory
/// copy behind the mutex is the source of truth between writes; the mutex
/// also serializes concurrent store calls.
#[derive(Debug)]
pub struct JsonStore {
    base: PathBuf,
    journal_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    journal: Mutex<Journal>,
}

impl JsonStore {
    /// Opens (or initializes) the store rooted at `root`, defaulting to the
    /// application data directory. `retention` bounds how many backups are
    /// kept; it is clamped to at least one.
    pub fn open(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        let backups_dir = backups_dir_in(&base);
        ensure_dir(&backups_dir)?;
        let journal_path = journal_file_in(&base);
        let journal = if journal_path.exists() {
            load_journal_from_path(&journal_path)?
        } else {
            Journal::new()
        };
        Ok(Self {
            base,
            journal_path,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
            journal: Mutex::new(journal),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Snapshot of the current journal, mainly for reporting callers.
    pub fn journal(&self) -> Result<Journal> {
        Ok(self.lock()?.clone())
    }

    /// Writes a timestamped backup of the journal, pruning the oldest files
    /// beyond the retention limit. Returns the backup file name.
    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let journal = self.lock()?.clone();
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = String::from(BACKUP_PREFIX);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        stem.push('_');
        stem.push_str(&timestamp);
        let name = format!("{}.{}", stem, BACKUP_EXTENSION);
        let path = self.backups_dir.join(&name);
        let json = serde_json::to_string_pretty(&journal)?;
        write_atomic(&path, &json)?;
        self.prune_backups()?;
        Ok(name)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    /// Replaces the journal with the named backup, both on disk and in the
    /// cached copy.
    pub fn restore(&self, backup_name: &str) -> Result<()> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(EngineError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let restored = load_journal_from_path(&path)?;
        save_journal_to_path(&restored, &self.journal_path)?;
        *self.lock()? = restored;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Journal>> {
        self.journal
            .lock()
            .map_err(|_| EngineError::Storage("journal cache poisoned".into()))
    }

    /// Applies a mutation to a staged copy of the journal, persists it
    /// atomically, and only then commits it to the cache. An error from the
    /// mutation or the write leaves both the cache and the file untouched.
    fn with_journal<T>(&self, apply: impl FnOnce(&mut Journal) -> Result<T>) -> Result<T> {
        let mut journal = self.lock()?;
        let mut staged = journal.clone();
        let value = apply(&mut staged)?;
        save_journal_to_path(&staged, &self.journal_path)?;
        *journal = staged;
        Ok(value)
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(name));
        }
        Ok(())
    }
}

impl PatternStore for JsonStore {
    fn insert_pattern(&self, pattern: RecurringExpense) -> Result<Uuid> {
        pattern.validate()?;
        self.with_journal(|journal| Ok(journal.add_pattern(pattern)))
    }

    fn update_pattern(&self, pattern: RecurringExpense) -> Result<()> {
        pattern.validate()?;
        self.with_journal(|journal| {
            let slot = journal
                .pattern_mut(pattern.id)
                .ok_or(EngineError::PatternNotFound(pattern.id))?;
            *slot = pattern;
            slot.touch();
            journal.touch();
            Ok(())
        })
    }

    fn pattern(&self, id: Uuid) -> Result<RecurringExpense> {
        self.lock()?
            .pattern(id)
            .cloned()
            .ok_or(EngineError::PatternNotFound(id))
    }

    fn list_patterns(&self) -> Result<Vec<RecurringExpense>> {
        Ok(self.lock()?.patterns.clone())
    }

    fn list_active_patterns(&self) -> Result<Vec<RecurringExpense>> {
        Ok(self
            .lock()?
            .patterns
            .iter()
            .filter(|pattern| pattern.is_active)
            .cloned()
            .collect())
    }

    fn update_last_generated(&self, id: Uuid, date: NaiveDate) -> Result<()> {
        self.with_journal(|journal| {
            let slot = journal
                .pattern_mut(id)
                .ok_or(EngineError::PatternNotFound(id))?;
            slot.mark_generated(date);
            journal.touch();
            Ok(())
        })
    }

    fn set_pattern_active(&self, id: Uuid, active: bool) -> Result<()> {
        self.with_journal(|journal| {
            let slot = journal
                .pattern_mut(id)
                .ok_or(EngineError::PatternNotFound(id))?;
            slot.is_active = active;
            slot.touch();
            journal.touch();
            Ok(())
        })
    }

    fn delete_pattern(&self, id: Uuid) -> Result<()> {
        self.with_journal(|journal| {
            journal
                .remove_pattern(id)
                .ok_or(EngineError::PatternNotFound(id))?;
            Ok(())
        })
    }
}

impl ExpenseStore for JsonStore {
    fn create_expense(&self, expense: Expense) -> Result<Uuid> {
        self.with_journal(|journal| Ok(journal.add_expense(expense)))
    }

    fn expense(&self, id: Uuid) -> Result<Expense> {
        self.lock()?
            .expense(id)
            .cloned()
            .ok_or(EngineError::ExpenseNotFound(id))
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.lock()?.expenses.clone())
    }

    fn expenses_for_pattern(&self, pattern_id: Uuid) -> Result<Vec<Expense>> {
        Ok(self
            .lock()?
            .expenses_for_pattern(pattern_id)
            .into_iter()
            .cloned()
            .collect())
    }

    fn delete_expense(&self, id: Uuid) -> Result<()> {
        self.with_journal(|journal| {
            journal
                .remove_expense(id)
                .ok_or(EngineError::ExpenseNotFound(id))?;
            Ok(())
        })
    }

    fn delete_expenses_by_pattern(&self, pattern_id: Uuid) -> Result<usize> {
        self.with_journal(|journal| Ok(journal.remove_expenses_for_pattern(pattern_id)))
    }
}

pub fn save_journal_to_path(journal: &Journal, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(journal)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_journal_from_path(path: &Path) -> Result<Journal> {
    let data = fs::read_to_string(path)?;
    let journal: Journal = serde_json::from_str(&data)?;
    if journal.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(EngineError::Storage(format!(
            "journal schema v{} is newer than supported v{}",
            journal.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(journal)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    if segments.len() < 3 {
        return None;
    }
    let time_part = segments.last()?;
    let date_part = segments.get(segments.len() - 2)?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 4) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
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
