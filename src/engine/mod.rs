//! The engine facade: pattern lifecycle plus serialized generation runs.

pub mod generator;

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    errors::{EngineError, Result},
    journal::RecurringExpense,
    storage::{ExpenseStore, JsonStore, PatternStore},
};

pub use generator::{GenerationLimits, GenerationReport, PatternOutcome};

/// How pattern deletion treats previously generated expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the pattern only; its expenses keep their back-reference as
    /// an inert historical tag.
    Detach,
    /// Remove the pattern and every expense it generated.
    Cascade,
}

/// Coordinates a store pair: create and edit patterns, run catch-up
/// generation, delete with or without cascade.
///
/// At most one generation run is in flight per engine. The hosting
/// application may trigger runs from several lifecycle events in quick
/// succession; overlapping calls get [`EngineError::GenerationInProgress`]
/// rather than racing each other over the same high-water marks.
pub struct Engine<S: PatternStore + ExpenseStore> {
    store: Arc<S>,
    limits: GenerationLimits,
    run_guard: Mutex<()>,
}

impl Engine<JsonStore> {
    /// Opens a JSON-backed engine under the application data directory,
    /// honoring the stored configuration.
    pub fn open_default() -> Result<Self> {
        let config = ConfigManager::new()?.load()?;
        let store = JsonStore::open(None, Some(config.backup_retention))?;
        Ok(Self::with_config(Arc::new(store), &config))
    }
}

impl<S: PatternStore + ExpenseStore> Engine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            limits: GenerationLimits::default(),
            run_guard: Mutex::new(()),
        }
    }

    pub fn with_config(store: Arc<S>, config: &Config) -> Self {
        Self {
            store,
            limits: GenerationLimits::from(config),
            run_guard: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Materializes every occurrence due on or before `as_of` and advances
    /// each pattern's high-water mark.
    ///
    /// `as_of` always comes from the caller; the engine never reads the
    /// clock, so runs are reproducible and timezone-deterministic.
    pub fn generate_due(&self, as_of: NaiveDate) -> Result<GenerationReport> {
        let _guard = self
            .run_guard
            .try_lock()
            .map_err(|_| EngineError::GenerationInProgress)?;
        generator::run(self.store.as_ref(), as_of, &self.limits)
    }

    pub fn create_pattern(&self, pattern: RecurringExpense) -> Result<Uuid> {
        self.store.insert_pattern(pattern)
    }

    pub fn update_pattern(&self, pattern: RecurringExpense) -> Result<()> {
        self.store.update_pattern(pattern)
    }

    /// Pauses or resumes a pattern. Deactivation freezes generation but
    /// leaves history and the high-water mark untouched, so reactivating
    /// catches up the entire inactive gap on the next run. Callers that do
    /// not want the back-fill call [`Engine::mark_generated_through`] with
    /// the current date before resuming.
    pub fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        self.store.set_pattern_active(id, active)
    }

    /// Advances the high-water mark without generating anything.
    pub fn mark_generated_through(&self, id: Uuid, date: NaiveDate) -> Result<()> {
        self.store.update_last_generated(id, date)
    }

    /// Deletes a pattern. [`DeleteMode::Cascade`] also removes every
    /// expense the pattern generated and returns how many were deleted;
    /// [`DeleteMode::Detach`] leaves them in place and returns zero.
    pub fn delete_pattern(&self, id: Uuid, mode: DeleteMode) -> Result<usize> {
        self.store.delete_pattern(id)?;
        match mode {
            DeleteMode::Detach => Ok(0),
            DeleteMode::Cascade => self.store.delete_expenses_by_pattern(id),
        }
    }
}
