//! Persistence contracts and the JSON-document backend.

pub mod json_backend;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::EngineError,
    journal::{Expense, RecurringExpense},
};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Persistence contract for recurrence patterns.
///
/// Implementations must share an underlying store with their
/// [`ExpenseStore`] counterpart so the generator's write ordering
/// (expenses first, marker second) survives a crash between the two.
pub trait PatternStore: Send + Sync {
    /// Validates and stores a new pattern, returning its id.
    fn insert_pattern(&self, pattern: RecurringExpense) -> Result<Uuid>;
    /// Validates and replaces an existing pattern wholesale.
    fn update_pattern(&self, pattern: RecurringExpense) -> Result<()>;
    fn pattern(&self, id: Uuid) -> Result<RecurringExpense>;
    fn list_patterns(&self) -> Result<Vec<RecurringExpense>>;
    fn list_active_patterns(&self) -> Result<Vec<RecurringExpense>>;
    /// Advances the high-water mark once occurrences through `date` have
    /// been durably persisted.
    fn update_last_generated(&self, id: Uuid, date: NaiveDate) -> Result<()>;
    fn set_pattern_active(&self, id: Uuid, active: bool) -> Result<()>;
    fn delete_pattern(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for concrete expenses.
pub trait ExpenseStore: Send + Sync {
    fn create_expense(&self, expense: Expense) -> Result<Uuid>;
    fn expense(&self, id: Uuid) -> Result<Expense>;
    fn list_expenses(&self) -> Result<Vec<Expense>>;
    fn expenses_for_pattern(&self, pattern_id: Uuid) -> Result<Vec<Expense>>;
    fn delete_expense(&self, id: Uuid) -> Result<()>;
    /// Removes every expense the pattern generated, returning how many
    /// were deleted.
    fn delete_expenses_by_pattern(&self, pattern_id: Uuid) -> Result<usize>;
}

pub use json_backend::JsonStore;
