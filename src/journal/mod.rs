//! Recurring-expense domain models and the pure occurrence calculator.

pub mod category;
pub mod expense;
pub mod frequency;
#[allow(clippy::module_inception)]
pub mod journal;
pub mod occurrence;
pub mod pattern;

pub use category::CategorySnapshot;
pub use expense::Expense;
pub use frequency::Frequency;
pub use journal::{Journal, CURRENT_SCHEMA_VERSION};
pub use occurrence::{has_ended, next_occurrence};
pub use pattern::RecurringExpense;
