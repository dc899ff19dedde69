use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category::CategorySnapshot, pattern::RecurringExpense};

/// A concrete expense dated on a single calendar day.
///
/// `recurring_expense_id` is a weak back-reference: it records which
/// pattern produced the expense so cascade deletion can find it later, but
/// the expense's lifecycle is otherwise independent of the pattern's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: CategorySnapshot,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_expense_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(date: NaiveDate, amount: Decimal, category: CategorySnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            category,
            note: String::new(),
            recurring_expense_id: None,
            created_at: Utc::now(),
        }
    }

    /// Materializes one occurrence of a pattern: amount, category, and note
    /// are snapshotted from the pattern as it stands today.
    pub fn from_pattern(pattern: &RecurringExpense, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount: pattern.amount,
            category: pattern.category.clone(),
            note: pattern.note.clone(),
            recurring_expense_id: Some(pattern.id),
            created_at: Utc::now(),
        }
    }
}
