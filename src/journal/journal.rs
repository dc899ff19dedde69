use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{expense::Expense, pattern::RecurringExpense};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The persisted aggregate: every recurrence pattern and every expense in
/// one document, so pattern and expense writes share a single unit of
/// consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    pub patterns: Vec<RecurringExpense>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Journal::schema_version_default")]
    pub schema_version: u8,
}

impl Journal {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            patterns: Vec::new(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_pattern(&mut self, pattern: RecurringExpense) -> Uuid {
        let id = pattern.id;
        self.patterns.push(pattern);
        self.touch();
        id
    }

    pub fn pattern(&self, id: Uuid) -> Option<&RecurringExpense> {
        self.patterns.iter().find(|pattern| pattern.id == id)
    }

    pub fn pattern_mut(&mut self, id: Uuid) -> Option<&mut RecurringExpense> {
        self.patterns.iter_mut().find(|pattern| pattern.id == id)
    }

    pub fn remove_pattern(&mut self, id: Uuid) -> Option<RecurringExpense> {
        let index = self.patterns.iter().position(|pattern| pattern.id == id)?;
        let removed = self.patterns.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        let removed = self.expenses.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn expenses_for_pattern(&self, pattern_id: Uuid) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|expense| expense.recurring_expense_id == Some(pattern_id))
            .collect()
    }

    pub fn remove_expenses_for_pattern(&mut self, pattern_id: Uuid) -> usize {
        let before = self.expenses.len();
        self.expenses
            .retain(|expense| expense.recurring_expense_id != Some(pattern_id));
        let removed = before - self.expenses.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}
