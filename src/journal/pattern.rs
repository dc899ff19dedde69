use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, Result};

use super::{category::CategorySnapshot, frequency::Frequency};

/// A recurrence definition from which concrete expenses are generated.
///
/// `last_generated` is the high-water mark: the date of the most recently
/// materialized occurrence. Generation never revisits dates at or before
/// it, which is what makes repeated runs idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: CategorySnapshot,
    #[serde(default)]
    pub note: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_generated: Option<NaiveDate>,
    #[serde(default = "RecurringExpense::default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringExpense {
    pub fn new(
        amount: Decimal,
        category: CategorySnapshot,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            note: String::new(),
            frequency,
            start_date,
            end_date: None,
            last_generated: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Range-checks the pattern fields. Runs when a pattern is created or
    /// updated, never during generation.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(EngineError::Validation(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        self.frequency.validate()?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(EngineError::Validation(format!(
                    "end date {} precedes start date {}",
                    end, self.start_date
                )));
            }
        }
        Ok(())
    }

    /// Advances the high-water mark after occurrences through `through`
    /// have been durably persisted.
    pub fn mark_generated(&mut self, through: NaiveDate) {
        self.last_generated = Some(through);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn default_active() -> bool {
        true
    }
}
