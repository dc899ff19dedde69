//! Catch-up generation: walks each active pattern from its high-water mark
//! to the as-of date, materializing one expense per due occurrence.

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::{Config, DEFAULT_MAX_OCCURRENCES_PER_RUN},
    journal::{next_occurrence, Expense, RecurringExpense},
    storage::{ExpenseStore, PatternStore, Result},
};

/// Bounds enforced during a generation run.
#[derive(Debug, Clone)]
pub struct GenerationLimits {
    /// Most occurrences a single pattern may generate per run. Protects
    /// against pathological patterns (a daily rule whose start date is
    /// years in the past) flooding the store in one pass.
    pub max_occurrences_per_run: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_occurrences_per_run: DEFAULT_MAX_OCCURRENCES_PER_RUN,
        }
    }
}

impl From<&Config> for GenerationLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_occurrences_per_run: config.max_occurrences_per_run,
        }
    }
}

/// Per-run summary returned to the caller.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub as_of: NaiveDate,
    pub outcomes: Vec<PatternOutcome>,
}

impl GenerationReport {
    pub fn total_created(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.created).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.error.is_some())
    }

    pub fn any_capped(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.capped)
    }

    pub fn outcome_for(&self, pattern_id: Uuid) -> Option<&PatternOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.pattern_id == pattern_id)
    }
}

/// What happened to one pattern during a run.
#[derive(Debug, Clone)]
pub struct PatternOutcome {
    pub pattern_id: Uuid,
    /// Occurrences durably created this run.
    pub created: usize,
    /// True when the safety cap stopped the run while more occurrences
    /// were still due; the next run resumes from the advanced marker.
    pub capped: bool,
    /// Storage failure encountered for this pattern, if any. The batch
    /// continues with the remaining patterns regardless.
    pub error: Option<String>,
}

impl PatternOutcome {
    fn new(pattern_id: Uuid) -> Self {
        Self {
            pattern_id,
            created: 0,
            capped: false,
            error: None,
        }
    }
}

/// Generates every due occurrence for every active pattern.
///
/// Failures are isolated per pattern: a storage error is recorded in that
/// pattern's outcome and processing continues. Only a failure to list the
/// active patterns aborts the run.
pub fn run<S>(store: &S, as_of: NaiveDate, limits: &GenerationLimits) -> Result<GenerationReport>
where
    S: PatternStore + ExpenseStore + ?Sized,
{
    let patterns = store.list_active_patterns()?;
    info!(
        "generation run as of {} covering {} active pattern(s)",
        as_of,
        patterns.len()
    );

    let mut outcomes = Vec::with_capacity(patterns.len());
    for pattern in &patterns {
        let outcome = generate_for_pattern(store, pattern, as_of, limits);
        if let Some(err) = outcome.error.as_deref() {
            warn!("pattern {} failed mid-run: {}", pattern.id, err);
        } else {
            debug!(
                "pattern {} created {} occurrence(s)",
                pattern.id, outcome.created
            );
        }
        outcomes.push(outcome);
    }

    Ok(GenerationReport { as_of, outcomes })
}

fn generate_for_pattern<S>(
    store: &S,
    pattern: &RecurringExpense,
    as_of: NaiveDate,
    limits: &GenerationLimits,
) -> PatternOutcome
where
    S: PatternStore + ExpenseStore + ?Sized,
{
    let mut outcome = PatternOutcome::new(pattern.id);
    let mut cursor = starting_cursor(pattern);
    let mut last_persisted: Option<NaiveDate> = None;

    loop {
        let candidate = match next_occurrence(pattern, cursor) {
            Some(date) if date <= as_of => date,
            _ => break,
        };
        if outcome.created >= limits.max_occurrences_per_run {
            // Another occurrence was still due, so this run is truncated;
            // a backlog that drains exactly at the cap is not flagged.
            outcome.capped = true;
            warn!(
                "pattern {} hit the cap of {} occurrences per run",
                pattern.id, limits.max_occurrences_per_run
            );
            break;
        }
        match store.create_expense(Expense::from_pattern(pattern, candidate)) {
            Ok(_) => {
                outcome.created += 1;
                last_persisted = Some(candidate);
                cursor = candidate;
            }
            Err(err) => {
                outcome.error = Some(err.to_string());
                break;
            }
        }
    }

    // Expenses are persisted before the marker moves; after a partial
    // failure the marker still covers every occurrence that did land, so
    // the next run retries only the rest.
    if let Some(through) = last_persisted {
        if let Err(err) = store.update_last_generated(pattern.id, through) {
            let message = format!("marker update failed: {}", err);
            outcome.error = Some(match outcome.error.take() {
                Some(existing) => format!("{}; {}", existing, message),
                None => message,
            });
        }
    }

    outcome
}

fn starting_cursor(pattern: &RecurringExpense) -> NaiveDate {
    match pattern.last_generated {
        Some(marker) => marker,
        None => pattern.start_date - Duration::days(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{CategorySnapshot, Frequency};
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn starting_cursor_precedes_start_for_fresh_patterns() {
        let mut pattern = RecurringExpense::new(
            dec!(5),
            CategorySnapshot::new("Coffee", "cup", "#8b572a"),
            Frequency::Daily,
            date(2024, 3, 10),
        );
        assert_eq!(starting_cursor(&pattern), date(2024, 3, 9));

        pattern.last_generated = Some(date(2024, 4, 2));
        assert_eq!(starting_cursor(&pattern), date(2024, 4, 2));
    }

    #[test]
    fn limits_default_to_the_configured_cap() {
        assert_eq!(
            GenerationLimits::default().max_occurrences_per_run,
            DEFAULT_MAX_OCCURRENCES_PER_RUN
        );
        let config = Config {
            max_occurrences_per_run: 12,
            backup_retention: 5,
        };
        assert_eq!(GenerationLimits::from(&config).max_occurrences_per_run, 12);
    }
}
