use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// How often a recurring expense repeats and on which calendar alignment.
///
/// Each variant carries exactly the fields that frequency needs, so a
/// weekly rule with a day-of-month (or similar mismatches) cannot be
/// constructed; only range validity remains to check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    /// `weekday` counts days from Sunday: 0 = Sunday through 6 = Saturday.
    Weekly { weekday: u8 },
    /// `day_of_month` above a month's length clamps to its last day.
    Monthly { day_of_month: u8 },
    Yearly { month: u8, day_of_month: u8 },
}

impl Frequency {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Frequency::Daily => Ok(()),
            Frequency::Weekly { weekday } => {
                if weekday > 6 {
                    return Err(EngineError::Validation(format!(
                        "weekday {} out of range, must be 0-6 (Sunday-Saturday)",
                        weekday
                    )));
                }
                Ok(())
            }
            Frequency::Monthly { day_of_month } => validate_day_of_month(day_of_month),
            Frequency::Yearly {
                month,
                day_of_month,
            } => {
                if !(1..=12).contains(&month) {
                    return Err(EngineError::Validation(format!(
                        "month {} out of range, must be 1-12",
                        month
                    )));
                }
                validate_day_of_month(day_of_month)
            }
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Frequency::Daily => "Daily".into(),
            Frequency::Weekly { weekday } => format!("Weekly on {}", weekday_name(weekday)),
            Frequency::Monthly { day_of_month } => format!("Monthly on day {}", day_of_month),
            Frequency::Yearly {
                month,
                day_of_month,
            } => format!("Yearly on {:02}-{:02}", month, day_of_month),
        }
    }
}

fn validate_day_of_month(day: u8) -> Result<()> {
    if !(1..=31).contains(&day) {
        return Err(EngineError::Validation(format!(
            "day of month {} out of range, must be 1-31",
            day
        )));
    }
    Ok(())
}

fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "invalid weekday",
    }
}
