//! Error types for period-algebra operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// A timestamp string could not be parsed.
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// A period-defining pair where `start` comes after `end`.
    #[error("start must be less than or equal to end.")]
    StartAfterEnd {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A minutes argument outside its allowed domain.
    #[error("The parameter {parameter} is out of range.")]
    OutOfRange { parameter: &'static str, value: i64 },
}

pub type Result<T> = std::result::Result<T, PeriodError>;
