//! Schedule error types.

use thiserror::Error;

use crate::schedule::Weekday;

/// Errors raised at the boundary where caller input is turned into typed values.
///
/// The pattern operations themselves are total; these only surface when a
/// day name, field name, or pattern reference cannot be resolved.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Unknown day-of-week name.
    #[error("invalid day of week: {0}")]
    InvalidDay(String),

    /// A loaded week is missing one of the seven days.
    #[error("schedule is missing {0}")]
    MissingDay(Weekday),

    /// A loaded week lists the same day twice.
    #[error("schedule lists {0} more than once")]
    DuplicateDay(Weekday),

    /// Pattern reference does not match any current pattern.
    #[error("pattern not found: {0}")]
    PatternNotFound(String),

    /// Range field name other than `startTime` / `endTime`.
    #[error("invalid range field: {0}")]
    InvalidField(String),

    /// Validator regex failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
