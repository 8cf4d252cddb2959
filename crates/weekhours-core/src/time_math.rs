//! Time arithmetic for naive local `HH:MM` values.
//!
//! Times are kept as the strings the operator typed. Pattern identity is the
//! trimmed string pair, while overlap tests go through minutes since midnight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Default range used when an operator creates a new pattern.
pub const DEFAULT_START: &str = "09:00";
/// Default end of a new pattern.
pub const DEFAULT_END: &str = "17:00";

/// Converts `HH:MM` to minutes since midnight.
///
/// Lenient: absent or malformed input yields `0`, including hours past 23
/// and minutes past 59. Format checks belong to [`crate::validation`].
pub fn to_minutes(time: &str) -> u32 {
    let Some((hours, minutes)) = time.trim().split_once(':') else {
        return 0;
    };
    match (hours.parse::<u32>(), minutes.parse::<u32>()) {
        (Ok(h), Ok(m)) if h <= 23 && m <= 59 => h * 60 + m,
        _ => 0,
    }
}

/// Half-open overlap test: ranges that only touch do not overlap.
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    to_minutes(&a.start_time) < to_minutes(&b.end_time)
        && to_minutes(&b.start_time) < to_minutes(&a.end_time)
}

/// Normalizes loose operator input into `HH:MM`.
///
/// Accepts a bare hour (`"9"` -> `"09:00"`) or a single-digit hour with
/// minutes (`"9:30"` -> `"09:30"`). Anything else is returned trimmed.
pub fn normalize_time(value: &str) -> String {
    let trimmed = value.trim();
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if all_digits(trimmed) && trimmed.len() <= 2 {
        if let Ok(hour) = trimmed.parse::<u32>() {
            if hour < 24 {
                return format!("{:02}:00", hour);
            }
        }
        return trimmed.to_string();
    }

    if let Some((hours, minutes)) = trimmed.split_once(':') {
        if hours.len() == 1 && all_digits(hours) && minutes.len() == 2 && all_digits(minutes) {
            return format!("0{}:{}", hours, minutes);
        }
    }

    trimmed.to_string()
}

/// A single opening interval.
///
/// No ordering between start and end is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    /// Opening time, `HH:MM`.
    pub start_time: String,
    /// Closing time, `HH:MM`.
    pub end_time: String,
}

impl TimeRange {
    /// Creates a new time range.
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Identity key built from the trimmed start and end.
    pub fn key(&self) -> PatternKey {
        PatternKey(format!(
            "{}|{}",
            self.start_time.trim(),
            self.end_time.trim()
        ))
    }

    /// Copy with both ends trimmed.
    pub fn trimmed(&self) -> Self {
        Self::new(self.start_time.trim(), self.end_time.trim())
    }

    /// Returns the value of one field.
    pub fn field(&self, field: RangeField) -> &str {
        match field {
            RangeField::StartTime => &self.start_time,
            RangeField::EndTime => &self.end_time,
        }
    }

    /// Overwrites one field.
    pub fn set_field(&mut self, field: RangeField, value: impl Into<String>) {
        match field {
            RangeField::StartTime => self.start_time = value.into(),
            RangeField::EndTime => self.end_time = value.into(),
        }
    }

    /// Lexicographic `(start, end)` ordering on the trimmed strings.
    pub fn sort_key(&self) -> (&str, &str) {
        (self.start_time.trim(), self.end_time.trim())
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new(DEFAULT_START, DEFAULT_END)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time.trim(), self.end_time.trim())
    }
}

/// Canonical `start|end` identity of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternKey(String);

impl PatternKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatternKey {
    fn from(value: &str) -> Self {
        PatternKey(value.to_string())
    }
}

/// Editable field of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeField {
    StartTime,
    EndTime,
}

impl RangeField {
    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            RangeField::StartTime => "startTime",
            RangeField::EndTime => "endTime",
        }
    }
}

impl FromStr for RangeField {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "startTime" | "start_time" | "start" => Ok(RangeField::StartTime),
            "endTime" | "end_time" | "end" => Ok(RangeField::EndTime),
            other => Err(ScheduleError::InvalidField(other.to_string())),
        }
    }
}
