//! Range validation for callers about to persist a week.
//!
//! The pattern operations accept any strings; this is the check that runs
//! before saving. Closed days are skipped. Every range of an open day needs
//! both times in `HH:MM` (00:00-23:59) with the end strictly after the start.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::error::Result;
use crate::schedule::{WeeklySchedule, Weekday};
use crate::time_math::{to_minutes, RangeField, TimeRange};

const TIME_PATTERN: &str = r"^([01]\d|2[0-3]):([0-5]\d)$";

/// Problem found with one field of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeIssue {
    /// Field is blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Field is not `HH:MM`.
    #[error("{0} must be in HH:MM format (00:00 - 23:59)")]
    InvalidFormat(&'static str),

    /// End is at or before start.
    #[error("end time must be after start time")]
    EndNotAfterStart,
}

/// Issues for a single range, per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<RangeIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<RangeIssue>,
}

impl RangeErrors {
    /// Returns true if neither field has an issue.
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }

    /// Issue for one field.
    pub fn get(&self, field: RangeField) -> Option<RangeIssue> {
        match field {
            RangeField::StartTime => self.start_time,
            RangeField::EndTime => self.end_time,
        }
    }
}

/// Validation result for a week, keyed by day then range index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    days: BTreeMap<Weekday, BTreeMap<usize, RangeErrors>>,
}

impl ValidationReport {
    /// Returns true if no range has an issue.
    pub fn is_valid(&self) -> bool {
        self.days.is_empty()
    }

    /// Issues for one range of one day.
    pub fn range(&self, day: Weekday, index: usize) -> Option<&RangeErrors> {
        self.days.get(&day)?.get(&index)
    }

    /// Flattened `(day, index, errors)` entries in week order.
    pub fn entries(&self) -> impl Iterator<Item = (Weekday, usize, &RangeErrors)> + '_ {
        self.days
            .iter()
            .flat_map(|(day, ranges)| ranges.iter().map(move |(i, e)| (*day, *i, e)))
    }

    /// Number of ranges with at least one issue.
    pub fn error_count(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }
}

/// Compiled time-format checks.
#[derive(Debug, Clone)]
pub struct ScheduleValidator {
    time_format: Regex,
}

impl ScheduleValidator {
    /// Creates a validator.
    pub fn new() -> Result<Self> {
        Ok(Self {
            time_format: Regex::new(TIME_PATTERN)?,
        })
    }

    /// Returns true if `value` is a well-formed `HH:MM` time.
    pub fn is_valid_time(&self, value: &str) -> bool {
        self.time_format.is_match(value.trim())
    }

    /// Validates one range.
    pub fn validate_range(&self, range: &TimeRange) -> RangeErrors {
        let start_time = self.check_time(&range.start_time, RangeField::StartTime);
        let mut end_time = self.check_time(&range.end_time, RangeField::EndTime);

        if start_time.is_none()
            && end_time.is_none()
            && to_minutes(&range.end_time) <= to_minutes(&range.start_time)
        {
            end_time = Some(RangeIssue::EndNotAfterStart);
        }

        RangeErrors {
            start_time,
            end_time,
        }
    }

    /// Validates every range of every open day.
    pub fn validate(&self, schedule: &WeeklySchedule) -> ValidationReport {
        let mut report = ValidationReport::default();
        for day in schedule.days().iter().filter(|d| d.is_open) {
            for (index, range) in day.ranges.iter().enumerate() {
                let errors = self.validate_range(range);
                if !errors.is_empty() {
                    report
                        .days
                        .entry(day.day_of_week)
                        .or_default()
                        .insert(index, errors);
                }
            }
        }
        report
    }

    fn check_time(&self, value: &str, field: RangeField) -> Option<RangeIssue> {
        if value.trim().is_empty() {
            Some(RangeIssue::Required(field.name()))
        } else if !self.is_valid_time(value) {
            Some(RangeIssue::InvalidFormat(field.name()))
        } else {
            None
        }
    }
}
