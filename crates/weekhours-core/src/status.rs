//! Open/closed status of the establishment at a given moment.
//!
//! Ranges are half-open: open at the start minute, closed at the end minute.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::schedule::{WeeklySchedule, Weekday};
use crate::time_math::to_minutes;

/// Windows for the "closing soon" / "opening soon" states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Minutes before closing that count as closing soon.
    pub closing_soon_minutes: u32,
    /// Minutes before opening that count as opening soon.
    pub opening_soon_minutes: u32,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            closing_soon_minutes: 30,
            opening_soon_minutes: 60,
        }
    }
}

/// The next time the establishment opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextOpening {
    pub day: Weekday,
    pub start_time: String,
    /// True when the opening is later the same day.
    pub today: bool,
}

/// Status at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OpeningStatus {
    Open,
    ClosingSoon { minutes_left: u32 },
    OpeningSoon { at: String },
    /// The day has no open ranges.
    ClosedToday { next: Option<NextOpening> },
    /// Between or after today's ranges.
    Closed { next: Option<NextOpening> },
}

impl OpeningStatus {
    /// Returns true while a range is running.
    pub fn is_open(&self) -> bool {
        matches!(self, OpeningStatus::Open | OpeningStatus::ClosingSoon { .. })
    }
}

/// Status on `day` at `minutes` past midnight.
pub fn opening_status(
    schedule: &WeeklySchedule,
    day: Weekday,
    minutes: u32,
    thresholds: StatusThresholds,
) -> OpeningStatus {
    let today = schedule.day(day);
    if today.active_ranges().is_empty() {
        return OpeningStatus::ClosedToday {
            next: next_opening(schedule, day, minutes),
        };
    }

    let current = today.active_ranges().iter().find(|r| {
        let start = to_minutes(&r.start_time);
        let end = to_minutes(&r.end_time);
        start <= minutes && minutes < end
    });
    if let Some(range) = current {
        let minutes_left = to_minutes(&range.end_time) - minutes;
        return if minutes_left <= thresholds.closing_soon_minutes {
            OpeningStatus::ClosingSoon { minutes_left }
        } else {
            OpeningStatus::Open
        };
    }

    let next = next_opening(schedule, day, minutes);
    match next {
        Some(ref opening)
            if opening.today
                && to_minutes(&opening.start_time) - minutes <= thresholds.opening_soon_minutes =>
        {
            OpeningStatus::OpeningSoon {
                at: opening.start_time.clone(),
            }
        }
        _ => OpeningStatus::Closed { next },
    }
}

/// Earliest range start after `minutes` today, else on the following days.
pub fn next_opening(schedule: &WeeklySchedule, day: Weekday, minutes: u32) -> Option<NextOpening> {
    let mut candidate = day;
    for offset in 0..7 {
        let earliest = schedule
            .day(candidate)
            .active_ranges()
            .iter()
            .filter(|r| offset > 0 || to_minutes(&r.start_time) > minutes)
            .min_by_key(|r| to_minutes(&r.start_time));
        if let Some(range) = earliest {
            return Some(NextOpening {
                day: candidate,
                start_time: range.start_time.trim().to_string(),
                today: offset == 0,
            });
        }
        candidate = candidate.next();
    }
    None
}

/// Status at the current local time.
pub fn opening_status_now(schedule: &WeeklySchedule, thresholds: StatusThresholds) -> OpeningStatus {
    let now = chrono::Local::now();
    let day = Weekday::from_chrono(now.weekday());
    opening_status(schedule, day, now.hour() * 60 + now.minute(), thresholds)
}
