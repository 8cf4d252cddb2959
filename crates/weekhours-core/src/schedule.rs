//! Weekly schedule model: seven fixed days, each closed or open over ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::time_math::{PatternKey, TimeRange};

/// Days of the week, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns all days of the week, Monday first.
    pub fn all() -> [Weekday; 7] {
        [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
    }

    /// Position in the week, Monday = 0.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Three-letter label for compact listings.
    pub fn short_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    /// The following day, wrapping Sunday to Monday.
    pub fn next(&self) -> Weekday {
        Weekday::all()[(self.index() + 1) % 7]
    }

    /// Converts from chrono's Weekday.
    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Weekday::all()
            .into_iter()
            .find(|day| day.as_str() == lower || day.short_name().to_lowercase() == lower)
            .ok_or_else(|| ScheduleError::InvalidDay(s.to_string()))
    }
}

/// Opening state of one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Which day this is. Never changes after construction.
    pub day_of_week: Weekday,
    /// Whether the establishment opens at all that day.
    pub is_open: bool,
    /// Opening intervals, in display order.
    #[serde(default, alias = "scheduleRanges")]
    pub ranges: Vec<TimeRange>,
}

impl DaySchedule {
    /// A closed day with no ranges.
    pub fn closed(day: Weekday) -> Self {
        Self {
            day_of_week: day,
            is_open: false,
            ranges: Vec::new(),
        }
    }

    /// An open day with the given ranges.
    pub fn open(day: Weekday, ranges: Vec<TimeRange>) -> Self {
        let mut schedule = Self {
            day_of_week: day,
            is_open: true,
            ranges,
        };
        schedule.sync_open();
        schedule
    }

    /// Recomputes `is_open` from the range count.
    pub fn sync_open(&mut self) {
        self.is_open = !self.ranges.is_empty();
    }

    /// Ranges that count toward patterns: none when the day is closed.
    pub fn active_ranges(&self) -> &[TimeRange] {
        if self.is_open {
            &self.ranges
        } else {
            &[]
        }
    }

    /// True when an open range of this day has the given key.
    pub fn has_key(&self, key: &PatternKey) -> bool {
        self.active_ranges().iter().any(|r| &r.key() == key)
    }
}

/// The full week, always exactly seven days stored Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: Vec<DaySchedule>,
}

impl WeeklySchedule {
    /// A week with every day closed.
    pub fn closed() -> Self {
        Self {
            days: Weekday::all().into_iter().map(DaySchedule::closed).collect(),
        }
    }

    /// Builds a week from loaded days in any order.
    ///
    /// Each weekday must appear exactly once.
    pub fn from_days(days: Vec<DaySchedule>) -> Result<Self> {
        let mut slots: [Option<DaySchedule>; 7] = Default::default();
        for day in days {
            let slot = &mut slots[day.day_of_week.index()];
            if slot.is_some() {
                return Err(ScheduleError::DuplicateDay(day.day_of_week));
            }
            *slot = Some(day);
        }

        let mut ordered = Vec::with_capacity(7);
        for (weekday, slot) in Weekday::all().into_iter().zip(slots) {
            ordered.push(slot.ok_or(ScheduleError::MissingDay(weekday))?);
        }
        Ok(Self { days: ordered })
    }

    /// Returns one day.
    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[day.index()]
    }

    /// Returns one day mutably.
    pub fn day_mut(&mut self, day: Weekday) -> &mut DaySchedule {
        &mut self.days[day.index()]
    }

    /// All days, Monday first.
    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    /// Sets a day's ranges and recomputes its open flag.
    pub fn set_ranges(&mut self, day: Weekday, ranges: Vec<TimeRange>) {
        let schedule = self.day_mut(day);
        schedule.ranges = ranges;
        schedule.sync_open();
    }

    /// Days whose open ranges include the given key.
    pub fn days_with_key(&self, key: &PatternKey) -> Vec<Weekday> {
        self.days
            .iter()
            .filter(|d| d.has_key(key))
            .map(|d| d.day_of_week)
            .collect()
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::closed()
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let days = Vec::<DaySchedule>::deserialize(deserializer)?;
        WeeklySchedule::from_days(days).map_err(serde::de::Error::custom)
    }
}
