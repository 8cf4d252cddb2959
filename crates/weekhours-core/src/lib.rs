//! Weekhours Core - weekly opening-hours patterns.
//!
//! A week is seven fixed days, each closed or open over one or more ranges.
//! Operators edit it as *patterns*: distinct ranges together with the days
//! that use them. This crate derives those patterns and applies edits back
//! to the week:
//!
//! - [`patterns`] derives patterns with a stable display order
//! - [`assignment`] adds/removes a day, asking for confirmation on overlap
//! - [`editor`] rewrites a pattern's range on every day that uses it
//! - [`orphans`] creates and deletes patterns that have no days
//! - [`validation`] checks ranges before the week is persisted
//! - [`status`] answers "open now?" for a week
//!
//! # Example
//!
//! ```
//! use weekhours_core::{EditorState, RangeField, ScheduleEditor, TimeRange, Weekday, WeeklySchedule};
//!
//! let mut week = WeeklySchedule::closed();
//! week.set_ranges(Weekday::Monday, vec![TimeRange::new("09:00", "13:00")]);
//! week.set_ranges(Weekday::Tuesday, vec![TimeRange::new("09:00", "13:00")]);
//!
//! let mut editor = ScheduleEditor::new(EditorState::new(week)).unwrap();
//! assert_eq!(editor.patterns().len(), 1);
//!
//! editor.set_day_membership("1", Weekday::Wednesday, true).unwrap();
//! editor.update_range("1", RangeField::EndTime, "14:00").unwrap();
//! assert_eq!(
//!     editor.schedule().day(Weekday::Wednesday).ranges,
//!     vec![TimeRange::new("09:00", "14:00")]
//! );
//! ```

pub mod assignment;
pub mod conflict;
pub mod editor;
pub mod error;
pub mod orphans;
pub mod patterns;
pub mod schedule;
pub mod state;
pub mod status;
pub mod time_math;
pub mod validation;

pub use assignment::{apply_replacement, set_day_membership};
pub use conflict::{ConflictDescriptor, MembershipOutcome};
pub use editor::{normalize_on_blur, update_pattern_range};
pub use error::{Result, ScheduleError};
pub use orphans::{create_orphan, delete_orphan};
pub use patterns::{derive_schedule_patterns, OrphanRegistry, Pattern, PatternOrder};
pub use schedule::{DaySchedule, WeeklySchedule, Weekday};
pub use state::{EditorState, ScheduleEditor};
pub use status::{
    next_opening, opening_status, opening_status_now, NextOpening, OpeningStatus,
    StatusThresholds,
};
pub use time_math::{normalize_time, overlaps, to_minutes, PatternKey, RangeField, TimeRange};
pub use validation::{RangeErrors, RangeIssue, ScheduleValidator, ValidationReport};
