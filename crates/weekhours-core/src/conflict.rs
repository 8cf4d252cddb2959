//! Pending overlap conflicts.

use serde::Serialize;

use crate::patterns::Pattern;
use crate::schedule::Weekday;
use crate::time_math::TimeRange;

/// An add-to-day that would overlap the day's existing ranges.
///
/// Holding one changes nothing. The caller shows it to the operator and
/// either passes it to [`crate::assignment::apply_replacement`] or drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDescriptor {
    /// Day the pattern was being added to.
    pub target_day: Weekday,
    /// Pattern being added.
    pub incoming_pattern: Pattern,
    /// Existing ranges of the day that overlap the incoming range.
    pub overlapping_ranges: Vec<TimeRange>,
}

impl ConflictDescriptor {
    /// The range that will replace the overlapping ones.
    pub fn incoming_range(&self) -> &TimeRange {
        &self.incoming_pattern.range
    }

    /// One-line summary for confirmation prompts.
    pub fn summary(&self) -> String {
        let existing: Vec<String> = self
            .overlapping_ranges
            .iter()
            .map(ToString::to_string)
            .collect();
        format!(
            "{} already has {} which overlaps {}",
            self.target_day,
            existing.join(", "),
            self.incoming_range()
        )
    }
}

/// Outcome of a membership change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum MembershipOutcome {
    /// The week was updated.
    Applied,
    /// Nothing was written; the operator must confirm a replacement first.
    NeedsConfirmation(ConflictDescriptor),
}

impl MembershipOutcome {
    /// Returns true if the change was written.
    pub fn is_applied(&self) -> bool {
        matches!(self, MembershipOutcome::Applied)
    }

    /// The pending conflict, if any.
    pub fn conflict(&self) -> Option<&ConflictDescriptor> {
        match self {
            MembershipOutcome::Applied => None,
            MembershipOutcome::NeedsConfirmation(descriptor) => Some(descriptor),
        }
    }
}
