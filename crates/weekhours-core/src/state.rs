//! Caller-side state container.
//!
//! [`ScheduleEditor`] owns the week, the orphan registry, and the pattern
//! order, and re-derives patterns whenever they are read. Pattern arguments
//! are references (key or 1-based display index) resolved against a fresh
//! derivation, so a stale [`Pattern`] can never be applied.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assignment::{apply_replacement, set_day_membership};
use crate::conflict::{ConflictDescriptor, MembershipOutcome};
use crate::editor::{normalize_on_blur, update_pattern_range};
use crate::error::{Result, ScheduleError};
use crate::orphans::{create_orphan, delete_orphan};
use crate::patterns::{derive_schedule_patterns, OrphanRegistry, Pattern, PatternOrder};
use crate::schedule::{WeeklySchedule, Weekday};
use crate::status::{opening_status, OpeningStatus, StatusThresholds};
use crate::time_math::{PatternKey, RangeField, TimeRange};
use crate::validation::{ScheduleValidator, ValidationReport};

/// Everything that must survive between edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    /// The week, as loaded from and saved to persistence.
    pub schedule: WeeklySchedule,
    /// Patterns currently assigned to no day.
    #[serde(default)]
    pub orphans: OrphanRegistry,
    /// Display order of pattern keys.
    #[serde(default)]
    pub order: PatternOrder,
}

impl EditorState {
    /// Starts editing a loaded week with empty side state.
    pub fn new(schedule: WeeklySchedule) -> Self {
        Self {
            schedule,
            orphans: OrphanRegistry::new(),
            order: PatternOrder::new(),
        }
    }

    /// Parses state from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes state to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Applies pattern operations to an owned [`EditorState`].
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    state: EditorState,
    validator: ScheduleValidator,
}

impl ScheduleEditor {
    /// Creates an editor over existing state.
    pub fn new(state: EditorState) -> Result<Self> {
        let mut editor = Self {
            state,
            validator: ScheduleValidator::new()?,
        };
        // Bring the order in line with whatever was loaded.
        editor.patterns();
        Ok(editor)
    }

    /// Current state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Releases the state for saving.
    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// Range checks used before saving.
    pub fn validator(&self) -> &ScheduleValidator {
        &self.validator
    }

    /// Current week.
    pub fn schedule(&self) -> &WeeklySchedule {
        &self.state.schedule
    }

    /// Derives the current patterns in display order.
    pub fn patterns(&mut self) -> Vec<Pattern> {
        derive_schedule_patterns(
            &self.state.schedule,
            &mut self.state.orphans,
            &mut self.state.order,
        )
    }

    /// Resolves a key (`09:00|13:00`) or 1-based display index (`2`).
    pub fn pattern(&mut self, reference: &str) -> Result<Pattern> {
        let patterns = self.patterns();
        let reference = reference.trim();
        if let Ok(index) = reference.parse::<usize>() {
            if let Some(pattern) = index.checked_sub(1).and_then(|i| patterns.get(i)) {
                return Ok(pattern.clone());
            }
        }
        let key = PatternKey::from(reference);
        patterns
            .into_iter()
            .find(|p| p.key == key)
            .ok_or_else(|| ScheduleError::PatternNotFound(reference.to_string()))
    }

    /// Adds or removes a day from a pattern.
    pub fn set_day_membership(
        &mut self,
        reference: &str,
        day: Weekday,
        want_member: bool,
    ) -> Result<MembershipOutcome> {
        let pattern = self.pattern(reference)?;
        let outcome = set_day_membership(
            &mut self.state.schedule,
            &mut self.state.orphans,
            &pattern,
            day,
            want_member,
        );
        if outcome.is_applied() {
            info!(key = %pattern.key, day = %day, member = want_member, "Membership updated");
        }
        Ok(outcome)
    }

    /// Writes a confirmed replacement.
    pub fn apply_replacement(&mut self, descriptor: &ConflictDescriptor) -> MembershipOutcome {
        let outcome = apply_replacement(&mut self.state.schedule, descriptor);
        info!(
            day = %descriptor.target_day,
            key = %descriptor.incoming_pattern.key,
            "Replacement confirmed"
        );
        outcome
    }

    /// Edits one field of a pattern's range. Returns the edited pattern's new key.
    pub fn update_range(
        &mut self,
        reference: &str,
        field: RangeField,
        value: &str,
    ) -> Result<PatternKey> {
        let pattern = self.pattern(reference)?;
        update_pattern_range(
            &mut self.state.schedule,
            &mut self.state.orphans,
            &mut self.state.order,
            &pattern,
            field,
            value,
        );
        let mut range = pattern.range.clone();
        range.set_field(field, value);
        Ok(range.key())
    }

    /// Normalizes a field after editing. Returns whether it changed.
    pub fn normalize_on_blur(&mut self, reference: &str, field: RangeField) -> Result<bool> {
        let pattern = self.pattern(reference)?;
        Ok(normalize_on_blur(
            &mut self.state.schedule,
            &mut self.state.orphans,
            &mut self.state.order,
            &pattern,
            field,
        ))
    }

    /// Creates an unassigned pattern.
    pub fn create_orphan(&mut self, initial: Option<TimeRange>) -> bool {
        self.patterns();
        create_orphan(&mut self.state.orphans, &mut self.state.order, initial)
    }

    /// Deletes an unassigned pattern.
    pub fn delete_orphan(&mut self, key: &PatternKey) -> bool {
        delete_orphan(&mut self.state.orphans, &mut self.state.order, key)
    }

    /// Validates the week before saving.
    pub fn validate(&self) -> ValidationReport {
        self.validator.validate(&self.state.schedule)
    }

    /// Opening status at a given day and minute.
    pub fn status(
        &self,
        day: Weekday,
        minutes: u32,
        thresholds: StatusThresholds,
    ) -> OpeningStatus {
        opening_status(&self.state.schedule, day, minutes, thresholds)
    }
}
