//! Day membership changes for a pattern.
//!
//! Adding a pattern to a day never overwrites silently: when the incoming
//! range overlaps what the day already has, the change is returned as a
//! [`ConflictDescriptor`] and only [`apply_replacement`] writes it. Removing a
//! pattern from its last day moves it to the orphan registry.
//!
//! Every call touches at most one day.

use tracing::debug;

use crate::conflict::{ConflictDescriptor, MembershipOutcome};
use crate::patterns::{OrphanRegistry, Pattern};
use crate::schedule::{WeeklySchedule, Weekday};
use crate::time_math::overlaps;

/// Adds the pattern to `day` or removes it, per `want_member`.
pub fn set_day_membership(
    schedule: &mut WeeklySchedule,
    orphans: &mut OrphanRegistry,
    pattern: &Pattern,
    day: Weekday,
    want_member: bool,
) -> MembershipOutcome {
    if want_member {
        add_to_day(schedule, pattern, day)
    } else {
        remove_from_day(schedule, orphans, pattern, day)
    }
}

fn add_to_day(schedule: &mut WeeklySchedule, pattern: &Pattern, day: Weekday) -> MembershipOutcome {
    let target = schedule.day_mut(day);
    let incoming = &pattern.range;

    if !target.is_open || target.ranges.is_empty() {
        // Ranges left behind on a closed day are not carried into the new state.
        target.ranges = vec![incoming.clone()];
        target.sync_open();
        debug!(day = %day, key = %pattern.key, "Opened day with pattern");
        return MembershipOutcome::Applied;
    }

    if target.has_key(&pattern.key) {
        return MembershipOutcome::Applied;
    }

    let overlapping: Vec<_> = target
        .ranges
        .iter()
        .filter(|r| overlaps(r, incoming))
        .cloned()
        .collect();

    if overlapping.is_empty() {
        target.ranges.push(incoming.clone());
        target.sync_open();
        debug!(day = %day, key = %pattern.key, "Added pattern to day");
        return MembershipOutcome::Applied;
    }

    debug!(
        day = %day,
        key = %pattern.key,
        conflicts = overlapping.len(),
        "Pattern overlaps existing ranges, confirmation required"
    );
    MembershipOutcome::NeedsConfirmation(ConflictDescriptor {
        target_day: day,
        incoming_pattern: pattern.clone(),
        overlapping_ranges: overlapping,
    })
}

fn remove_from_day(
    schedule: &mut WeeklySchedule,
    orphans: &mut OrphanRegistry,
    pattern: &Pattern,
    day: Weekday,
) -> MembershipOutcome {
    let target = schedule.day_mut(day);
    target.ranges.retain(|r| r.key() != pattern.key);
    target.sync_open();
    debug!(day = %day, key = %pattern.key, "Removed pattern from day");

    if schedule.days_with_key(&pattern.key).is_empty() && orphans.insert(pattern.range.clone()) {
        debug!(key = %pattern.key, "Pattern lost its last day, kept as orphan");
    }
    MembershipOutcome::Applied
}

/// Writes a confirmed replacement.
///
/// Removes the overlapping ranges recorded in the descriptor, adds the
/// incoming range, and re-sorts the day by `(start, end)`.
pub fn apply_replacement(
    schedule: &mut WeeklySchedule,
    descriptor: &ConflictDescriptor,
) -> MembershipOutcome {
    let target = schedule.day_mut(descriptor.target_day);
    let incoming = descriptor.incoming_range();
    let incoming_key = incoming.key();

    target.ranges.retain(|r| {
        let key = r.key();
        key != incoming_key && !descriptor.overlapping_ranges.iter().any(|o| o.key() == key)
    });
    target.ranges.push(incoming.clone());
    target
        .ranges
        .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    target.sync_open();

    debug!(
        day = %descriptor.target_day,
        key = %incoming_key,
        replaced = descriptor.overlapping_ranges.len(),
        "Applied confirmed replacement"
    );
    MembershipOutcome::Applied
}
