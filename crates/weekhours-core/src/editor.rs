//! Bulk edits of a pattern's range.
//!
//! Editing a day-bearing pattern rewrites the matching range on every day
//! that uses it. Editing an orphan rewrites the registry entry. Either way the
//! key changes, and the new key takes over the old key's display position.

use tracing::debug;

use crate::patterns::{OrphanRegistry, Pattern, PatternOrder};
use crate::schedule::WeeklySchedule;
use crate::time_math::{normalize_time, RangeField};

/// Sets one field of the pattern's range to `value`.
pub fn update_pattern_range(
    schedule: &mut WeeklySchedule,
    orphans: &mut OrphanRegistry,
    order: &mut PatternOrder,
    pattern: &Pattern,
    field: RangeField,
    value: &str,
) {
    let mut updated = pattern.range.clone();
    updated.set_field(field, value);
    let new_key = updated.key();

    if pattern.is_orphan {
        // Another orphan already owns the new key: fold into it.
        if new_key != pattern.key && orphans.contains(&new_key) {
            orphans.remove(&pattern.key);
        } else if let Some(entry) = orphans.get_mut(&pattern.key) {
            entry.set_field(field, value);
        }
    } else {
        for &day in &pattern.days {
            for range in schedule
                .day_mut(day)
                .ranges
                .iter_mut()
                .filter(|r| r.key() == pattern.key)
            {
                range.set_field(field, value);
            }
        }
    }

    order.rename(&pattern.key, new_key.clone());
    debug!(
        old_key = %pattern.key,
        new_key = %new_key,
        field = field.name(),
        days = pattern.days.len(),
        "Updated pattern range"
    );
}

/// Re-applies a field with loose input normalized.
///
/// `"9"` becomes `"09:00"` and `"9:30"` becomes `"09:30"`. Only writes when
/// normalization changed the value; returns whether it did.
pub fn normalize_on_blur(
    schedule: &mut WeeklySchedule,
    orphans: &mut OrphanRegistry,
    order: &mut PatternOrder,
    pattern: &Pattern,
    field: RangeField,
) -> bool {
    let current = pattern.range.field(field);
    let normalized = normalize_time(current);
    if normalized == current {
        return false;
    }
    update_pattern_range(schedule, orphans, order, pattern, field, &normalized);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::derive_schedule_patterns;
    use crate::schedule::Weekday;
    use crate::time_math::TimeRange;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::new(start, end)
    }

    fn derive(
        schedule: &WeeklySchedule,
        orphans: &mut OrphanRegistry,
        order: &mut PatternOrder,
    ) -> Vec<Pattern> {
        derive_schedule_patterns(schedule, orphans, order)
    }

    // ==================== Day-bearing Pattern Tests ====================

    #[test]
    fn edit_moves_all_days_together() {
        let mut schedule = WeeklySchedule::closed();
        for day in [Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday] {
            schedule.set_ranges(day, vec![range("09:00", "13:00")]);
        }
        schedule.set_ranges(Weekday::Thursday, vec![range("10:00", "13:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);

        update_pattern_range(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[0],
            RangeField::EndTime,
            "14:00",
        );

        for day in [Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday] {
            assert_eq!(schedule.day(day).ranges, vec![range("09:00", "14:00")]);
        }
        assert_eq!(
            schedule.day(Weekday::Thursday).ranges,
            vec![range("10:00", "13:00")]
        );
    }

    #[test]
    fn edit_only_touches_matching_range_of_a_day() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(
            Weekday::Friday,
            vec![range("13:00", "16:00"), range("20:00", "23:00")],
        );
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);

        update_pattern_range(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[1],
            RangeField::StartTime,
            "19:30",
        );

        assert_eq!(
            schedule.day(Weekday::Friday).ranges,
            vec![range("13:00", "16:00"), range("19:30", "23:00")]
        );
    }

    #[test]
    fn edited_pattern_keeps_display_position() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![range("09:00", "13:00")]);
        schedule.set_ranges(Weekday::Tuesday, vec![range("18:00", "22:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);

        update_pattern_range(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[0],
            RangeField::StartTime,
            "08:00",
        );
        let patterns = derive(&schedule, &mut orphans, &mut order);

        assert_eq!(patterns[0].key.as_str(), "08:00|13:00");
        assert_eq!(patterns[1].key.as_str(), "18:00|22:00");
    }

    // ==================== Orphan Pattern Tests ====================

    #[test]
    fn orphan_edit_keeps_position_among_untouched_patterns() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![range("09:00", "13:00")]);
        let mut orphans = OrphanRegistry::new();
        orphans.insert(range("15:00", "17:00"));
        let mut order = PatternOrder::new();
        derive(&schedule, &mut orphans, &mut order);
        schedule.set_ranges(Weekday::Tuesday, vec![range("19:00", "23:00")]);
        let patterns = derive(&schedule, &mut orphans, &mut order);
        assert_eq!(patterns[1].key.as_str(), "15:00|17:00");

        update_pattern_range(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[1],
            RangeField::StartTime,
            "14:00",
        );
        let patterns = derive(&schedule, &mut orphans, &mut order);

        let keys: Vec<&str> = patterns.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["09:00|13:00", "14:00|17:00", "19:00|23:00"]);
        assert!(patterns[1].is_orphan);
        assert_eq!(orphans.ranges(), &[range("14:00", "17:00")]);
    }

    #[test]
    fn orphan_edit_onto_existing_orphan_merges() {
        let mut schedule = WeeklySchedule::closed();
        let mut orphans = OrphanRegistry::new();
        orphans.insert(range("09:00", "17:00"));
        orphans.insert(range("10:00", "17:00"));
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);

        update_pattern_range(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[1],
            RangeField::StartTime,
            "09:00",
        );
        let patterns = derive(&schedule, &mut orphans, &mut order);

        assert_eq!(patterns.len(), 1);
        assert_eq!(orphans.len(), 1);
        assert_eq!(order.len(), 1);
    }

    // ==================== Blur Normalization Tests ====================

    #[test]
    fn blur_pads_bare_hour_across_days() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![range("9", "13:00")]);
        schedule.set_ranges(Weekday::Tuesday, vec![range("9", "13:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);

        let changed = normalize_on_blur(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[0],
            RangeField::StartTime,
        );

        assert!(changed);
        assert_eq!(
            schedule.day(Weekday::Tuesday).ranges,
            vec![range("09:00", "13:00")]
        );
    }

    #[test]
    fn blur_is_a_no_op_on_well_formed_value() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![range("09:00", "13:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);
        let before = schedule.clone();

        assert!(!normalize_on_blur(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[0],
            RangeField::EndTime,
        ));
        assert_eq!(schedule, before);
    }

    #[test]
    fn blur_merges_near_identical_patterns() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![range("9:00", "13:00")]);
        schedule.set_ranges(Weekday::Tuesday, vec![range("09:00", "13:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        let patterns = derive(&schedule, &mut orphans, &mut order);
        assert_eq!(patterns.len(), 2);

        normalize_on_blur(
            &mut schedule,
            &mut orphans,
            &mut order,
            &patterns[0],
            RangeField::StartTime,
        );
        let patterns = derive(&schedule, &mut orphans, &mut order);

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].days.len(), 2);
    }
}
