//! Explicit creation and deletion of unassigned patterns.

use tracing::debug;

use crate::patterns::{OrphanRegistry, PatternOrder};
use crate::time_math::{PatternKey, TimeRange};

/// Registers a new unassigned pattern, defaulting to 09:00-17:00.
///
/// No-op when an orphan or a listed pattern already has the key. Returns
/// whether anything was created.
pub fn create_orphan(
    orphans: &mut OrphanRegistry,
    order: &mut PatternOrder,
    initial: Option<TimeRange>,
) -> bool {
    let range = initial.unwrap_or_default().trimmed();
    let key = range.key();

    if orphans.contains(&key) || order.contains(&key) {
        debug!(key = %key, "Pattern already exists, not creating orphan");
        return false;
    }

    orphans.insert(range);
    order.push(key.clone());
    debug!(key = %key, "Created orphan pattern");
    true
}

/// Deletes an unassigned pattern.
///
/// Keys that are not orphans are left alone: day-bearing patterns only
/// disappear by losing their days. Returns whether anything was deleted.
pub fn delete_orphan(orphans: &mut OrphanRegistry, order: &mut PatternOrder, key: &PatternKey) -> bool {
    if orphans.remove(key).is_none() {
        debug!(key = %key, "No orphan with this key");
        return false;
    }
    order.remove(key);
    debug!(key = %key, "Deleted orphan pattern");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::derive_schedule_patterns;
    use crate::schedule::{WeeklySchedule, Weekday};
    use proptest::prelude::*;

    #[test]
    fn create_uses_default_range() {
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();

        assert!(create_orphan(&mut orphans, &mut order, None));

        assert_eq!(orphans.ranges(), &[TimeRange::new("09:00", "17:00")]);
        assert_eq!(order.keys(), &[PatternKey::from("09:00|17:00")]);
    }

    #[test]
    fn create_twice_yields_one_orphan() {
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();

        assert!(create_orphan(&mut orphans, &mut order, None));
        assert!(!create_orphan(&mut orphans, &mut order, None));

        assert_eq!(orphans.len(), 1);
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn create_skips_key_used_by_a_day() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![TimeRange::new("09:00", "17:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        derive_schedule_patterns(&schedule, &mut orphans, &mut order);

        assert!(!create_orphan(&mut orphans, &mut order, None));
        assert!(orphans.is_empty());
    }

    #[test]
    fn created_orphan_survives_derivation() {
        let schedule = WeeklySchedule::closed();
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        create_orphan(&mut orphans, &mut order, Some(TimeRange::new("12:00", "15:00")));

        let patterns = derive_schedule_patterns(&schedule, &mut orphans, &mut order);

        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].is_orphan);
    }

    #[test]
    fn delete_removes_orphan_and_order_entry() {
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        create_orphan(&mut orphans, &mut order, None);

        assert!(delete_orphan(&mut orphans, &mut order, &"09:00|17:00".into()));

        assert!(orphans.is_empty());
        assert!(order.is_empty());
    }

    #[test]
    fn delete_ignores_day_bearing_pattern() {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![TimeRange::new("09:00", "13:00")]);
        let mut orphans = OrphanRegistry::new();
        let mut order = PatternOrder::new();
        derive_schedule_patterns(&schedule, &mut orphans, &mut order);

        assert!(!delete_orphan(&mut orphans, &mut order, &"09:00|13:00".into()));
        assert_eq!(order.len(), 1);
    }

    proptest! {
        #[test]
        fn orphan_creation_is_idempotent(h in 0u32..23, m in 0u32..60, repeats in 1usize..5) {
            let range = TimeRange::new(format!("{:02}:{:02}", h, m), format!("{:02}:{:02}", h + 1, m));
            let mut orphans = OrphanRegistry::new();
            let mut order = PatternOrder::new();
            for _ in 0..repeats {
                create_orphan(&mut orphans, &mut order, Some(range.clone()));
            }
            let patterns = derive_schedule_patterns(&WeeklySchedule::closed(), &mut orphans, &mut order);
            prop_assert_eq!(patterns.len(), 1);
            prop_assert_eq!(orphans.len(), 1);
        }
    }
}
