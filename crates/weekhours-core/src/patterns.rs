//! Pattern derivation.
//!
//! A pattern is one distinct time range together with the days that use it.
//! Patterns are never stored: they are rebuilt from the week on every pass.
//! Two pieces of caller-owned state survive between passes:
//!
//! - the [`OrphanRegistry`], holding ranges that currently have no days, and
//! - the [`PatternOrder`], the first-seen order of keys used for display.
//!
//! ## Derivation
//!
//! 1. Collect every key from the open days' ranges (the active set).
//! 2. Group days by key.
//! 3. Drop orphans whose key became active again.
//! 4. Append the remaining orphans with no days.
//! 5. Append unseen keys to the order and drop keys that vanished.
//! 6. Sort patterns by their position in the order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::{WeeklySchedule, Weekday};
use crate::time_math::{PatternKey, TimeRange};

/// A derived grouping of days sharing one identical range.
///
/// Returned by [`derive_schedule_patterns`] and only valid until the next
/// mutation; mutate the week or the registry instead of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    /// Identity, `start|end` on trimmed values.
    pub key: PatternKey,
    /// The single range this pattern stands for.
    pub range: TimeRange,
    /// Days currently assigned this range.
    pub days: BTreeSet<Weekday>,
    /// True when no day uses the range.
    pub is_orphan: bool,
}

impl Pattern {
    fn active(key: PatternKey, range: TimeRange) -> Self {
        Self {
            key,
            range,
            days: BTreeSet::new(),
            is_orphan: false,
        }
    }

    fn orphan(range: TimeRange) -> Self {
        Self {
            key: range.key(),
            range,
            days: BTreeSet::new(),
            is_orphan: true,
        }
    }

    /// Returns true if the day is assigned this pattern.
    pub fn has_day(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

/// Ranges preserved while no day uses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrphanRegistry {
    ranges: Vec<TimeRange>,
}

impl OrphanRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Returns true if an orphan with this key exists.
    pub fn contains(&self, key: &PatternKey) -> bool {
        self.ranges.iter().any(|r| &r.key() == key)
    }

    /// Registers a range. Returns false if its key is already registered.
    pub fn insert(&mut self, range: TimeRange) -> bool {
        if self.contains(&range.key()) {
            return false;
        }
        self.ranges.push(range);
        true
    }

    /// Removes the orphan with this key.
    pub fn remove(&mut self, key: &PatternKey) -> Option<TimeRange> {
        let pos = self.ranges.iter().position(|r| &r.key() == key)?;
        Some(self.ranges.remove(pos))
    }

    /// Looks up an orphan by key, mutably.
    pub fn get_mut(&mut self, key: &PatternKey) -> Option<&mut TimeRange> {
        self.ranges.iter_mut().find(|r| &r.key() == key)
    }

    /// Orphan ranges in registration order.
    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    /// Number of orphans.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if there are no orphans.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn retain(&mut self, mut keep: impl FnMut(&TimeRange) -> bool) {
        self.ranges.retain(|r| keep(r));
    }
}

/// First-seen order of pattern keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternOrder {
    keys: Vec<PatternKey>,
}

impl PatternOrder {
    /// Creates an empty order.
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Position of a key, if present.
    pub fn position(&self, key: &PatternKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &PatternKey) -> bool {
        self.position(key).is_some()
    }

    /// Appends a key unless already present.
    pub fn push(&mut self, key: PatternKey) {
        if !self.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Removes a key. Returns true if it was present.
    pub fn remove(&mut self, key: &PatternKey) -> bool {
        match self.position(key) {
            Some(pos) => {
                self.keys.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replaces `old` with `new` at the same position.
    ///
    /// If `new` is already listed the old entry is just dropped; if `old` is
    /// missing, `new` is appended.
    pub fn rename(&mut self, old: &PatternKey, new: PatternKey) {
        if old == &new {
            return;
        }
        if self.contains(&new) {
            self.remove(old);
            return;
        }
        match self.position(old) {
            Some(pos) => self.keys[pos] = new,
            None => self.keys.push(new),
        }
    }

    /// Keys in display order.
    pub fn keys(&self) -> &[PatternKey] {
        &self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are listed.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Derives the display patterns for a week.
///
/// Updates the orphan registry (reclaimed orphans are pruned) and the pattern
/// order (new keys appended, vanished keys dropped). Calling it again with
/// the updated state returns the same patterns.
pub fn derive_schedule_patterns(
    schedule: &WeeklySchedule,
    orphans: &mut OrphanRegistry,
    order: &mut PatternOrder,
) -> Vec<Pattern> {
    let mut patterns: Vec<Pattern> = Vec::new();

    for day in schedule.days() {
        for range in day.active_ranges() {
            let key = range.key();
            let index = match patterns.iter().position(|p| p.key == key) {
                Some(index) => index,
                None => {
                    patterns.push(Pattern::active(key, range.trimmed()));
                    patterns.len() - 1
                }
            };
            patterns[index].days.insert(day.day_of_week);
        }
    }

    orphans.retain(|range| {
        let key = range.key();
        let reclaimed = patterns.iter().any(|p| p.key == key);
        if reclaimed {
            debug!(key = %key, "Orphan pattern reclaimed by a day");
        }
        !reclaimed
    });
    patterns.extend(orphans.ranges().iter().cloned().map(Pattern::orphan));

    for pattern in &patterns {
        order.push(pattern.key.clone());
    }
    order
        .keys
        .retain(|key| patterns.iter().any(|p| &p.key == key));

    patterns.sort_by_key(|p| order.position(&p.key).unwrap_or(usize::MAX));
    patterns
}
