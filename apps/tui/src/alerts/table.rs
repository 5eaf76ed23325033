use crate::alerts::maps::{LocationMap, MapRegistry};
use crate::device::models::AlertEntry;
use crate::domain::Band;
use std::collections::{HashMap, HashSet};

/// Stable identity of a row: the alert's timestamp and counter, plus an
/// ordinal for entries that share both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub timestamp: i64,
    pub counter: i64,
    pub occurrence: u32,
}

impl RowKey {
    pub fn assign(entries: &[AlertEntry]) -> Vec<Self> {
        let mut seen: HashMap<(i64, i64), u32> = HashMap::new();
        entries
            .iter()
            .map(|entry| {
                let timestamp = entry.timestamp.unwrap_or(0);
                let counter = entry.counter.unwrap_or(0);
                let occurrence = seen.entry((timestamp, counter)).or_insert(0);
                let key = Self {
                    timestamp,
                    counter,
                    occurrence: *occurrence,
                };
                *occurrence += 1;
                key
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing received yet.
    Idle,
    /// Number of entries currently materialized.
    Rendered(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Snapshot had the rendered length; rows and maps untouched.
    Skipped,
    Rebuilt { restored: usize, fresh: usize },
}

/// Summary row plus its (possibly hidden) detail row.
#[derive(Debug, Clone)]
pub struct AlertRow {
    pub key: RowKey,
    pub entry: AlertEntry,
    pub expanded: bool,
    /// The row's key did not exist before the last rebuild.
    pub fresh: bool,
}

#[derive(Debug)]
pub struct AlertTable {
    state: RenderState,
    rows: Vec<AlertRow>,
    maps: MapRegistry,
    selected: usize,
}

impl Default for AlertTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertTable {
    pub fn new() -> Self {
        Self {
            state: RenderState::Idle,
            rows: Vec::new(),
            maps: MapRegistry::new(),
            selected: 0,
        }
    }

    pub const fn state(&self) -> RenderState {
        self.state
    }

    pub fn rows(&self) -> &[AlertRow] {
        &self.rows
    }

    pub fn entries(&self) -> impl Iterator<Item = &AlertEntry> {
        self.rows.iter().map(|row| &row.entry)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub const fn maps(&self) -> &MapRegistry {
        &self.maps
    }

    pub fn map_for(&self, key: &RowKey) -> Option<&LocationMap> {
        self.maps.get(key)
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&AlertRow> {
        self.rows.get(self.selected)
    }

    /// Poll path: rebuilds only when the entry count changed.
    ///
    /// Content changes at an unchanged count are not picked up until the
    /// count moves; skipping keeps expanded maps alive between polls.
    pub fn apply_snapshot(&mut self, entries: Vec<AlertEntry>) -> RenderOutcome {
        if self.state == RenderState::Rendered(entries.len()) {
            return RenderOutcome::Skipped;
        }
        self.rebuild(entries)
    }

    /// Regenerates every row, carrying expansion over by row key.
    pub fn rebuild(&mut self, entries: Vec<AlertEntry>) -> RenderOutcome {
        let had_rows = self.state != RenderState::Idle;
        let previous_keys: HashSet<RowKey> = self.rows.iter().map(|row| row.key).collect();
        let expanded: HashSet<RowKey> = self
            .rows
            .iter()
            .filter(|row| row.expanded)
            .map(|row| row.key)
            .collect();
        let selected_key = self.selected_row().map(|row| row.key);

        self.maps.dispose_all();

        let keys = RowKey::assign(&entries);
        self.rows = keys
            .into_iter()
            .zip(entries)
            .map(|(key, entry)| AlertRow {
                key,
                expanded: expanded.contains(&key),
                fresh: had_rows && !previous_keys.contains(&key),
                entry,
            })
            .collect();

        let mut restored = 0;
        for row in self.rows.iter().filter(|row| row.expanded) {
            self.maps.open(row.key, &row.entry);
            restored += 1;
        }

        let unknown = self
            .rows
            .iter()
            .filter(|row| row.entry.frequency.is_some() && row.entry.band() == Band::Unknown)
            .count();
        if unknown > 0 {
            tracing::warn!(unknown, "alerts with frequencies outside every known band");
        }

        self.selected = selected_key
            .and_then(|key| self.rows.iter().position(|row| row.key == key))
            .unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));

        let fresh = self.rows.iter().filter(|row| row.fresh).count();
        self.state = RenderState::Rendered(self.rows.len());
        tracing::debug!(rows = self.rows.len(), restored, fresh, "alert table rebuilt");

        RenderOutcome::Rebuilt { restored, fresh }
    }

    /// Expands or collapses a row. The map is created on first expansion and
    /// survives collapsing. Returns the new expanded state.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.expanded = !row.expanded;
        if row.expanded {
            self.maps.open(row.key, &row.entry);
        }
        row.expanded
    }

    pub fn toggle_selected(&mut self) -> bool {
        self.toggle(self.selected)
    }

    /// Drops every row and map and returns to `Idle`.
    pub fn clear(&mut self) {
        self.maps.dispose_all();
        self.rows.clear();
        self.selected = 0;
        self.state = RenderState::Idle;
    }

    pub fn select_previous(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    pub fn select_next(&mut self, step: usize) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = (self.selected + step).min(self.rows.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: i64) -> AlertEntry {
        AlertEntry {
            timestamp: Some(ts),
            latitude: Some(40.0),
            longitude: Some(-74.0),
            frequency: Some(24_150),
            counter: Some(1),
            ..AlertEntry::default()
        }
    }

    fn snapshot(timestamps: &[i64]) -> Vec<AlertEntry> {
        timestamps.iter().copied().map(entry).collect()
    }

    #[test]
    fn first_snapshot_always_renders() {
        let mut table = AlertTable::new();
        assert_eq!(table.state(), RenderState::Idle);

        let outcome = table.apply_snapshot(Vec::new());
        assert_eq!(outcome, RenderOutcome::Rebuilt { restored: 0, fresh: 0 });
        assert_eq!(table.state(), RenderState::Rendered(0));
    }

    #[test]
    fn same_length_snapshot_skips_and_keeps_widgets() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[1, 2, 3]));
        table.toggle(1);
        let key = table.rows()[1].key;
        let widget_id = table.map_for(&key).map(|map| map.id);

        let outcome = table.apply_snapshot(snapshot(&[1, 2, 3]));

        assert_eq!(outcome, RenderOutcome::Skipped);
        assert_eq!(table.map_for(&key).map(|map| map.id), widget_id);
        assert_eq!(table.maps().disposed(), 0);
        assert!(table.rows()[1].expanded);
    }

    #[test]
    fn count_change_restores_expansion_and_disposes_every_widget_once() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[1, 2, 3]));
        table.toggle(0);
        table.toggle(2);
        table.toggle(2); // collapsed but its map is still live
        let created_before = table.maps().created();
        let old_id = table.map_for(&table.rows()[0].key).map(|map| map.id);

        let outcome = table.apply_snapshot(snapshot(&[1, 2, 3, 4]));

        assert_eq!(outcome, RenderOutcome::Rebuilt { restored: 1, fresh: 1 });
        assert_eq!(table.maps().disposed(), created_before);
        assert_eq!(table.maps().live_count(), 1);
        assert!(table.rows()[0].expanded);
        assert!(!table.rows()[2].expanded);
        assert!(table.rows()[3].fresh);
        assert_ne!(table.map_for(&table.rows()[0].key).map(|map| map.id), old_id);
    }

    #[test]
    fn expansion_follows_the_entry_not_the_position() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[10, 20]));
        table.toggle(0);

        // A new alert lands at the head of the buffer.
        table.apply_snapshot(snapshot(&[5, 10, 20]));

        assert!(!table.rows()[0].expanded);
        assert!(table.rows()[1].expanded);
        assert_eq!(table.rows()[1].entry.timestamp, Some(10));
    }

    #[test]
    fn expanded_rows_that_vanish_are_not_restored() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[1, 2, 3]));
        table.toggle(2);

        let outcome = table.apply_snapshot(snapshot(&[1, 2]));

        assert_eq!(outcome, RenderOutcome::Rebuilt { restored: 0, fresh: 0 });
        assert_eq!(table.maps().live_count(), 0);
        assert_eq!(table.maps().disposed(), 1);
    }

    #[test]
    fn collapsing_hides_without_disposing() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[1]));

        assert!(table.toggle(0));
        assert!(!table.toggle(0));
        assert!(table.toggle(0));

        assert_eq!(table.maps().created(), 1);
        assert_eq!(table.maps().disposed(), 0);
    }

    #[test]
    fn duplicate_keys_get_distinct_occurrences() {
        let keys = RowKey::assign(&snapshot(&[7, 7, 8]));
        assert_eq!(keys[0].occurrence, 0);
        assert_eq!(keys[1].occurrence, 1);
        assert_eq!(keys[2].occurrence, 0);
    }

    #[test]
    fn selection_follows_its_row_across_rebuilds() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[10, 20, 30]));
        table.select_next(1);

        table.apply_snapshot(snapshot(&[5, 10, 20, 30]));
        assert_eq!(table.selected_row().and_then(|row| row.entry.timestamp), Some(20));

        table.apply_snapshot(snapshot(&[5]));
        assert_eq!(table.selected(), 0);
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut table = AlertTable::new();
        table.apply_snapshot(snapshot(&[1, 2]));
        table.toggle(0);

        table.clear();

        assert_eq!(table.state(), RenderState::Idle);
        assert!(table.is_empty());
        assert_eq!(table.maps().live_count(), 0);
    }
}
