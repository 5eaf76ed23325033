use crate::alerts::table::RowKey;
use crate::device::models::AlertEntry;
use crate::domain::{format_timestamp_local, frequency_display};
use std::collections::HashMap;

/// Zoom of every detail map. Each level halves the visible span.
pub const DETAIL_ZOOM: u8 = 6;

/// A live location map attached to one expanded alert row.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMap {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub popup: Vec<String>,
}

impl LocationMap {
    /// Longitude/latitude bounds of the visible window.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let lon_span = 360.0 / f64::from(1u32 << self.zoom);
        let lat_span = lon_span / 2.0;
        (
            [self.longitude - lon_span / 2.0, self.longitude + lon_span / 2.0],
            [self.latitude - lat_span / 2.0, self.latitude + lat_span / 2.0],
        )
    }
}

/// Popup text summarizing an alert, one line per field.
pub fn popup_lines(entry: &AlertEntry) -> Vec<String> {
    let (lat, lon) = entry.coordinates_or_origin();
    let mut lines = vec![
        entry.band().alert_title().to_string(),
        format!(
            "Time: {}",
            entry
                .timestamp
                .map_or_else(|| "unknown".to_string(), format_timestamp_local)
        ),
        format!("Location: {lat:.6}, {lon:.6}"),
    ];
    if let Some(speed) = entry.speed {
        lines.push(format!("Speed: {speed} mph"));
    }
    if let Some(sector) = entry.sector() {
        lines.push(format!("Course: {sector}"));
    }
    if let Some(freq) = entry.frequency {
        lines.push(format!("Frequency: {}", frequency_display(freq)));
    }
    if let Some(strength) = entry.strength {
        lines.push(format!("Strength: {strength} dB"));
    }
    if let Some(direction) = entry.direction_label() {
        lines.push(format!("Direction: {direction}"));
    }
    lines
}

/// Owns every live map widget, keyed by row. Creation and disposal are paired.
#[derive(Debug, Default)]
pub struct MapRegistry {
    live: HashMap<RowKey, LocationMap>,
    next_id: u64,
    created: u64,
    disposed: u64,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the map for `key` unless one is already live. Returns its id.
    pub fn open(&mut self, key: RowKey, entry: &AlertEntry) -> u64 {
        if let Some(existing) = self.live.get(&key) {
            return existing.id;
        }

        self.next_id += 1;
        self.created += 1;
        let (latitude, longitude) = entry.coordinates_or_origin();
        let map = LocationMap {
            id: self.next_id,
            latitude,
            longitude,
            zoom: DETAIL_ZOOM,
            popup: popup_lines(entry),
        };
        tracing::debug!(id = map.id, latitude, longitude, "map widget created");
        self.live.insert(key, map);
        self.next_id
    }

    pub fn get(&self, key: &RowKey) -> Option<&LocationMap> {
        self.live.get(key)
    }

    pub fn dispose(&mut self, key: &RowKey) -> bool {
        if let Some(map) = self.live.remove(key) {
            self.disposed += 1;
            tracing::debug!(id = map.id, "map widget disposed");
            true
        } else {
            false
        }
    }

    pub fn dispose_all(&mut self) -> usize {
        let count = self.live.len();
        for (_, map) in self.live.drain() {
            tracing::debug!(id = map.id, "map widget disposed");
        }
        self.disposed += count as u64;
        count
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub const fn created(&self) -> u64 {
        self.created
    }

    pub const fn disposed(&self) -> u64 {
        self.disposed
    }
}
