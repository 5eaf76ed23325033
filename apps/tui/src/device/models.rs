use crate::device::lenient;
use crate::domain::{
    band_from_frequency, label_from_direction_code, sector_from_course, Band, CardinalSector,
    DirectionLabel,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One detected radar or laser event.
///
/// Serialized with the short field names the current firmware writes; the
/// long names used by older firmware are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    #[serde(
        rename = "ts",
        alias = "timestamp",
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<i64>,
    #[serde(
        rename = "lat",
        alias = "latitude",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    #[serde(
        rename = "lon",
        alias = "longitude",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    #[serde(
        rename = "spd",
        alias = "speed",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed: Option<f64>,
    #[serde(
        rename = "crs",
        alias = "course",
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub course: Option<i64>,
    #[serde(
        rename = "freq",
        alias = "frequency",
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequency: Option<i64>,
    #[serde(
        rename = "str",
        alias = "strength",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub strength: Option<f64>,
    #[serde(
        rename = "dir",
        alias = "direction",
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub direction: Option<i64>,
    #[serde(
        rename = "act",
        alias = "active",
        default,
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
    #[serde(
        rename = "cnt",
        alias = "counter",
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub counter: Option<i64>,
}

impl AlertEntry {
    /// A missing frequency classifies as Unknown.
    pub fn band(&self) -> Band {
        self.frequency.map_or(Band::Unknown, band_from_frequency)
    }

    pub fn sector(&self) -> Option<CardinalSector> {
        self.course.map(sector_from_course)
    }

    pub fn direction_label(&self) -> Option<DirectionLabel> {
        self.direction.map(label_from_direction_code)
    }

    pub fn coordinates_or_origin(&self) -> (f64, f64) {
        (self.latitude.unwrap_or(0.0), self.longitude.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BufferResponse {
    #[serde(default)]
    pub entries: Vec<AlertEntry>,
}

/// `/api/status`: PSRAM buffer and filesystem usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStatus {
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub psram_entries: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub psram_free_kb: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub fs_used_kb: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub fs_total_kb: Option<u64>,
}

/// `/stats`: system telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    #[serde(alias = "cpu_freq", default, deserialize_with = "lenient::opt_u64")]
    pub frequency: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub uptime: Option<u64>,
    #[serde(
        rename = "bluetoothRSSI",
        default,
        deserialize_with = "lenient::opt_i64"
    )]
    pub bluetooth_rssi: Option<i64>,
    #[serde(rename = "wifiRSSI", default, deserialize_with = "lenient::opt_i64")]
    pub wifi_rssi: Option<i64>,
    #[serde(rename = "freeHeapInKB", default, deserialize_with = "lenient::opt_f64")]
    pub free_heap_kb: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_heap: Option<f64>,
    #[serde(
        rename = "freePsramInKB",
        default,
        deserialize_with = "lenient::opt_f64"
    )]
    pub free_psram_kb: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_psram: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub cpu_busy: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub board_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub cpu_cores: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub used_storage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_storage: Option<f64>,
}

impl SystemStats {
    pub fn heap_usage_percent(&self) -> Option<f64> {
        usage_percent(self.free_heap_kb?, self.total_heap?)
    }

    /// `None` when the board has no PSRAM.
    pub fn psram_usage_percent(&self) -> Option<f64> {
        usage_percent(self.free_psram_kb?, self.total_psram?)
            .map(|percent| (percent * 100.0).round() / 100.0)
    }

    pub fn storage_usage_percent(&self) -> Option<f64> {
        let used = self.used_storage?;
        let total = self.total_storage?;
        (total > 0.0).then(|| used / total * 100.0)
    }
}

fn usage_percent(free: f64, total: f64) -> Option<f64> {
    (total > 0.0).then(|| (1.0 - free / total) * 100.0)
}

/// `/gps-info`: current fix plus a little hardware telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsInfo {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub hdop: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub course: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub satellite_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub battery_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub battery_charging: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub cpu: Option<f64>,
}

impl GpsInfo {
    /// The firmware reports 0/0 until it has a fix.
    pub fn has_fix(&self) -> bool {
        matches!((self.latitude, self.longitude), (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0)
    }
}

/// `/board-info`: detector identity and its configuration bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInfo {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub software_version: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub hardware_version: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub sweep_settings: Map<String, Value>,
}

impl BoardInfo {
    pub fn manufacturer(&self) -> &str {
        self.manufacturer.as_deref().unwrap_or("Valentine Research")
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("Valentine One")
    }

    pub fn config_rows(&self) -> Vec<ConfigRow> {
        let mut rows = flatten_config(&self.config);
        rows.extend(flatten_config(&self.sweep_settings));
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRow {
    pub key: String,
    pub value: String,
}

/// Flattens one level of nesting into key/value rows. Sweep ranges arrive in
/// MHz and are shown in GHz.
pub fn flatten_config(config: &Map<String, Value>) -> Vec<ConfigRow> {
    let mut rows = Vec::new();
    for (key, value) in config {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let (Some(lower), Some(upper)) = (
                        item.get("lowerBound").and_then(Value::as_f64),
                        item.get("upperBound").and_then(Value::as_f64),
                    ) else {
                        continue;
                    };
                    let label = match key.as_str() {
                        "sweepSections" => format!("Section {}", index + 1),
                        "customSweeps" => format!("Sweep {}", index + 1),
                        other => format!("{other} {}", index + 1),
                    };
                    rows.push(ConfigRow {
                        key: label,
                        value: format!("{:.3} - {:.3}", lower / 1000.0, upper / 1000.0),
                    });
                }
            }
            Value::Object(nested) => {
                for (sub_key, sub_value) in nested {
                    rows.push(ConfigRow {
                        key: format!("{key} → {sub_key}"),
                        value: display_value(sub_value),
                    });
                }
            }
            scalar => rows.push(ConfigRow {
                key: key.clone(),
                value: display_value(scalar),
            }),
        }
    }
    rows
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `/api/logs` listing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFileInfo {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub entries: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub size: Option<u64>,
}

impl LogFileInfo {
    pub fn size_kb(&self) -> f64 {
        self.size.unwrap_or(0) as f64 / 1024.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogListResponse {
    #[serde(default)]
    pub files: Vec<LogFileInfo>,
}

/// Reply body of the buffer and flush commands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockoutKind {
    Auto,
    Manual,
}

impl LockoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }

    /// The firmware stores the kind as a bool (false = auto), 0/1 or text.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(manual) => Some(if *manual { Self::Manual } else { Self::Auto }),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(Self::Auto),
                Some(1) => Some(Self::Manual),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "auto" | "0" | "false" => Some(Self::Auto),
                "manual" | "1" | "true" => Some(Self::Manual),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A suppressed alert location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lockout {
    #[serde(
        rename = "ts",
        alias = "timestamp",
        default,
        deserialize_with = "lenient::opt_i64"
    )]
    pub timestamp: Option<i64>,
    #[serde(
        rename = "type",
        alias = "entryType",
        default,
        deserialize_with = "lenient::opt_lockout_kind"
    )]
    pub kind: Option<LockoutKind>,
    #[serde(
        rename = "lat",
        alias = "latitude",
        default,
        deserialize_with = "lenient::opt_f64"
    )]
    pub latitude: Option<f64>,
    #[serde(
        rename = "lon",
        alias = "longitude",
        default,
        deserialize_with = "lenient::opt_f64"
    )]
    pub longitude: Option<f64>,
    #[serde(
        rename = "freq",
        alias = "frequency",
        default,
        deserialize_with = "lenient::opt_i64"
    )]
    pub frequency: Option<i64>,
    #[serde(
        rename = "dir",
        alias = "direction",
        default,
        deserialize_with = "lenient::opt_i64"
    )]
    pub direction: Option<i64>,
    #[serde(
        rename = "spd",
        alias = "speed",
        default,
        deserialize_with = "lenient::opt_f64"
    )]
    pub speed: Option<f64>,
    #[serde(
        rename = "str",
        alias = "strength",
        default,
        deserialize_with = "lenient::opt_f64"
    )]
    pub strength: Option<f64>,
    #[serde(
        rename = "cnt",
        alias = "counter",
        default,
        deserialize_with = "lenient::opt_i64"
    )]
    pub counter: Option<i64>,
    #[serde(
        rename = "course",
        alias = "crs",
        default,
        deserialize_with = "lenient::opt_i64"
    )]
    pub course: Option<i64>,
    #[serde(
        rename = "act",
        alias = "active",
        default,
        deserialize_with = "lenient::opt_bool"
    )]
    pub active: Option<bool>,
}

impl Lockout {
    pub fn band(&self) -> Band {
        self.frequency.map_or(Band::Unknown, band_from_frequency)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockoutResponse {
    #[serde(default)]
    pub lockouts: Vec<Lockout>,
}

/// Visibility toggles of the lockout table. Only X, K and Ka lockouts can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutFilter {
    pub auto: bool,
    pub manual: bool,
    pub x: bool,
    pub k: bool,
    pub ka: bool,
}

impl Default for LockoutFilter {
    fn default() -> Self {
        Self {
            auto: true,
            manual: true,
            x: true,
            k: true,
            ka: true,
        }
    }
}

impl LockoutFilter {
    pub fn matches(&self, lockout: &Lockout) -> bool {
        let kind_ok = match lockout.kind {
            Some(LockoutKind::Auto) => self.auto,
            Some(LockoutKind::Manual) => self.manual,
            None => false,
        };
        let band_ok = match lockout.band() {
            Band::X => self.x,
            Band::K => self.k,
            Band::Ka => self.ka,
            Band::Laser | Band::Unknown => false,
        };
        kind_ok && band_ok
    }

    /// Flips the toggle at `index` (auto, manual, X, K, Ka).
    pub fn toggle(&mut self, index: usize) {
        match index {
            0 => self.auto = !self.auto,
            1 => self.manual = !self.manual,
            2 => self.x = !self.x,
            3 => self.k = !self.k,
            4 => self.ka = !self.ka,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_field_names_normalize_to_the_same_entry() -> Result<(), serde_json::Error> {
        let current: AlertEntry = serde_json::from_value(json!({
            "ts": 1_700_000_000, "lat": 40.7, "lon": -74.0, "spd": 55, "crs": 90,
            "freq": 24150, "str": 6, "dir": 1, "act": true, "cnt": 3
        }))?;
        let legacy: AlertEntry = serde_json::from_value(json!({
            "timestamp": 1_700_000_000, "latitude": 40.7, "longitude": -74.0, "speed": 55,
            "course": 90, "frequency": 24150, "strength": 6, "direction": 1,
            "active": 1, "counter": 3
        }))?;

        assert_eq!(current, legacy);
        assert_eq!(current.band(), Band::K);
        assert_eq!(current.sector(), Some(CardinalSector::E));
        assert_eq!(current.direction_label(), Some(DirectionLabel::Front));
        Ok(())
    }

    #[test]
    fn numeric_strings_are_accepted() -> Result<(), serde_json::Error> {
        let entry: AlertEntry = serde_json::from_value(json!({
            "ts": "1700000000", "freq": "34700", "dir": "3", "act": "false", "lat": null
        }))?;

        assert_eq!(entry.timestamp, Some(1_700_000_000));
        assert_eq!(entry.band(), Band::Ka);
        assert_eq!(entry.direction_label(), Some(DirectionLabel::Rear));
        assert_eq!(entry.active, Some(false));
        assert_eq!(entry.latitude, None);
        Ok(())
    }

    #[test]
    fn entries_serialize_with_canonical_names() -> Result<(), serde_json::Error> {
        let entry = AlertEntry {
            frequency: Some(3012),
            counter: Some(1),
            ..AlertEntry::default()
        };

        let value = serde_json::to_value(&entry)?;
        assert_eq!(value, json!({ "freq": 3012, "cnt": 1 }));
        Ok(())
    }

    #[test]
    fn stats_usage_and_cpu_alias() -> Result<(), serde_json::Error> {
        let stats: SystemStats = serde_json::from_value(json!({
            "cpu_freq": 240, "uptime": 3600, "freeHeapInKB": 50, "totalHeap": 200,
            "freePsramInKB": 1000, "totalPsram": 3000, "bluetoothRSSI": -60
        }))?;

        assert_eq!(stats.frequency, Some(240));
        assert_eq!(stats.bluetooth_rssi, Some(-60));
        assert_eq!(stats.heap_usage_percent(), Some(75.0));
        assert_eq!(stats.psram_usage_percent(), Some(66.67));
        Ok(())
    }

    #[test]
    fn no_psram_means_no_psram_usage() -> Result<(), serde_json::Error> {
        let stats: SystemStats =
            serde_json::from_value(json!({ "freePsramInKB": 0, "totalPsram": 0 }))?;
        assert_eq!(stats.psram_usage_percent(), None);
        Ok(())
    }

    #[test]
    fn board_config_flattens_sweeps_and_nested_objects() -> Result<(), serde_json::Error> {
        let board: BoardInfo = serde_json::from_value(json!({
            "serial": "123",
            "config": { "Mode": "A", "muting": { "level": 2 } },
            "sweepSettings": {
                "sweepSections": [{ "lowerBound": 33400, "upperBound": 36002 }],
                "customSweeps": [{ "lowerBound": 34700, "upperBound": 34800 }, { "nope": 1 }]
            }
        }))?;

        let rows = board.config_rows();
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.key.as_str(), row.value.as_str()))
            .collect();

        assert!(pairs.contains(&("Mode", "A")));
        assert!(pairs.contains(&("muting → level", "2")));
        assert!(pairs.contains(&("Section 1", "33.400 - 36.002")));
        assert!(pairs.contains(&("Sweep 1", "34.700 - 34.800")));
        assert_eq!(rows.len(), 4);
        assert_eq!(board.manufacturer(), "Valentine Research");
        assert_eq!(board.model(), "Valentine One");
        Ok(())
    }

    #[test]
    fn lockout_kind_accepts_every_encoding() -> Result<(), serde_json::Error> {
        let lockouts: LockoutResponse = serde_json::from_value(json!({
            "lockouts": [
                { "type": "auto", "freq": 24150 },
                { "entryType": true, "frequency": 10525 },
                { "type": 0, "freq": 34700 },
                { "type": "manual", "freq": 3012 }
            ]
        }))?;

        let kinds: Vec<_> = lockouts.lockouts.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(LockoutKind::Auto),
                Some(LockoutKind::Manual),
                Some(LockoutKind::Auto),
                Some(LockoutKind::Manual)
            ]
        );

        let mut filter = LockoutFilter::default();
        let visible = lockouts.lockouts.iter().filter(|l| filter.matches(l)).count();
        assert_eq!(visible, 3);

        filter.toggle(0);
        let visible = lockouts.lockouts.iter().filter(|l| filter.matches(l)).count();
        assert_eq!(visible, 1);
        Ok(())
    }

    #[test]
    fn unknown_lockout_type_only_drops_that_kind() -> Result<(), serde_json::Error> {
        let lockouts: LockoutResponse = serde_json::from_str(
            r#"{"lockouts":[{"type":"auto","freq":24150},{"type":"gps","freq":10525},{"type":2,"freq":34700}]}"#,
        )?;

        assert_eq!(lockouts.lockouts.len(), 3);
        assert_eq!(lockouts.lockouts[0].kind, Some(LockoutKind::Auto));
        assert_eq!(lockouts.lockouts[1].kind, None);
        assert_eq!(lockouts.lockouts[1].frequency, Some(10_525));
        assert_eq!(lockouts.lockouts[2].kind, None);

        let filter = LockoutFilter::default();
        let visible = lockouts.lockouts.iter().filter(|l| filter.matches(l)).count();
        assert_eq!(visible, 1);
        Ok(())
    }
}
