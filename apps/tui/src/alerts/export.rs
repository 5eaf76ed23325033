use crate::device::models::{AlertEntry, Lockout};
use crate::domain::format_timestamp_utc;
use chrono::{DateTime, Utc};
use color_eyre::Result;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

pub const ALERT_COLUMNS: [&str; 11] = [
    "Timestamp",
    "Latitude",
    "Longitude",
    "Type",
    "Frequency",
    "Direction",
    "Speed",
    "Strength",
    "Counter",
    "Course",
    "Status",
];

pub const LOCKOUT_COLUMNS: [&str; 5] =
    ["Timestamp", "Latitude", "Longitude", "Band Type", "Frequency"];

const MISSING: &str = "N/A";

fn or_missing<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn coordinate(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.6}"))
}

fn timestamp(value: Option<i64>) -> String {
    value
        .and_then(format_timestamp_utc)
        .unwrap_or_else(|| MISSING.to_string())
}

/// Comma-separated alerts, header first. Fields are written unescaped; every
/// column is numeric or a fixed label.
pub fn alerts_to_csv<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a AlertEntry>,
{
    let mut csv = ALERT_COLUMNS.join(",");
    csv.push('\n');

    for entry in entries {
        let fields = [
            timestamp(entry.timestamp),
            coordinate(entry.latitude),
            coordinate(entry.longitude),
            or_missing(entry.frequency.map(|_| entry.band())),
            or_missing(entry.frequency),
            or_missing(entry.direction_label()),
            or_missing(entry.speed),
            or_missing(entry.strength),
            or_missing(entry.counter),
            or_missing(entry.course),
            or_missing(entry.active.map(|active| if active { "Active" } else { "Inactive" })),
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

pub fn lockouts_to_csv<'a, I>(lockouts: I) -> String
where
    I: IntoIterator<Item = &'a Lockout>,
{
    let mut csv = LOCKOUT_COLUMNS.join(",");
    csv.push('\n');

    for lockout in lockouts {
        let fields = [
            timestamp(lockout.timestamp),
            coordinate(lockout.latitude),
            coordinate(lockout.longitude),
            or_missing(lockout.frequency.map(|_| lockout.band())),
            or_missing(
                lockout
                    .frequency
                    .map(|freq| format!("{:.3} GHz", freq as f64 / 1000.0)),
            ),
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

pub fn export_file_name(scope: &str, at: DateTime<Utc>) -> String {
    format!("{scope}-{}.csv", at.format("%Y%m%d-%H%M%S"))
}

/// Writes `contents` into `dir`, creating the directory when needed.
pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "export written");
    Ok(path)
}
