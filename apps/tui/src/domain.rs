use chrono::{DateTime, Local, Utc};
use std::fmt;

/// Frequency value the detector reports for a laser alert.
pub const LASER_FREQUENCY: i64 = 3012;

const X_BAND_MHZ: (i64, i64) = (10_000, 11_000);
const K_BAND_MHZ: (i64, i64) = (23_000, 25_000);
const KA_BAND_MHZ: (i64, i64) = (33_000, 37_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    X,
    K,
    Ka,
    Laser,
    Unknown,
}

impl Band {
    pub const ALL: [Self; 5] = [Self::X, Self::K, Self::Ka, Self::Laser, Self::Unknown];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::K => "K",
            Self::Ka => "Ka",
            Self::Laser => "Laser",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn alert_title(self) -> &'static str {
        match self {
            Self::X => "X-Band Alert",
            Self::K => "K-Band Alert",
            Self::Ka => "Ka-Band Alert",
            Self::Laser => "Laser Alert",
            Self::Unknown => "Radar Alert",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a raw frequency (MHz) into a band. Laser wins over every range.
pub const fn band_from_frequency(freq: i64) -> Band {
    if freq == LASER_FREQUENCY {
        return Band::Laser;
    }
    if freq >= X_BAND_MHZ.0 && freq <= X_BAND_MHZ.1 {
        Band::X
    } else if freq >= K_BAND_MHZ.0 && freq <= K_BAND_MHZ.1 {
        Band::K
    } else if freq >= KA_BAND_MHZ.0 && freq <= KA_BAND_MHZ.1 {
        Band::Ka
    } else {
        Band::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalSector {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalSector {
    /// Clockwise from north, 45 degrees apart.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps any course in degrees onto one of the eight compass sectors. Each
/// sector spans 45 degrees starting at its own heading, so 0..=44 is N.
pub fn sector_from_course(course: i64) -> CardinalSector {
    let index = usize::try_from(course.rem_euclid(360) / 45).unwrap_or(0);
    CardinalSector::ALL[index % CardinalSector::ALL.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionLabel {
    Front,
    Side,
    Rear,
    /// Codes outside 1..=3 are shown as-is.
    Unrecognized(i64),
}

impl fmt::Display for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => f.write_str("Front"),
            Self::Side => f.write_str("Side"),
            Self::Rear => f.write_str("Rear"),
            Self::Unrecognized(code) => write!(f, "{code}"),
        }
    }
}

pub const fn label_from_direction_code(code: i64) -> DirectionLabel {
    match code {
        1 => DirectionLabel::Front,
        2 => DirectionLabel::Side,
        3 => DirectionLabel::Rear,
        other => DirectionLabel::Unrecognized(other),
    }
}

pub fn frequency_display(freq: i64) -> String {
    if freq == LASER_FREQUENCY {
        "Laser".to_string()
    } else {
        format!("{freq} MHz")
    }
}

/// Formats an uptime in seconds as `1d 02h 03m 04s`, dropping leading zero units.
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

pub fn format_timestamp_utc(ts: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

pub fn format_timestamp_local(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0).map_or_else(
        || "invalid time".to_string(),
        |dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}

/// Colour bucket for a memory or storage usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Normal,
    Elevated,
    Critical,
}

impl UsageLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 90.0 {
            Self::Critical
        } else if percent > 75.0 {
            Self::Elevated
        } else {
            Self::Normal
        }
    }
}

/// GPS fix quality derived from horizontal dilution of precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixQuality {
    Good,
    Moderate,
    Fair,
    Poor,
}

impl FixQuality {
    pub fn from_hdop(hdop: f64) -> Self {
        if hdop < 2.0 {
            Self::Good
        } else if hdop < 5.0 {
            Self::Moderate
        } else if hdop < 10.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}
