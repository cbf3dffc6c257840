use chrono::{NaiveDate, NaiveTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Block color used when a course does not carry its own.
pub const DEFAULT_COLOR: &str = "#4f8cff";

pub const DEFAULT_SEMESTER_NAME: &str = "Semester";

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Name of a 1-based weekday (Monday = 1).
#[must_use]
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(weekday).checked_sub(1)?).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    pub semester_name: String,
    pub first_monday: NaiveDate,
    #[cfg_attr(feature = "serde", serde(with = "hhmm"))]
    pub day_start: NaiveTime,
    #[cfg_attr(feature = "serde", serde(with = "hhmm"))]
    pub day_end: NaiveTime,
    pub slot_interval: u32,
}

impl Settings {
    /// Settings a fresh data directory starts out with.
    #[must_use]
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            semester_name: DEFAULT_SEMESTER_NAME.to_string(),
            first_monday: today,
            day_start: NaiveTime::MIN + chrono::Duration::hours(8),
            day_end: NaiveTime::MIN + chrono::Duration::hours(20),
            slot_interval: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Course {
    pub id: u64,
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub teacher: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub location: Option<String>,
    pub weekday: u8,
    #[cfg_attr(feature = "serde", serde(with = "hhmm"))]
    pub start_time: NaiveTime,
    #[cfg_attr(feature = "serde", serde(with = "hhmm"))]
    pub end_time: NaiveTime,
    pub weeks: Vec<u32>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub color: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub remark: Option<String>,
}

impl Course {
    #[must_use]
    pub fn is_active_in(&self, week: u32) -> bool {
        self.weeks.contains(&week)
    }

    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

/// The full exported state, used for backup and restore.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub settings: Settings,
    pub courses: Vec<Course>,
}

#[cfg(feature = "serde")]
pub(crate) mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted_time = format!("{:02}:{:02}", time.hour(), time.minute());
        serializer.serialize_str(&formatted_time)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(de::Error::custom)
    }
}
