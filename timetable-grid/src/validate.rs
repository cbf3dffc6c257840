use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Course, Settings, Snapshot, DEFAULT_SEMESTER_NAME};

/// Slot lengths the grid offers. Anything else falls back to the default.
pub const SLOT_INTERVALS: [u32; 5] = [15, 20, 30, 45, 60];
pub const DEFAULT_SLOT_INTERVAL: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("weekday must be between 1 and 7")]
    Weekday,
    #[error("Invalid time range")]
    TimeRange,
    #[error("weeks must contain at least one positive week number")]
    Weeks,
    #[error("Invalid day time range")]
    DayRange,
    #[error("slot_interval must be a positive number of minutes")]
    SlotInterval,
}

/// Course fields as submitted by a client. Every field is optional on the
/// wire so that missing ones can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CourseInput {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub teacher: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub weekday: Option<i64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub start_time: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub end_time: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub weeks: Option<Vec<i64>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub remark: Option<String>,
}

impl From<&Course> for CourseInput {
    fn from(course: &Course) -> Self {
        Self {
            title: Some(course.title.clone()),
            teacher: course.teacher.clone(),
            location: course.location.clone(),
            weekday: Some(i64::from(course.weekday)),
            start_time: Some(course.start_time.format("%H:%M").to_string()),
            end_time: Some(course.end_time.format("%H:%M").to_string()),
            weeks: Some(course.weeks.iter().map(|&week| i64::from(week)).collect()),
            color: course.color.clone(),
            remark: course.remark.clone(),
        }
    }
}

/// A validated course that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub title: String,
    pub teacher: Option<String>,
    pub location: Option<String>,
    pub weekday: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub weeks: Vec<u32>,
    pub color: Option<String>,
    pub remark: Option<String>,
}

impl CourseDraft {
    #[must_use]
    pub fn with_id(self, id: u64) -> Course {
        Course {
            id,
            title: self.title,
            teacher: self.teacher,
            location: self.location,
            weekday: self.weekday,
            start_time: self.start_time,
            end_time: self.end_time,
            weeks: self.weeks,
            color: self.color,
            remark: self.remark,
        }
    }
}

impl CourseInput {
    pub fn validate(&self) -> Result<CourseDraft, ValidationError> {
        let title = required(&self.title, "title")?.trim();
        let weekday = *required(&self.weekday, "weekday")?;
        let start_time = required(&self.start_time, "start_time")?;
        let end_time = required(&self.end_time, "end_time")?;
        let weeks = required(&self.weeks, "weeks")?;

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let weekday = u8::try_from(weekday)
            .ok()
            .filter(|weekday| (1..=7).contains(weekday))
            .ok_or(ValidationError::Weekday)?;

        let (start_time, end_time) =
            time_range(start_time, end_time).ok_or(ValidationError::TimeRange)?;

        let mut weeks = weeks
            .iter()
            .filter_map(|&week| u32::try_from(week).ok())
            .filter(|&week| week > 0)
            .collect::<Vec<_>>();
        weeks.sort_unstable();
        weeks.dedup();

        if weeks.is_empty() {
            return Err(ValidationError::Weeks);
        }

        Ok(CourseDraft {
            title: title.to_string(),
            teacher: non_empty(&self.teacher),
            location: non_empty(&self.location),
            weekday,
            start_time,
            end_time,
            weeks,
            color: non_empty(&self.color),
            remark: non_empty(&self.remark),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SettingsInput {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub semester_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub first_monday: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub day_start: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub day_end: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub slot_interval: Option<i64>,
}

impl From<&Settings> for SettingsInput {
    fn from(settings: &Settings) -> Self {
        Self {
            semester_name: Some(settings.semester_name.clone()),
            first_monday: Some(settings.first_monday.format("%Y-%m-%d").to_string()),
            day_start: Some(settings.day_start.format("%H:%M").to_string()),
            day_end: Some(settings.day_end.format("%H:%M").to_string()),
            slot_interval: Some(i64::from(settings.slot_interval)),
        }
    }
}

impl SettingsInput {
    /// Validate into full settings. An unparseable `first_monday` becomes
    /// `today`; an unsupported positive `slot_interval` becomes the default.
    pub fn validate(&self, today: NaiveDate) -> Result<Settings, ValidationError> {
        let semester_name = non_empty(&self.semester_name)
            .unwrap_or_else(|| DEFAULT_SEMESTER_NAME.to_string());

        let first_monday = self
            .first_monday
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
            .unwrap_or(today);

        let (day_start, day_end) = time_range(
            self.day_start.as_deref().unwrap_or("08:00"),
            self.day_end.as_deref().unwrap_or("20:00"),
        )
        .ok_or(ValidationError::DayRange)?;

        let slot_interval = match self.slot_interval {
            None => DEFAULT_SLOT_INTERVAL,
            Some(interval) if interval <= 0 => return Err(ValidationError::SlotInterval),
            Some(interval) => u32::try_from(interval)
                .ok()
                .filter(|interval| SLOT_INTERVALS.contains(interval))
                .unwrap_or(DEFAULT_SLOT_INTERVAL),
        };

        Ok(Settings {
            semester_name,
            first_monday,
            day_start,
            day_end,
            slot_interval,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapshotInput {
    pub settings: SettingsInput,
    pub courses: Vec<CourseInput>,
}

impl From<&Snapshot> for SnapshotInput {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            settings: SettingsInput::from(&snapshot.settings),
            courses: snapshot.courses.iter().map(CourseInput::from).collect(),
        }
    }
}

impl SnapshotInput {
    /// Validate every part of the snapshot. Courses are numbered from 1 in
    /// the order they appear.
    pub fn validate(&self, today: NaiveDate) -> Result<Snapshot, ValidationError> {
        let settings = self.settings.validate(today)?;
        let courses = self
            .courses
            .iter()
            .zip(1..)
            .map(|(course, id)| course.validate().map(|draft| draft.with_id(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot { settings, courses })
    }
}

fn required<'a, T>(value: &'a Option<T>, name: &'static str) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or(ValidationError::MissingField(name))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn time_range(start: &str, end: &str) -> Option<(NaiveTime, NaiveTime)> {
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    (start < end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    fn input() -> CourseInput {
        CourseInput {
            title: Some(" Operating Systems ".into()),
            teacher: Some("".into()),
            location: Some("Room 101".into()),
            weekday: Some(2),
            start_time: Some("08:00".into()),
            end_time: Some("09:35".into()),
            weeks: Some(vec![5, 1, 3, 3, 0, -2]),
            color: None,
            remark: Some("  ".into()),
        }
    }

    #[test]
    fn course_is_normalized() {
        let draft = input().validate().unwrap();
        assert_eq!(draft.title, "Operating Systems");
        assert_eq!(draft.teacher, None);
        assert_eq!(draft.location.as_deref(), Some("Room 101"));
        assert_eq!(draft.remark, None);
        assert_eq!(draft.weeks, [1, 3, 5]);
        assert_eq!(draft.with_id(7).id, 7);
    }

    #[test]
    fn missing_fields_are_named() {
        let mut course = input();
        course.weeks = None;
        assert_eq!(course.validate(), Err(ValidationError::MissingField("weeks")));
        assert_eq!(
            CourseInput::default().validate().unwrap_err().to_string(),
            "Missing field: title"
        );
    }

    #[test]
    fn course_rejections() {
        let mut course = input();
        course.title = Some("   ".into());
        assert_eq!(course.validate(), Err(ValidationError::EmptyTitle));

        let mut course = input();
        course.weekday = Some(8);
        assert_eq!(course.validate(), Err(ValidationError::Weekday));

        let mut course = input();
        course.end_time = Some("08:00".into());
        assert_eq!(course.validate(), Err(ValidationError::TimeRange));

        let mut course = input();
        course.start_time = Some("8 o'clock".into());
        assert_eq!(course.validate(), Err(ValidationError::TimeRange));

        let mut course = input();
        course.weeks = Some(vec![0, -1]);
        assert_eq!(course.validate(), Err(ValidationError::Weeks));
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let settings = SettingsInput {
            semester_name: Some(" ".into()),
            first_monday: Some("next monday".into()),
            slot_interval: Some(25),
            ..Default::default()
        }
        .validate(today())
        .unwrap();

        assert_eq!(settings, Settings::with_defaults(today()));
    }

    #[test]
    fn settings_rejections() {
        let settings = SettingsInput {
            day_start: Some("18:00".into()),
            day_end: Some("08:00".into()),
            ..Default::default()
        };
        assert_eq!(settings.validate(today()), Err(ValidationError::DayRange));

        let settings = SettingsInput {
            slot_interval: Some(0),
            ..Default::default()
        };
        assert_eq!(settings.validate(today()), Err(ValidationError::SlotInterval));
    }

    #[test]
    fn snapshot_renumbers_courses() {
        let settings = Settings::with_defaults(today());
        let courses = vec![
            input().validate().unwrap().with_id(12),
            input().validate().unwrap().with_id(40),
        ];
        let snapshot = Snapshot { settings, courses };

        let imported = SnapshotInput::from(&snapshot).validate(today()).unwrap();
        assert_eq!(imported.settings, snapshot.settings);
        assert_eq!(
            imported.courses.iter().map(|course| course.id).collect::<Vec<_>>(),
            [1, 2]
        );
        assert_eq!(imported.courses[0].title, snapshot.courses[0].title);
    }

    #[test]
    fn snapshot_fails_on_any_bad_course() {
        let mut bad = input();
        bad.weekday = Some(0);
        let snapshot = SnapshotInput {
            settings: SettingsInput::default(),
            courses: vec![input(), bad],
        };
        assert_eq!(snapshot.validate(today()), Err(ValidationError::Weekday));
    }
}
