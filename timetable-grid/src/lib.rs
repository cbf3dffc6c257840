mod layout;
mod structs;
mod validate;
mod week;

#[cfg(feature = "ics")]
mod ics;

pub use layout::{
    active_in_week, minutes_of_day, time_slots, Block, Grid, ScheduleView, Span, TimeSlots,
    COLUMNS,
};
pub use structs::{
    weekday_name, Course, Settings, Snapshot, DEFAULT_COLOR, DEFAULT_SEMESTER_NAME,
};
pub use validate::{
    CourseDraft, CourseInput, SettingsInput, SnapshotInput, ValidationError,
    DEFAULT_SLOT_INTERVAL, SLOT_INTERVALS,
};
pub use week::{current_week, occurrence_date};
