//! Time-grid layout.
//!
//! A day runs from `day_start` to `day_end` and is cut into slots of
//! `slot_interval` minutes, the vertical unit of the grid. Courses are placed
//! into one of seven weekday columns with an offset and a height measured in
//! slots. Nothing is clipped to the day window and overlapping courses on the
//! same weekday are not reflowed.

use std::{mem, ops::Range};

use chrono::{NaiveTime, Timelike};

use crate::{Course, Settings};

/// Number of weekday columns, Monday through Sunday.
pub const COLUMNS: usize = 7;

#[must_use]
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Slot start times from `start` (inclusive) up to `end` (exclusive).
///
/// When the window is not a multiple of `interval`, the last slot starts
/// below `end` and the partial remainder is left to the renderer. An interval
/// of zero produces no slots.
#[must_use]
pub fn time_slots(start: NaiveTime, end: NaiveTime, interval: u32) -> TimeSlots {
    TimeSlots {
        current: minutes_of_day(start),
        end: if interval == 0 { 0 } else { minutes_of_day(end) },
        interval,
    }
}

#[derive(Debug, Clone)]
pub struct TimeSlots {
    current: u32,
    end: u32,
    interval: u32,
}

impl Iterator for TimeSlots {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }

        let next = self.current + self.interval;
        let current = mem::replace(&mut self.current, next);
        NaiveTime::from_num_seconds_from_midnight_opt(current * 60, 0)
    }
}

/// Vertical placement of a course, in slots relative to the start of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub offset_in_slots: f64,
    pub duration_in_slots: f64,
}

impl Span {
    /// Place `start..end` on a grid starting at `day_start`.
    ///
    /// The height never drops below one slot. Courses outside the day window
    /// get a negative offset or one past the last slot.
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime, day_start: NaiveTime, slot_interval: u32) -> Self {
        let start = i64::from(minutes_of_day(start));
        let end = i64::from(minutes_of_day(end));
        let day_start = i64::from(minutes_of_day(day_start));
        let interval = i64::from(slot_interval);

        let offset = start - day_start;
        let duration = (end - start).max(interval);

        Self {
            offset_in_slots: offset as f64 / interval as f64,
            duration_in_slots: duration as f64 / interval as f64,
        }
    }

    #[must_use]
    pub fn top(&self, slot_height: f64) -> f64 {
        self.offset_in_slots * slot_height
    }

    #[must_use]
    pub fn height(&self, slot_height: f64) -> f64 {
        self.duration_in_slots * slot_height
    }

    /// Slot rows the span touches, including partially covered ones.
    #[must_use]
    pub fn rows(&self) -> Range<i64> {
        let first = self.offset_in_slots.floor() as i64;
        let last = (self.offset_in_slots + self.duration_in_slots).ceil() as i64;
        first..last
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    pub course: &'a Course,
    pub span: Span,
}

/// A laid out week: slot labels plus one column of blocks per weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<'a> {
    pub slots: Vec<NaiveTime>,
    pub columns: [Vec<Block<'a>>; COLUMNS],
}

impl<'a> Grid<'a> {
    /// Lay out `courses` using the day window of `settings`.
    ///
    /// Blocks keep the order of `courses` within each column. Courses with a
    /// weekday outside 1..=7 have no column and are left out.
    pub fn new<I>(settings: &Settings, courses: I) -> Self
    where
        I: IntoIterator<Item = &'a Course>,
    {
        let slots = time_slots(settings.day_start, settings.day_end, settings.slot_interval).collect();
        let mut columns: [Vec<Block<'a>>; COLUMNS] = std::array::from_fn(|_| Vec::new());

        for course in courses {
            let Some(column) = usize::from(course.weekday)
                .checked_sub(1)
                .and_then(|idx| columns.get_mut(idx))
            else {
                continue;
            };

            column.push(Block {
                course,
                span: Span::new(
                    course.start_time,
                    course.end_time,
                    settings.day_start,
                    settings.slot_interval,
                ),
            });
        }

        Self { slots, columns }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.slots.len()
    }
}

/// Courses whose weeks contain `week`, in source order.
pub fn active_in_week(courses: &[Course], week: u32) -> impl Iterator<Item = &Course> {
    courses.iter().filter(move |course| course.is_active_in(week))
}

/// The schedule of a single week, derived on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleView<'a> {
    pub week: u32,
    pub grid: Grid<'a>,
}

impl<'a> ScheduleView<'a> {
    /// Filter the full course list down to `week` and lay it out.
    #[must_use]
    pub fn new(settings: &Settings, courses: &'a [Course], week: u32) -> Self {
        Self {
            week,
            grid: Grid::new(settings, active_in_week(courses, week)),
        }
    }
}
