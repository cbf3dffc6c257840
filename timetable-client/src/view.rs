//! Plain-text rendering of the weekly grid and the course list.

use timetable_grid::{weekday_name, Course, Grid, COLUMNS};

use crate::{input::format_weeks, state::AppState};

const CELL_WIDTH: usize = 14;
const TIME_WIDTH: usize = 5;

pub fn render_header(state: &AppState) -> String {
    let settings = &state.settings;
    format!(
        "{}\nCurrent week: {} | Showing week: {}\n{} - {} | {} minutes per slot\n",
        settings.semester_name,
        state.current_week,
        state.selected_week,
        settings.day_start.format("%H:%M"),
        settings.day_end.format("%H:%M"),
        settings.slot_interval,
    )
}

/// One line per slot and one cell per weekday.
///
/// A course fills every row its span touches: its title on the first visible
/// row and a continuation mark below. Rows outside the grid are not drawn.
/// Where courses overlap the first one in source order wins.
pub fn render_grid(grid: &Grid<'_>) -> String {
    let mut out = String::new();

    out.push_str(&pad("", TIME_WIDTH));
    for weekday in 1..=COLUMNS as u8 {
        let name = weekday_name(weekday).unwrap_or("");
        out.push_str(" | ");
        out.push_str(&pad(&name[..3], CELL_WIDTH));
    }
    out.push('\n');

    for (row, slot) in grid.slots.iter().enumerate() {
        let row = row as i64;
        out.push_str(&slot.format("%H:%M").to_string());

        for column in &grid.columns {
            let cell = column
                .iter()
                .find(|block| block.span.rows().contains(&row))
                .map_or(String::new(), |block| {
                    if block.span.rows().start.max(0) == row {
                        block.course.title.clone()
                    } else {
                        "  :".to_string()
                    }
                });

            out.push_str(" | ");
            out.push_str(&pad(&cell, CELL_WIDTH));
        }

        out.push('\n');
    }

    out
}

pub fn render_course_table(courses: &[Course]) -> String {
    let mut out = String::new();

    for course in courses {
        out.push_str(&format!(
            "#{:<4} {} | {} | {} | {} {} - {} | weeks {}\n",
            course.id,
            course.title,
            course.teacher.as_deref().unwrap_or("-"),
            course.location.as_deref().unwrap_or("-"),
            weekday_name(course.weekday).unwrap_or("-"),
            course.start_time.format("%H:%M"),
            course.end_time.format("%H:%M"),
            format_weeks(&course.weeks),
        ));
    }

    out
}

/// Pad or cut `text` to exactly `width` characters.
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut = text.chars().take(width - 1).collect::<String>();
        cut.push('~');
        cut
    } else {
        format!("{text}{}", " ".repeat(width - count))
    }
}
