//! Read-only HTML view of a single week.

use axum::{
    extract::{Query, State},
    response::Html,
};

use timetable_grid::{current_week, weekday_name, Course, ScheduleView, Snapshot, COLUMNS};

use crate::{
    api::{AppState, WeekQuery},
    store::today,
};

/// Pixel height of one slot row.
pub const SLOT_HEIGHT: f64 = 40.0;

const STYLE: &str = "\
body{font-family:sans-serif;margin:1.5rem}\
.grid{display:grid;grid-template-columns:80px repeat(7,1fr)}\
.grid.header div{font-weight:bold;padding:4px}\
.time-cell,.slot-cell{height:40px;box-sizing:border-box;border-top:1px solid #eee}\
.day-column{position:relative;border-left:1px solid #eee}\
.course-block{position:absolute;left:2px;right:2px;overflow:hidden;color:#fff;border-radius:4px;padding:2px 4px;box-sizing:border-box}\
.course-block h4,.course-block p{margin:0;font-size:12px}\
table{margin-top:1.5rem;border-collapse:collapse}\
td,th{padding:4px 8px;border-bottom:1px solid #eee;text-align:left}";

pub async fn index(State(store): State<AppState>, Query(query): Query<WeekQuery>) -> Html<String> {
    let snapshot = store.snapshot().await;
    let current = current_week(snapshot.settings.first_monday, today());
    let week = query.page_week(current);

    Html(render_page(&snapshot, current, week))
}

pub fn render_page(snapshot: &Snapshot, current_week: u32, week: u32) -> String {
    let settings = &snapshot.settings;
    let view = ScheduleView::new(settings, &snapshot.courses, week);
    let grid = &view.grid;

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(&settings.semester_name)
    ));

    html.push_str(&format!(
        "<header>\n<h1>{}</h1>\n<p>Current week: {current_week}</p>\n<p>{} - {} | {} minutes per slot</p>\n",
        escape(&settings.semester_name),
        settings.day_start.format("%H:%M"),
        settings.day_end.format("%H:%M"),
        settings.slot_interval,
    ));
    html.push_str(&format!(
        "<nav><a href=\"/?week={}\">&larr;</a> Week {week} <a href=\"/?week={}\">&rarr;</a></nav>\n</header>\n",
        week.saturating_sub(1).max(1),
        week.saturating_add(1),
    ));

    html.push_str("<div class=\"grid header\">\n<div>Time</div>\n");
    for weekday in 1..=COLUMNS as u8 {
        html.push_str(&format!("<div>{}</div>\n", weekday_name(weekday).unwrap_or("")));
    }
    html.push_str("</div>\n<div class=\"grid\">\n<div class=\"time-column\">\n");

    for slot in &grid.slots {
        html.push_str(&format!(
            "<div class=\"time-cell\">{}</div>\n",
            slot.format("%H:%M")
        ));
    }
    html.push_str("</div>\n");

    let total_height = grid.rows() as f64 * SLOT_HEIGHT;
    for column in &grid.columns {
        html.push_str(&format!(
            "<div class=\"day-column\" style=\"height:{total_height}px\">\n"
        ));
        html.push_str(&"<div class=\"slot-cell\"></div>\n".repeat(grid.rows()));

        for block in column {
            html.push_str(&format!(
                "<div class=\"course-block\" style=\"top:{:.2}px;height:{:.2}px;background:{}\">\n",
                block.span.top(SLOT_HEIGHT),
                block.span.height(SLOT_HEIGHT),
                escape(block.course.color()),
            ));
            render_block_body(&mut html, block.course);
            html.push_str("</div>\n");
        }

        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");

    render_course_table(&mut html, &snapshot.courses);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_block_body(html: &mut String, course: &Course) {
    html.push_str(&format!("<h4>{}</h4>\n", escape(&course.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} | {}</p>\n",
        escape(course.location.as_deref().unwrap_or("-")),
        escape(course.teacher.as_deref().unwrap_or("")),
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} - {}</p>\n",
        course.start_time.format("%H:%M"),
        course.end_time.format("%H:%M"),
    ));

    if let Some(remark) = &course.remark {
        html.push_str(&format!("<p class=\"remark\">{}</p>\n", escape(remark)));
    }
}

fn render_course_table(html: &mut String, courses: &[Course]) {
    html.push_str(
        "<table class=\"courses\">\n<tr><th>Title</th><th>Teacher</th><th>Location</th>\
         <th>Weekday</th><th>Time</th><th>Weeks</th></tr>\n",
    );

    for course in courses {
        let weeks = course
            .weeks
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} - {}</td><td>{}</td></tr>\n",
            escape(&course.title),
            escape(course.teacher.as_deref().unwrap_or("-")),
            escape(course.location.as_deref().unwrap_or("-")),
            weekday_name(course.weekday).unwrap_or("-"),
            course.start_time.format("%H:%M"),
            course.end_time.format("%H:%M"),
            weeks,
        ));
    }

    html.push_str("</table>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
