use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use timetable_grid::{
    active_in_week, current_week, Course, CourseInput, Settings, SettingsInput, Snapshot,
    SnapshotInput,
};

use crate::{
    error::{Error, Result},
    store::{today, Store},
};

pub type AppState = Arc<Store>;

/// Decode a JSON body regardless of the declared content type.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| Error::BadRequest(format!("Invalid JSON body: {err}")))
}

pub async fn get_settings(State(store): State<AppState>) -> Json<Settings> {
    Json(store.settings().await)
}

pub async fn put_settings(State(store): State<AppState>, body: Bytes) -> Result<Json<Settings>> {
    let input: SettingsInput = parse_body(&body)?;
    let settings = store.replace_settings(input.validate(today())?).await?;
    log::info!(
        "Settings replaced: {} from {}",
        settings.semester_name,
        settings.first_monday
    );

    Ok(Json(settings))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentWeek {
    pub current_week: u32,
}

pub async fn get_current_week(State(store): State<AppState>) -> Json<CurrentWeek> {
    let settings = store.settings().await;
    Json(CurrentWeek {
        current_week: current_week(settings.first_monday, today()),
    })
}

pub async fn list_courses(State(store): State<AppState>) -> Json<Vec<Course>> {
    Json(store.courses().await)
}

pub async fn create_course(
    State(store): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Course>)> {
    let input: CourseInput = parse_body(&body)?;
    let course = store.create_course(input.validate()?).await?;
    log::info!("Course {} created: {}", course.id, course.title);

    Ok((StatusCode::CREATED, Json(course)))
}

fn course_id(path: std::result::Result<Path<u64>, PathRejection>) -> Result<u64> {
    path.map(|Path(id)| id)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

pub async fn update_course(
    State(store): State<AppState>,
    path: std::result::Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Course>> {
    let id = course_id(path)?;
    let input: CourseInput = parse_body(&body)?;
    let draft = input.validate()?;
    let course = store.update_course(id, draft).await?;
    log::info!("Course {} updated: {}", course.id, course.title);

    Ok(Json(course))
}

pub async fn delete_course(
    State(store): State<AppState>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<StatusCode> {
    let id = course_id(path)?;
    store.delete_course(id).await?;
    log::info!("Course {id} deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    #[serde(default)]
    pub week: Option<String>,
}

impl WeekQuery {
    /// The requested week when it was given as an integer, of any sign.
    pub fn number(&self) -> Option<i64> {
        self.week
            .as_deref()
            .and_then(|week| week.trim().parse().ok())
    }

    /// Week shown by the page: `current` when no week was asked for, and 1
    /// when the request is not a positive integer.
    pub fn page_week(&self, current: u32) -> u32 {
        if self.week.is_none() {
            return current;
        }

        self.number()
            .and_then(|week| u32::try_from(week).ok())
            .filter(|week| *week >= 1)
            .unwrap_or(1)
    }
}

/// Courses active in the requested week; a missing or non-integer week means
/// week 1 and a non-positive one matches nothing.
pub async fn schedule(
    State(store): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Json<Vec<Course>> {
    let week = query.number().unwrap_or(1);
    log::debug!("Schedule requested for week {week}");

    let courses = store.courses().await;
    let active = match u32::try_from(week) {
        Ok(week) if week >= 1 => active_in_week(&courses, week).cloned().collect(),
        _ => Vec::new(),
    };

    Json(active)
}

pub async fn export(State(store): State<AppState>) -> Json<Snapshot> {
    Json(store.snapshot().await)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportSummary {
    pub status: String,
    pub courses: usize,
}

pub async fn import(State(store): State<AppState>, body: Bytes) -> Result<Json<ImportSummary>> {
    let input: SnapshotInput = parse_body(&body)?;
    let snapshot = input.validate(today())?;
    let count = snapshot.courses.len();
    store.import(snapshot).await?;
    log::info!("Snapshot imported with {count} course(s)");

    Ok(Json(ImportSummary {
        status: "ok".to_string(),
        courses: count,
    }))
}

pub async fn calendar(State(store): State<AppState>) -> impl IntoResponse {
    let snapshot = store.snapshot().await;
    let body = snapshot.to_ics().to_string();

    ([(header::CONTENT_TYPE, "text/calendar")], body)
}

pub async fn not_found() -> Error {
    Error::UnknownRoute
}
