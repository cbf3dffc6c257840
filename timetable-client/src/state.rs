//! Client-side application state.
//!
//! [`AppState`] is an immutable snapshot of what was last fetched. Every action
//! on [`App`] fetches what it needs into a new snapshot and swaps it in only
//! once all requests succeeded, so a failed action leaves the previous state
//! untouched.

use serde_json::Value;

use timetable_grid::{Course, CourseInput, Grid, Settings, SettingsInput, Snapshot};

use crate::{
    api::{ApiClient, ImportSummary},
    error::Result,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub settings: Settings,
    pub current_week: u32,
    pub selected_week: u32,
    pub courses: Vec<Course>,
    /// Courses active in `selected_week`.
    pub schedule: Vec<Course>,
}

impl AppState {
    /// Lay out the selected week.
    pub fn grid(&self) -> Grid<'_> {
        Grid::new(&self.settings, &self.schedule)
    }
}

/// Clamp a requested week number to the first week.
pub fn clamp_week(week: i64) -> u32 {
    u32::try_from(week.max(1)).unwrap_or(u32::MAX)
}

pub struct App {
    api: ApiClient,
    state: AppState,
}

impl App {
    /// Load everything and select the current week.
    pub async fn bootstrap(api: ApiClient) -> Result<Self> {
        let settings = api.settings().await?;
        let current_week = api.current_week().await?;
        let courses = api.courses().await?;
        let schedule = api.schedule(current_week).await?;

        log::debug!("Bootstrapped at week {current_week} with {} course(s)", courses.len());

        Ok(Self {
            api,
            state: AppState {
                settings,
                current_week,
                selected_week: current_week,
                courses,
                schedule,
            },
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn select_week(&mut self, week: i64) -> Result<()> {
        let selected_week = clamp_week(week);
        let schedule = self.api.schedule(selected_week).await?;

        self.state = AppState {
            selected_week,
            schedule,
            ..self.state.clone()
        };
        Ok(())
    }

    pub async fn previous_week(&mut self) -> Result<()> {
        self.select_week(i64::from(self.state.selected_week) - 1)
            .await
    }

    pub async fn next_week(&mut self) -> Result<()> {
        self.select_week(i64::from(self.state.selected_week) + 1)
            .await
    }

    /// Create a course, or replace course `id` when given.
    pub async fn save_course(&mut self, id: Option<u64>, input: &CourseInput) -> Result<Course> {
        let course = match id {
            Some(id) => self.api.update_course(id, input).await?,
            None => self.api.create_course(input).await?,
        };

        self.state = self.refetch_courses().await?;
        Ok(course)
    }

    pub async fn delete_course(&mut self, id: u64) -> Result<()> {
        self.api.delete_course(id).await?;
        self.state = self.refetch_courses().await?;
        Ok(())
    }

    pub async fn save_settings(&mut self, input: &SettingsInput) -> Result<()> {
        self.api.replace_settings(input).await?;
        self.state = self.refetch_all().await?;
        Ok(())
    }

    pub async fn export(&self) -> Result<Snapshot> {
        self.api.export().await
    }

    pub async fn import(&mut self, snapshot: &Value) -> Result<ImportSummary> {
        let summary = self.api.import(snapshot).await?;
        self.state = self.refetch_all().await?;
        Ok(summary)
    }

    async fn refetch_courses(&self) -> Result<AppState> {
        let courses = self.api.courses().await?;
        let schedule = self.api.schedule(self.state.selected_week).await?;

        Ok(AppState {
            courses,
            schedule,
            ..self.state.clone()
        })
    }

    /// Refetch settings and the current week as well. The selection follows
    /// the current week only while it still sits on week 1.
    async fn refetch_all(&self) -> Result<AppState> {
        let settings = self.api.settings().await?;
        let current_week = self.api.current_week().await?;
        let selected_week = if self.state.selected_week == 1 {
            current_week
        } else {
            self.state.selected_week
        };
        let courses = self.api.courses().await?;
        let schedule = self.api.schedule(selected_week).await?;

        Ok(AppState {
            settings,
            current_week,
            selected_week,
            courses,
            schedule,
        })
    }
}
