//! Typed access to the timetable HTTP API.

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use timetable_grid::{Course, CourseInput, Settings, SettingsInput, Snapshot};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct CurrentWeek {
    current_week: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    pub status: String,
    pub courses: usize,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new<S: Into<String>>(base: S) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }

        Self {
            base,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Send a request and turn any non-success status into [`Error::Api`]
    /// carrying the server's `error` message.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => fallback,
        };
        log::debug!("Server answered {status}: {message}");

        Err(Error::Api { status, message })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn settings(&self) -> Result<Settings> {
        self.send_json(self.http.get(self.url("/api/settings"))).await
    }

    pub async fn replace_settings(&self, input: &SettingsInput) -> Result<Settings> {
        self.send_json(self.http.put(self.url("/api/settings")).json(input))
            .await
    }

    pub async fn current_week(&self) -> Result<u32> {
        let week: CurrentWeek = self
            .send_json(self.http.get(self.url("/api/current_week")))
            .await?;
        Ok(week.current_week)
    }

    pub async fn courses(&self) -> Result<Vec<Course>> {
        self.send_json(self.http.get(self.url("/api/courses"))).await
    }

    pub async fn create_course(&self, input: &CourseInput) -> Result<Course> {
        self.send_json(self.http.post(self.url("/api/courses")).json(input))
            .await
    }

    pub async fn update_course(&self, id: u64, input: &CourseInput) -> Result<Course> {
        self.send_json(
            self.http
                .put(self.url(&format!("/api/courses/{id}")))
                .json(input),
        )
        .await
    }

    pub async fn delete_course(&self, id: u64) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("/api/courses/{id}"))))
            .await?;
        Ok(())
    }

    /// Courses active in `week`, as filtered by the server.
    pub async fn schedule(&self, week: u32) -> Result<Vec<Course>> {
        self.send_json(
            self.http
                .get(self.url("/api/schedule"))
                .query(&[("week", week)]),
        )
        .await
    }

    pub async fn export(&self) -> Result<Snapshot> {
        self.send_json(self.http.get(self.url("/api/export"))).await
    }

    /// Replace all server data. The snapshot is sent as given.
    pub async fn import(&self, snapshot: &Value) -> Result<ImportSummary> {
        self.send_json(self.http.post(self.url("/api/import")).json(snapshot))
            .await
    }
}
