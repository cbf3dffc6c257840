use std::sync::Arc;

use chrono::{Duration, Local};
use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

use timetable_grid::{Course, Settings, Snapshot};
use timetable_server::{router, Store};

struct TestServer {
    base: String,
    http: Client,
    _dir: TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(store))).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            http: Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> T {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        assert!(response.status().is_success(), "GET {path}: {}", response.status());
        response.json().await.unwrap()
    }

    async fn create(&self, body: Value) -> Course {
        let response = self
            .http
            .post(self.url("/api/courses"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn schedule_ids(&self, week: u32) -> Vec<u64> {
        self.get::<Vec<Course>>(&format!("/api/schedule?week={week}"))
            .await
            .into_iter()
            .map(|course| course.id)
            .collect()
    }
}

fn course_body(title: &str, weekday: u8, weeks: &[i64]) -> Value {
    json!({
        "title": title,
        "teacher": "Dr. Ada",
        "location": "",
        "weekday": weekday,
        "start_time": "08:00",
        "end_time": "09:35",
        "weeks": weeks,
        "color": "#ff8800",
        "remark": ""
    })
}

async fn error_of(response: reqwest::Response) -> (StatusCode, String) {
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    (status, body["error"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn course_lifecycle() {
    let server = TestServer::spawn().await;

    let algebra = server.create(course_body("Algebra", 1, &[1, 3, 5])).await;
    let physics = server.create(course_body("Physics", 3, &[3, 3, 2])).await;

    assert_eq!((algebra.id, physics.id), (1, 2));
    assert_eq!(algebra.teacher.as_deref(), Some("Dr. Ada"));
    assert_eq!(algebra.location, None);
    assert_eq!(physics.weeks, [2, 3]);

    assert_eq!(server.schedule_ids(3).await, [1, 2]);
    assert_eq!(server.schedule_ids(2).await, [2]);
    assert_eq!(server.schedule_ids(4).await, Vec::<u64>::new());

    let response = server
        .http
        .put(server.url("/api/courses/1"))
        .json(&course_body("Linear Algebra", 2, &[4]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Course = response.json().await.unwrap();
    assert_eq!((updated.id, updated.weekday), (1, 2));
    assert_eq!(updated.title, "Linear Algebra");
    assert_eq!(server.schedule_ids(4).await, [1]);

    let response = server
        .http
        .delete(server.url("/api/courses/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining: Vec<Course> = server.get("/api/courses").await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 1);
    for week in 1..=6 {
        assert!(!server.schedule_ids(week).await.contains(&2));
    }
}

#[tokio::test]
async fn schedule_defaults_to_week_one() {
    let server = TestServer::spawn().await;
    server.create(course_body("Algebra", 1, &[1])).await;
    server.create(course_body("Physics", 1, &[2])).await;

    let courses: Vec<Course> = server.get("/api/schedule").await;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Algebra");
}

#[tokio::test]
async fn schedule_for_non_positive_week_is_empty() {
    let server = TestServer::spawn().await;
    server.create(course_body("Algebra", 1, &[1])).await;

    for query in ["week=-3", "week=0"] {
        let courses: Vec<Course> = server.get(&format!("/api/schedule?{query}")).await;
        assert!(courses.is_empty(), "{query}");
    }

    let courses: Vec<Course> = server.get("/api/schedule?week=1.5").await;
    assert_eq!(courses.len(), 1);
}

#[tokio::test]
async fn page_week_falls_back_to_current_or_first() {
    let server = TestServer::spawn().await;
    let first_monday = Local::now().date_naive() - Duration::days(15);
    server
        .http
        .put(server.url("/api/settings"))
        .json(&json!({ "first_monday": first_monday.format("%Y-%m-%d").to_string() }))
        .send()
        .await
        .unwrap();

    for (path, week) in [
        ("/", 3),
        ("/?week=5", 5),
        ("/?week=-3", 1),
        ("/?week=0", 1),
        ("/?week=abc", 1),
    ] {
        let page = server
            .http
            .get(server.url(path))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains(&format!("</a> Week {week} <a")), "{path}");
    }
}

#[tokio::test]
async fn invalid_requests_carry_error_messages() {
    let server = TestServer::spawn().await;

    let mut body = course_body("Algebra", 1, &[1]);
    body.as_object_mut().unwrap().remove("title");
    let response = server
        .http
        .post(server.url("/api/courses"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(
        error_of(response).await,
        (StatusCode::BAD_REQUEST, "Missing field: title".to_string())
    );

    let response = server
        .http
        .post(server.url("/api/courses"))
        .json(&course_body("Algebra", 9, &[1]))
        .send()
        .await
        .unwrap();
    assert_eq!(
        error_of(response).await,
        (
            StatusCode::BAD_REQUEST,
            "weekday must be between 1 and 7".to_string()
        )
    );

    let response = server
        .http
        .post(server.url("/api/courses"))
        .body("{\"title\":")
        .send()
        .await
        .unwrap();
    let (status, message) = error_of(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.starts_with("Invalid JSON body"));

    let response = server
        .http
        .put(server.url("/api/courses/42"))
        .json(&course_body("Algebra", 1, &[1]))
        .send()
        .await
        .unwrap();
    assert_eq!(
        error_of(response).await,
        (StatusCode::NOT_FOUND, "Course not found".to_string())
    );

    let response = server
        .http
        .delete(server.url("/api/courses/first"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server.http.get(server.url("/api/nothing")).send().await.unwrap();
    assert_eq!(
        error_of(response).await,
        (StatusCode::NOT_FOUND, "Not found".to_string())
    );

    let courses: Vec<Course> = server.get("/api/courses").await;
    assert!(courses.is_empty());
}

#[tokio::test]
async fn settings_are_replaced_whole() {
    let server = TestServer::spawn().await;

    let response = server
        .http
        .put(server.url("/api/settings"))
        .json(&json!({
            "semester_name": "Spring",
            "first_monday": "2025-02-24",
            "day_start": "07:30",
            "day_end": "18:00",
            "slot_interval": 45
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let settings: Value = server.get("/api/settings").await;
    assert_eq!(
        settings,
        json!({
            "semester_name": "Spring",
            "first_monday": "2025-02-24",
            "day_start": "07:30",
            "day_end": "18:00",
            "slot_interval": 45
        })
    );

    let response = server
        .http
        .put(server.url("/api/settings"))
        .json(&json!({"day_start": "18:00", "day_end": "07:30"}))
        .send()
        .await
        .unwrap();
    assert_eq!(
        error_of(response).await,
        (StatusCode::BAD_REQUEST, "Invalid day time range".to_string())
    );

    let unchanged: Value = server.get("/api/settings").await;
    assert_eq!(unchanged, settings);
}

#[tokio::test]
async fn current_week_follows_first_monday() {
    let server = TestServer::spawn().await;
    let first_monday = Local::now().date_naive() - Duration::days(15);

    server
        .http
        .put(server.url("/api/settings"))
        .json(&json!({ "first_monday": first_monday.format("%Y-%m-%d").to_string() }))
        .send()
        .await
        .unwrap();

    let week: Value = server.get("/api/current_week").await;
    assert_eq!(week, json!({ "current_week": 3 }));
}

#[tokio::test]
async fn export_import_round_trip() {
    let source = TestServer::spawn().await;
    source.create(course_body("Algebra", 1, &[1, 2])).await;
    source.create(course_body("Physics", 4, &[7])).await;
    source.create(course_body("Chemistry", 5, &[8])).await;
    source
        .http
        .delete(source.url("/api/courses/1"))
        .send()
        .await
        .unwrap();

    let exported: Snapshot = source.get("/api/export").await;

    let target = TestServer::spawn().await;
    let response = target
        .http
        .post(target.url("/api/import"))
        .json(&exported)
        .send()
        .await
        .unwrap();
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary, json!({ "status": "ok", "courses": 2 }));

    let imported: Snapshot = target.get("/api/export").await;
    assert_eq!(imported.settings, exported.settings);

    let without_ids = |courses: &[Course]| -> Vec<Course> {
        courses
            .iter()
            .cloned()
            .map(|course| Course { id: 0, ..course })
            .collect()
    };
    assert_eq!(without_ids(&imported.courses), without_ids(&exported.courses));
    assert_eq!(
        imported.courses.iter().map(|course| course.id).collect::<Vec<_>>(),
        [1, 2]
    );
}

#[tokio::test]
async fn rejected_import_keeps_data() {
    let server = TestServer::spawn().await;
    server.create(course_body("Algebra", 1, &[1])).await;
    let before: Snapshot = server.get("/api/export").await;

    let response = server
        .http
        .post(server.url("/api/import"))
        .json(&json!({
            "settings": { "semester_name": "Broken" },
            "courses": [course_body("Physics", 1, &[1]), course_body("", 1, &[1])]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(
        error_of(response).await,
        (StatusCode::BAD_REQUEST, "title must not be empty".to_string())
    );

    let after: Snapshot = server.get("/api/export").await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn calendar_and_page_render() {
    let server = TestServer::spawn().await;
    let settings: Settings = server.get("/api/settings").await;
    server.create(course_body("Algebra", 1, &[1, 2])).await;

    let response = server
        .http
        .get(server.url("/api/calendar.ics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["content-type"], "text/calendar");
    let ics = response.text().await.unwrap();
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert!(ics.contains(&format!(
        "DTSTART:{}T080000",
        settings.first_monday.format("%Y%m%d")
    )));

    let page = server
        .http
        .get(server.url("/?week=2"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("<h4>Algebra</h4>"));
    assert!(page.contains("Week 2"));
}
