pub mod api;
pub mod error;
pub mod page;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

pub use error::{Error, Result};
pub use store::Store;

pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/api/settings", get(api::get_settings).put(api::put_settings))
        .route("/api/current_week", get(api::get_current_week))
        .route("/api/courses", get(api::list_courses).post(api::create_course))
        .route(
            "/api/courses/:id",
            put(api::update_course).delete(api::delete_course),
        )
        .route("/api/schedule", get(api::schedule))
        .route("/api/export", get(api::export))
        .route("/api/import", post(api::import))
        .route("/api/calendar.ics", get(api::calendar))
        .fallback(api::not_found)
        .with_state(store)
}
