pub mod api;
pub mod error;
pub mod input;
pub mod state;
pub mod view;

pub use api::{ApiClient, ImportSummary};
pub use error::{Error, Result};
pub use state::{clamp_week, App, AppState};
