use std::io;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The server could not be reached or the connection broke
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Command line input that cannot be turned into a request
    #[error("{0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, Error>;
