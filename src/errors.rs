use std::io;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures of the article store and its snapshot file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snapshot at {path} is not a valid article map: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("article {0} already exists")]
    AlreadyExists(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config.json not found in {0} or its parent directory")]
    Missing(PathBuf),
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("invalid upload filename")]
    InvalidFilename,

    #[error("failed to store upload: {0}")]
    Io(#[from] io::Error),
}

/// Errors surfaced to HTTP clients.
///
/// Bodies are short fixed strings; internal detail stays in the logs.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Article not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Article already exists")]
    Conflict,

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidFilename => ApiError::BadRequest("Invalid filename"),
            UploadError::Io(_) => ApiError::Internal,
        }
    }
}

/// Failures that abort startup.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
