use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use storage::StorageError;
use tracing::{error, warn};

/// Why an upload request did not produce a file
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Answered exactly like a missing resource
    #[error("{0}")]
    Rejected(&'static str),

    #[error("Content-Length header is missing")]
    MissingLength,

    #[error("Content-Length header is not a byte count: {0:?}")]
    InvalidLength(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl UploadError {
    fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Rejected(_) => StatusCode::NOT_FOUND,
            UploadError::MissingLength => StatusCode::LENGTH_REQUIRED,
            UploadError::InvalidLength(_) => StatusCode::BAD_REQUEST,
            UploadError::Storage(e) => match e {
                StorageError::OutsideSaveDirectory(_) => StatusCode::NOT_FOUND,
                StorageError::Incomplete { .. }
                | StorageError::Stream(_)
                | StorageError::NotADirectory(_)
                | StorageError::NamesExhausted { .. }
                | StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    // Status line only; nothing about the failure goes back to the client
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}

/// Log a failed request with its reason
pub fn log_failure(path: &str, e: &UploadError) {
    if e.is_client_error() {
        warn!(path = ?path, status = %e.status_code(), "Rejecting request: {}", e);
    } else {
        error!(path = ?path, status = %e.status_code(), "Upload failed: {}", e);
    }
}
