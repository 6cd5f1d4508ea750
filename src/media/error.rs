use thiserror::Error;

/// Call-terminating failures of a platform handler.
///
/// Per-file download failures never surface here; they only leave the
/// affected entry without a local path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("Media not found: {0}")]
    NotFound(String),
    #[error("Failed to fetch media: {0}")]
    FetchFailed(String),
    #[error("Invalid URL for this platform: {0}")]
    InvalidUrl(String),
    #[error("No handler supports URL: {0}")]
    UnsupportedUrl(String),
}

pub type MediaResult<T> = Result<T, MediaError>;
