use thiserror::Error;

/// Failures that can cross the sync client boundary.
///
/// Most remote failures are absorbed inside the client and turned into
/// defaults; only the variants callers can act on are surfaced.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote rejected the update: {0}")]
    Rejected(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Every update strategy failed: {}", .failures.join("; "))]
    StrategiesExhausted { failures: Vec<String> },

    #[error("No content to download")]
    EmptyContent,

    #[error("Sync worker is no longer running")]
    WorkerGone,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
