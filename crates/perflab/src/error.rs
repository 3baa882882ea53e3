use std::path::PathBuf;

use thiserror::Error;

/// Main error type for perflab
#[derive(Error, Debug)]
pub enum PerfLabError {
    #[error("Activity folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No session record found in FIT file")]
    NoSessionRecord,

    #[error("Unreadable file: {0}")]
    UnreadableFile(String),

    #[error("Malformed FIT data: {0}")]
    MalformedField(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not find GARMIN folder automatically. Use --garmin-path.")]
    GarminRootNotFound,
}

pub type Result<T> = std::result::Result<T, PerfLabError>;

impl PerfLabError {
    /// Create a database error from a message
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a configuration error from a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed-data error from a message
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedField(msg.into())
    }

    /// Whether this error belongs to a single activity file.
    ///
    /// File-level errors are logged and skipped by the ingestor; everything
    /// else aborts the run.
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            Self::NoSessionRecord | Self::UnreadableFile(_) | Self::MalformedField(_)
        )
    }
}

/// Render an error for the terminal
pub fn format_user_error(err: &PerfLabError) -> String {
    match err {
        PerfLabError::DirectoryNotFound(path) => format!(
            "Activity folder not found: {}. Point --garmin-path at the folder that contains Activity/.",
            path.display()
        ),
        other => other.to_string(),
    }
}
