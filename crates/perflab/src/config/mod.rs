use crate::error::{PerfLabError, Result};
use std::path::{Path, PathBuf};

/// Default data directory name
const DATA_DIR_NAME: &str = "perflab";

/// Database file name inside the data directory
pub const DB_FILENAME: &str = "performance_lab.db";

/// Error log file name inside the data directory
pub const ERROR_LOG_FILENAME: &str = "ingestion_errors.log";

/// Sub-folder of the GARMIN root that holds activity FIT files
pub const ACTIVITY_DIR_NAME: &str = "Activity";

/// Get the data directory path
/// Returns ~/.local/share/perflab on Unix, ~/Library/Application Support/perflab on macOS
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .ok_or_else(|| PerfLabError::config("Could not determine data directory"))
}

/// Default SQLite database path
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILENAME))
}

/// Default ingestion error log path
pub fn default_error_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(ERROR_LOG_FILENAME))
}

/// Places where a GARMIN folder is looked for, in order
pub fn default_garmin_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(dir) = data_dir() {
        candidates.push(dir.join("garmin_export").join("GARMIN"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("GARMIN"));
        if let Some(parent) = cwd.parent() {
            candidates.push(parent.join("GARMIN"));
        }
    }
    candidates
}

/// First candidate that contains an `Activity/` folder
pub fn detect_garmin_root(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|candidate| candidate.join(ACTIVITY_DIR_NAME).exists())
        .cloned()
}

/// Activity folder below a GARMIN root
pub fn activity_dir(garmin_root: &Path) -> PathBuf {
    garmin_root.join(ACTIVITY_DIR_NAME)
}

/// Resolved locations for one run
#[derive(Debug, Clone, PartialEq)]
pub struct LabConfig {
    pub db_path: PathBuf,
    pub error_log_path: PathBuf,
}

impl LabConfig {
    pub fn new(db_path: impl Into<PathBuf>, error_log_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            error_log_path: error_log_path.into(),
        }
    }

    /// Build from optional overrides, falling back to the data directory
    pub fn resolve(db_path: Option<PathBuf>, error_log_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => default_db_path()?,
        };
        let error_log_path = match error_log_path {
            Some(path) => path,
            None => default_error_log_path()?,
        };
        Ok(Self::new(db_path, error_log_path))
    }
}

/// Pick the GARMIN root: an explicit path wins, otherwise auto-detect
pub fn resolve_garmin_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.canonicalize().unwrap_or(path)),
        None => detect_garmin_root(&default_garmin_candidates()).ok_or(PerfLabError::GarminRootNotFound),
    }
}
