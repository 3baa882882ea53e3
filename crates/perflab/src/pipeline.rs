//! Ingest-then-store refresh pipeline

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{self, LabConfig};
use crate::error::Result;
use crate::ingest::{ingest_activity_folder, ErrorLog};
use crate::storage;

/// Counts from one refresh run
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSummary {
    /// Files that produced a workout record
    pub parsed: usize,
    /// Rows written to the store
    pub upserted: usize,
    /// Files skipped and written to the error log
    pub failed: usize,
    pub error_log: PathBuf,
}

impl fmt::Display for RefreshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed {} FIT files and updated {} rows.",
            self.parsed, self.upserted
        )?;
        if self.failed > 0 {
            write!(
                f,
                " Skipped {} files (see {}).",
                self.failed,
                self.error_log.display()
            )?;
        }
        Ok(())
    }
}

/// Ingest `activity_dir` and upsert the parsed workouts
pub fn refresh_database(activity_dir: &Path, config: &LabConfig) -> Result<RefreshSummary> {
    let error_log = ErrorLog::new(&config.error_log_path);
    let report = ingest_activity_folder(activity_dir, &error_log)?;

    let upserted = storage::upsert_workouts(&config.db_path, &report.records)?;
    info!(
        parsed = report.parsed(),
        upserted,
        db = %config.db_path.display(),
        "Refresh complete"
    );

    Ok(RefreshSummary {
        parsed: report.parsed(),
        upserted,
        failed: report.failed(),
        error_log: config.error_log_path.clone(),
    })
}

/// Refresh from the `Activity/` folder of a GARMIN root
pub fn refresh_from_garmin(garmin_root: &Path, config: &LabConfig) -> Result<RefreshSummary> {
    refresh_database(&config::activity_dir(garmin_root), config)
}
