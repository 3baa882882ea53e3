//! Refresh command for perflab

use std::path::PathBuf;

use crate::config::{resolve_garmin_root, LabConfig};
use crate::error::Result;
use crate::pipeline::{refresh_from_garmin, RefreshSummary};

/// Re-read every FIT file and update the database
pub fn run(garmin_path: Option<PathBuf>, config: &LabConfig) -> Result<()> {
    let summary = refresh(garmin_path, config)?;
    print_summary(&summary);
    Ok(())
}

/// Resolve the GARMIN root and run the refresh pipeline
pub(crate) fn refresh(garmin_path: Option<PathBuf>, config: &LabConfig) -> Result<RefreshSummary> {
    let garmin_root = resolve_garmin_root(garmin_path)?;
    println!("Reading activities from: {}", garmin_root.display());
    refresh_from_garmin(&garmin_root, config)
}

pub(crate) fn print_summary(summary: &RefreshSummary) {
    println!(
        "Refresh complete. Parsed {} FIT files and updated {} rows.",
        summary.parsed, summary.upserted
    );
    if summary.failed > 0 {
        println!(
            "Skipped {} file(s). Details: {}",
            summary.failed,
            summary.error_log.display()
        );
    }
}
