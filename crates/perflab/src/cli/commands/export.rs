//! Export command for perflab

use std::path::{Path, PathBuf};

use crate::config::LabConfig;
use crate::error::Result;
use crate::export::export_dashboard_json;

use super::refresh::{print_summary, refresh};

/// Optionally refresh, then write the dashboard JSON
pub fn run(
    garmin_path: Option<PathBuf>,
    skip_refresh: bool,
    output: &Path,
    config: &LabConfig,
) -> Result<()> {
    if !skip_refresh {
        let summary = refresh(garmin_path, config)?;
        print_summary(&summary);
    }

    let payload = export_dashboard_json(&config.db_path, output)?;
    println!("Exported dashboard JSON: {}", output.display());
    println!("Data available: {}", payload.has_data);

    Ok(())
}
