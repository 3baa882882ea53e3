//! Run table command for perflab

use crate::cli::OutputFormat;
use crate::config::LabConfig;
use crate::error::Result;
use crate::export::RunRow;
use crate::metrics::{self, Run};
use crate::storage;

/// List runs, newest first
pub fn list(limit: usize, config: &LabConfig, format: OutputFormat) -> Result<()> {
    let workouts = storage::load_workouts(&config.db_path)?;
    let runs = metrics::filter_runs(&metrics::analyze(workouts));
    let newest: Vec<&Run> = runs.iter().rev().take(limit).collect();

    if format == OutputFormat::Json {
        let rows: Vec<RunRow> = newest.iter().map(|run| RunRow::from(*run)).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if newest.is_empty() {
        println!("No runs found.");
        return Ok(());
    }

    println!(
        "{:<10} {:>10} {:>10} {:>7} {:>7} {:>8} {:>11} {:>9} {:>9}",
        "Date", "Distance", "Duration", "Avg HR", "Max HR", "Cadence", "Pace", "HR Eff", "Calories"
    );
    println!("{}", "-".repeat(90));

    for run in &newest {
        let s = run.session();
        println!(
            "{:<10} {:>10} {:>10} {:>7} {:>7} {:>8} {:>11} {:>9} {:>9}",
            run.workout.record.date_label(),
            opt(s.distance_km, |d| format!("{:.2} km", d)),
            run.workout.record.duration_formatted(),
            opt(s.avg_hr, |h| format!("{:.0}", h)),
            opt(s.max_hr, |h| format!("{:.0}", h)),
            opt(s.avg_cadence, |c| format!("{:.0}", c)),
            metrics::pace_label(s.avg_pace_min_per_km),
            opt(run.workout.hr_efficiency, |e| format!("{:.4}", e)),
            opt(s.calories, |c| format!("{:.0}", c)),
        );
    }

    println!("\nShowing {} of {} runs", newest.len(), runs.len());

    Ok(())
}

fn opt(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| "-".to_string())
}
