//! Stats command for perflab

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::config::LabConfig;
use crate::error::Result;
use crate::metrics::{self, MonthlyMileage, TrainingLoad};
use crate::storage;

use super::refresh::{print_summary, refresh};

#[derive(Debug, Serialize)]
struct StatsView {
    total_runs: usize,
    lifetime_distance_km: f64,
    weekly_mileage_km: f64,
    training_load: TrainingLoad,
    latest_run_date: Option<NaiveDate>,
    latest_run_pace: Option<f64>,
    monthly_mileage: Vec<MonthlyMileage>,
}

/// Show running KPIs and monthly mileage
pub fn show(garmin_path: Option<PathBuf>, config: &LabConfig, format: OutputFormat) -> Result<()> {
    // First run: populate the database so there is something to show
    if !config.db_path.exists() {
        match refresh(garmin_path, config) {
            Ok(summary) => print_summary(&summary),
            Err(e) => warn!(error = %e, "Initial ingestion failed"),
        }
    }

    let workouts = storage::load_workouts(&config.db_path)?;
    let runs = metrics::filter_runs(&metrics::analyze(workouts));

    if runs.is_empty() {
        println!("No running workouts found yet. Check your GARMIN path and run 'perflab refresh'.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let latest = runs.last();
    let view = StatsView {
        total_runs: metrics::total_runs(&runs),
        lifetime_distance_km: metrics::lifetime_distance_km(&runs),
        weekly_mileage_km: metrics::weekly_mileage_km(&runs, today),
        training_load: metrics::training_load(&runs),
        latest_run_date: latest.map(|run| run.date),
        latest_run_pace: latest.and_then(|run| run.session().avg_pace_min_per_km),
        monthly_mileage: metrics::monthly_mileage(&runs),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => print_table(&view),
    }

    Ok(())
}

fn print_table(view: &StatsView) {
    println!("{:<24} {:>12}", "Total Runs", view.total_runs);
    println!(
        "{:<24} {:>12}",
        "Lifetime Distance",
        format!("{:.1} km", view.lifetime_distance_km)
    );
    println!(
        "{:<24} {:>12}",
        "Weekly Mileage",
        format!("{:.1} km", view.weekly_mileage_km)
    );
    println!(
        "{:<24} {:>12}",
        "7d vs 28d Load Ratio",
        format!("{:.2}", view.training_load.ratio)
    );
    println!(
        "{:<24} {:>12}",
        "  Acute (7d)",
        format!("{:.1} km", view.training_load.acute_km)
    );
    println!(
        "{:<24} {:>12}",
        "  Chronic (28d / 4)",
        format!("{:.1} km", view.training_load.chronic_weekly_avg_km)
    );
    if let Some(date) = view.latest_run_date {
        println!("{:<24} {:>12}", "Latest Run", date.format("%Y-%m-%d").to_string());
        println!("{:<24} {:>12}", "Latest Pace", metrics::pace_label(view.latest_run_pace));
    }

    println!();
    println!("{:<10} {:>12}", "Month", "Distance");
    println!("{}", "-".repeat(23));
    for month in &view.monthly_mileage {
        println!(
            "{:<10} {:>12}",
            month.month.format("%Y-%m").to_string(),
            format!("{:.1} km", month.distance_km)
        );
    }
}
