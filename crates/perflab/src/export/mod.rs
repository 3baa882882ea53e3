//! Dashboard payload export
//!
//! Builds the JSON document consumed by the dashboard front end: scalar KPIs
//! plus flat time series. Dates are ISO calendar dates and missing values are
//! explicit `null`s.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::Result;
use crate::metrics::{self, MonthlyMileage, Run};
use crate::models::WorkoutRecord;
use crate::storage;

/// Default output path of the dashboard JSON
pub const DEFAULT_OUTPUT: &str = "pwa/data/dashboard_data.json";

const NO_DATA_MESSAGE: &str = "No running workouts available.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub generated_at: String,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpis: Option<Kpis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_runs: usize,
    pub lifetime_distance_km: f64,
    pub weekly_mileage_km: f64,
    pub training_load_ratio: f64,
    pub latest_run_date: NaiveDate,
    pub latest_run_pace: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub monthly_mileage: Vec<MonthlyMileage>,
    pub pace_vs_hr: Vec<PaceHrPoint>,
    pub cadence_trend: Vec<CadencePoint>,
    pub distance_trend: Vec<DistancePoint>,
    pub run_table: Vec<RunRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceHrPoint {
    pub workout_date: NaiveDate,
    pub avg_hr: Option<f64>,
    pub avg_pace_min_per_km: Option<f64>,
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CadencePoint {
    pub workout_date: NaiveDate,
    pub avg_cadence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistancePoint {
    pub workout_date: NaiveDate,
    pub distance_km: Option<f64>,
}

/// One row of the run table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRow {
    pub workout_date: NaiveDate,
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    pub avg_hr: Option<f64>,
    pub max_hr: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub avg_pace_min_per_km: Option<f64>,
    pub hr_efficiency: Option<f64>,
    pub calories: Option<f64>,
    pub avg_temperature: Option<f64>,
}

impl From<&Run> for RunRow {
    fn from(run: &Run) -> Self {
        let s = run.session();
        Self {
            workout_date: run.date,
            distance_km: s.distance_km,
            duration_min: s.duration_min,
            avg_hr: s.avg_hr,
            max_hr: s.max_hr,
            avg_cadence: s.avg_cadence,
            avg_pace_min_per_km: s.avg_pace_min_per_km,
            hr_efficiency: run.workout.hr_efficiency,
            calories: s.calories,
            avg_temperature: s.avg_temperature,
        }
    }
}

/// Build the payload from loaded workouts at a given local time
pub fn build_payload(workouts: Vec<WorkoutRecord>, now: NaiveDateTime) -> DashboardPayload {
    let generated_at = now.format("%Y-%m-%dT%H:%M:%S").to_string();
    let runs = metrics::filter_runs(&metrics::analyze(workouts));

    let Some(latest) = runs.last() else {
        return DashboardPayload {
            generated_at,
            has_data: false,
            message: Some(NO_DATA_MESSAGE.to_string()),
            kpis: None,
            series: None,
        };
    };

    let kpis = Kpis {
        total_runs: metrics::total_runs(&runs),
        lifetime_distance_km: round_to(metrics::lifetime_distance_km(&runs), 2),
        weekly_mileage_km: round_to(metrics::weekly_mileage_km(&runs, now.date()), 2),
        training_load_ratio: round_to(metrics::training_load_ratio(&runs), 3),
        latest_run_date: latest.date,
        latest_run_pace: latest.session().avg_pace_min_per_km,
    };

    let series = Series {
        monthly_mileage: metrics::monthly_mileage(&runs),
        pace_vs_hr: runs
            .iter()
            .filter(|run| run.session().avg_hr.is_some() && run.session().avg_pace_min_per_km.is_some())
            .map(|run| PaceHrPoint {
                workout_date: run.date,
                avg_hr: run.session().avg_hr,
                avg_pace_min_per_km: run.session().avg_pace_min_per_km,
                distance_km: run.session().distance_km,
                duration_min: run.session().duration_min,
            })
            .collect(),
        cadence_trend: runs
            .iter()
            .filter(|run| run.session().avg_cadence.is_some())
            .map(|run| CadencePoint {
                workout_date: run.date,
                avg_cadence: run.session().avg_cadence,
            })
            .collect(),
        distance_trend: runs
            .iter()
            .map(|run| DistancePoint {
                workout_date: run.date,
                distance_km: run.distance_km(),
            })
            .collect(),
        run_table: runs.iter().map(RunRow::from).collect(),
    };

    DashboardPayload {
        generated_at,
        has_data: true,
        message: None,
        kpis: Some(kpis),
        series: Some(series),
    }
}

/// Load the store and build the payload for the current local time
pub fn build_dashboard_payload(db_path: &Path) -> Result<DashboardPayload> {
    let workouts = storage::load_workouts(db_path)?;
    Ok(build_payload(workouts, Local::now().naive_local()))
}

/// Write the payload as pretty JSON, creating parent directories
pub fn write_payload(payload: &DashboardPayload, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(output, json)?;
    Ok(())
}

/// Build the payload from the store and write it to `output`
pub fn export_dashboard_json(db_path: &Path, output: &Path) -> Result<DashboardPayload> {
    let payload = build_dashboard_payload(db_path)?;
    write_payload(&payload, output)?;
    Ok(payload)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedSession;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-12-15 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn run(path: &str, date: &str, distance_km: Option<f64>, avg_hr: Option<f64>) -> WorkoutRecord {
        WorkoutRecord::new(
            path,
            1_700_000_000.0,
            NormalizedSession {
                workout_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
                sport: Some("running".into()),
                distance_km,
                duration_min: Some(50.0),
                avg_hr,
                avg_pace_min_per_km: distance_km.map(|d| 50.0 / d),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_no_runs_payload() {
        let payload = build_payload(Vec::new(), now());
        assert!(!payload.has_data);
        assert_eq!(payload.generated_at, "2024-12-15T09:30:00");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], NO_DATA_MESSAGE);
        assert!(json.get("kpis").is_none());
        assert!(json.get("series").is_none());
    }

    #[test]
    fn test_payload_kpis_and_series() {
        let payload = build_payload(
            vec![
                run("/b.fit", "2024-12-14", Some(10.0), Some(150.0)),
                run("/a.fit", "2024-11-02", Some(5.0), None),
            ],
            now(),
        );

        let kpis = payload.kpis.as_ref().unwrap();
        assert_eq!(kpis.total_runs, 2);
        assert_eq!(kpis.lifetime_distance_km, 15.0);
        assert_eq!(kpis.weekly_mileage_km, 10.0);
        assert_eq!(kpis.latest_run_date, NaiveDate::from_ymd_opt(2024, 12, 14).unwrap());
        assert_eq!(kpis.latest_run_pace, Some(5.0));

        let series = payload.series.as_ref().unwrap();
        assert_eq!(series.monthly_mileage.len(), 2);
        assert_eq!(series.pace_vs_hr.len(), 1);
        assert!(series.cadence_trend.is_empty());
        assert_eq!(series.distance_trend.len(), 2);
        assert_eq!(series.run_table[0].workout_date.to_string(), "2024-11-02");
        assert_eq!(series.run_table[1].hr_efficiency, Some(5.0 / 150.0));
    }

    #[test]
    fn test_missing_values_serialize_as_null() {
        let payload = build_payload(vec![run("/a.fit", "2024-12-14", None, None)], now());
        let json = serde_json::to_value(&payload).unwrap();

        let row = &json["series"]["run_table"][0];
        assert_eq!(row["workout_date"], "2024-12-14");
        assert!(row["distance_km"].is_null());
        assert!(row["hr_efficiency"].is_null());
        assert!(json["kpis"]["latest_run_pace"].is_null());
        assert_eq!(json["series"]["monthly_mileage"][0]["month"], "2024-12-01");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.3333333, 3), 1.333);
    }

    #[test]
    fn test_write_payload_creates_parent() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("pwa/data/dashboard_data.json");

        write_payload(&build_payload(Vec::new(), now()), &output).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["has_data"], false);
    }
}
