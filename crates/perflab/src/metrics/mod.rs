//! Running metrics over stored workouts
//!
//! Provides:
//! - [`analyze`]: run flag and HR efficiency for every loaded workout
//! - [`filter_runs`]: dated running workouts, oldest first
//! - lifetime, monthly and weekly distance aggregates
//! - the acute:chronic training-load ratio ([`training_load`])

mod training_load;

pub use training_load::{
    training_load, training_load_ratio, TrainingLoad, ACUTE_WINDOW_DAYS, CHRONIC_WINDOW_DAYS,
};

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{NormalizedSession, WorkoutRecord};

/// Sport label counted as running
pub const RUN_SPORT: &str = "running";

/// A loaded workout with its derived per-record metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedWorkout {
    #[serde(flatten)]
    pub record: WorkoutRecord,
    pub is_run: bool,
    /// Pace divided by average heart rate
    pub hr_efficiency: Option<f64>,
}

/// A running workout with a known date
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub date: NaiveDate,
    pub workout: AnalyzedWorkout,
}

impl Run {
    pub fn session(&self) -> &NormalizedSession {
        &self.workout.record.session
    }

    pub fn distance_km(&self) -> Option<f64> {
        self.session().distance_km
    }
}

/// Distance run in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMileage {
    /// First day of the month
    pub month: NaiveDate,
    pub distance_km: f64,
}

/// Pace ÷ heart rate; `None` when either side is missing or HR is zero
pub fn hr_efficiency(pace_min_per_km: Option<f64>, avg_hr: Option<f64>) -> Option<f64> {
    let (pace, hr) = (pace_min_per_km?, avg_hr?);
    if hr == 0.0 {
        return None;
    }
    let efficiency = pace / hr;
    efficiency.is_finite().then_some(efficiency)
}

/// Derive the run flag and HR efficiency for every workout, runs or not
pub fn analyze(records: Vec<WorkoutRecord>) -> Vec<AnalyzedWorkout> {
    records
        .into_iter()
        .map(|record| {
            let is_run = record.is_run();
            let hr_efficiency =
                hr_efficiency(record.session.avg_pace_min_per_km, record.session.avg_hr);
            AnalyzedWorkout {
                record,
                is_run,
                hr_efficiency,
            }
        })
        .collect()
}

/// Keep running workouts that have a date, sorted oldest first
pub fn filter_runs(workouts: &[AnalyzedWorkout]) -> Vec<Run> {
    let mut runs: Vec<Run> = workouts
        .iter()
        .filter(|w| w.is_run)
        .filter_map(|w| {
            w.record.session.workout_date.map(|date| Run {
                date,
                workout: w.clone(),
            })
        })
        .collect();
    runs.sort_by_key(|run| run.date);
    runs
}

pub fn total_runs(runs: &[Run]) -> usize {
    runs.len()
}

/// Sum of run distances, counting missing distances as zero
pub fn lifetime_distance_km(runs: &[Run]) -> f64 {
    sum_distance(runs.iter())
}

/// Distance per calendar month, only for months that have runs
pub fn monthly_mileage(runs: &[Run]) -> Vec<MonthlyMileage> {
    let mut months: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for run in runs {
        let month = run.date.with_day(1).unwrap_or(run.date);
        *months.entry(month).or_insert(0.0) += run.distance_km().unwrap_or(0.0);
    }

    months
        .into_iter()
        .map(|(month, distance_km)| MonthlyMileage { month, distance_km })
        .collect()
}

/// Monday of the week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Distance run since the Monday of `today`'s week
pub fn weekly_mileage_km(runs: &[Run], today: NaiveDate) -> f64 {
    let start = week_start(today);
    sum_distance(runs.iter().filter(|run| run.date >= start))
}

/// Render a pace as `m:ss /km`
pub fn pace_label(min_per_km: Option<f64>) -> String {
    let Some(pace) = min_per_km.filter(|p| p.is_finite() && *p >= 0.0) else {
        return "N/A".to_string();
    };

    let mut minutes = pace.trunc() as u64;
    let mut seconds = ((pace - pace.trunc()) * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{}:{:02} /km", minutes, seconds)
}

pub(crate) fn sum_distance<'a>(runs: impl Iterator<Item = &'a Run>) -> f64 {
    runs.filter_map(Run::distance_km).sum()
}
