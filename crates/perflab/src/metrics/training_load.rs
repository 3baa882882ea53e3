//! Acute:chronic training-load ratio (distance based)
//!
//! ratio = load over the last 7 days / (load over the last 28 days / 4)
//!
//! Both windows end at the latest run date in the data, not at today, so the
//! ratio does not drift when metrics are computed on stale data.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::{sum_distance, Run};

/// Acute window length in days
pub const ACUTE_WINDOW_DAYS: i64 = 7;

/// Chronic window length in days
pub const CHRONIC_WINDOW_DAYS: i64 = 28;

/// Training-load breakdown behind the ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingLoad {
    /// Latest run date; both windows end here
    pub latest_date: Option<NaiveDate>,
    /// Distance in the 7 days up to and including the latest date
    pub acute_km: f64,
    /// Distance in the 28 days up to and including the latest date
    pub chronic_km: f64,
    /// Chronic distance as a weekly average
    pub chronic_weekly_avg_km: f64,
    /// Acute ÷ chronic weekly average, 0 when undefined
    pub ratio: f64,
}

impl TrainingLoad {
    fn empty() -> Self {
        Self {
            latest_date: None,
            acute_km: 0.0,
            chronic_km: 0.0,
            chronic_weekly_avg_km: 0.0,
            ratio: 0.0,
        }
    }
}

/// Compute acute and chronic loads and their ratio
pub fn training_load(runs: &[Run]) -> TrainingLoad {
    let Some(latest) = runs.iter().map(|run| run.date).max() else {
        return TrainingLoad::empty();
    };

    let acute_km = load_since(runs, latest - Duration::days(ACUTE_WINDOW_DAYS));
    let chronic_km = load_since(runs, latest - Duration::days(CHRONIC_WINDOW_DAYS));
    let chronic_weekly_avg_km = chronic_km / (CHRONIC_WINDOW_DAYS / ACUTE_WINDOW_DAYS) as f64;

    // Sparse or zero chronic load would make the ratio meaningless
    let ratio = if chronic_km <= 0.0 || chronic_weekly_avg_km <= 0.0 {
        0.0
    } else {
        acute_km / chronic_weekly_avg_km
    };

    TrainingLoad {
        latest_date: Some(latest),
        acute_km,
        chronic_km,
        chronic_weekly_avg_km,
        ratio,
    }
}

/// Acute:chronic ratio; 0 for no runs or no chronic load
pub fn training_load_ratio(runs: &[Run]) -> f64 {
    training_load(runs).ratio
}

/// Distance of runs strictly after `start`
fn load_since(runs: &[Run], start: NaiveDate) -> f64 {
    sum_distance(runs.iter().filter(|run| run.date > start))
}
