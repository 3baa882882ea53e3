//! Workout data models
//!
//! A [`NormalizedSession`] is what the normalizer produces from one FIT
//! session message. A [`WorkoutRecord`] is that session plus the identity of
//! the file it came from, and is the row stored in the `workouts` table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical summary of one FIT session, without file identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSession {
    /// Calendar date of the workout start
    pub workout_date: Option<NaiveDate>,

    /// Sport label (e.g. "running", "cycling")
    pub sport: Option<String>,

    /// Sub-sport label (e.g. "trail", "treadmill")
    pub sub_sport: Option<String>,

    /// Distance in kilometers
    pub distance_km: Option<f64>,

    /// Duration in minutes
    pub duration_min: Option<f64>,

    /// Average heart rate in bpm
    pub avg_hr: Option<f64>,

    /// Maximum heart rate in bpm
    pub max_hr: Option<f64>,

    /// Average cadence (steps or revolutions per minute)
    pub avg_cadence: Option<f64>,

    /// Average pace in minutes per kilometer
    pub avg_pace_min_per_km: Option<f64>,

    /// Calories burned
    pub calories: Option<f64>,

    /// Average temperature in degrees Celsius
    pub avg_temperature: Option<f64>,
}

/// One stored workout, keyed by its absolute source path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Absolute path of the FIT file (unique key)
    pub source_file: String,

    /// File modification time in seconds since the UNIX epoch
    pub source_mtime: f64,

    #[serde(flatten)]
    pub session: NormalizedSession,
}

impl WorkoutRecord {
    pub fn new(source_file: impl Into<String>, source_mtime: f64, session: NormalizedSession) -> Self {
        Self {
            source_file: source_file.into(),
            source_mtime,
            session,
        }
    }

    /// Whether the sport label is running (case-insensitive)
    pub fn is_run(&self) -> bool {
        self.session
            .sport
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(crate::metrics::RUN_SPORT))
    }

    /// Get duration formatted as H:MM:SS or M:SS
    pub fn duration_formatted(&self) -> String {
        match self.session.duration_min {
            Some(minutes) if minutes.is_finite() && minutes >= 0.0 => {
                let total_secs = (minutes * 60.0).round() as u64;
                let hours = total_secs / 3600;
                let mins = (total_secs % 3600) / 60;
                let secs = total_secs % 60;
                if hours > 0 {
                    format!("{}:{:02}:{:02}", hours, mins, secs)
                } else {
                    format!("{}:{:02}", mins, secs)
                }
            }
            _ => "-".to_string(),
        }
    }

    /// Get the workout date as YYYY-MM-DD, or "-" when unknown
    pub fn date_label(&self) -> String {
        self.session
            .workout_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
