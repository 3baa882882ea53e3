//! Session normalization
//!
//! Converts a [`RawSession`] into a [`NormalizedSession`]. Devices and
//! firmware versions disagree on field names, so each metric is looked up
//! through an ordered list of candidate keys. Normalization never fails:
//! a field that is missing or not numeric becomes `None`.

use super::extract::RawSession;
use crate::models::NormalizedSession;

/// Candidate FIT field names per metric, in priority order
#[derive(Debug, Clone, Copy)]
pub struct FieldKeys {
    pub date: &'static [&'static str],
    pub distance: &'static [&'static str],
    pub duration: &'static [&'static str],
    pub avg_hr: &'static [&'static str],
    pub max_hr: &'static [&'static str],
    pub cadence: &'static [&'static str],
    pub calories: &'static [&'static str],
    pub temperature: &'static [&'static str],
    pub sport: &'static [&'static str],
    pub sub_sport: &'static [&'static str],
}

impl FieldKeys {
    /// Field names used by Garmin session messages
    pub const GARMIN: FieldKeys = FieldKeys {
        date: &["start_time", "timestamp"],
        distance: &["total_distance"],
        // Timer time excludes pauses, so it wins over elapsed time
        duration: &["total_timer_time", "total_elapsed_time"],
        avg_hr: &["avg_heart_rate"],
        max_hr: &["max_heart_rate"],
        cadence: &["avg_running_cadence", "avg_cadence"],
        calories: &["total_calories"],
        temperature: &["avg_temperature"],
        sport: &["sport"],
        sub_sport: &["sub_sport"],
    };
}

/// Normalize a raw session using the Garmin field names
pub fn normalize_session(raw: &RawSession) -> NormalizedSession {
    normalize_with_keys(raw, &FieldKeys::GARMIN)
}

pub(crate) fn normalize_with_keys(raw: &RawSession, keys: &FieldKeys) -> NormalizedSession {
    let number = |candidates: &[&str]| raw.first_present(candidates).and_then(|v| v.as_f64());
    let label = |candidates: &[&str]| raw.first_present(candidates).and_then(|v| v.to_label());

    let workout_date = raw
        .first_present(keys.date)
        .and_then(|v| v.as_timestamp())
        .map(|ts| ts.date());

    let distance_km = number(keys.distance).map(|meters| meters / 1000.0);
    let duration_min = number(keys.duration).map(|secs| secs / 60.0);

    NormalizedSession {
        workout_date,
        sport: label(keys.sport),
        sub_sport: label(keys.sub_sport),
        distance_km,
        duration_min,
        avg_hr: number(keys.avg_hr),
        max_hr: number(keys.max_hr),
        avg_cadence: number(keys.cadence),
        avg_pace_min_per_km: pace_min_per_km(distance_km, duration_min),
        calories: number(keys.calories),
        avg_temperature: number(keys.temperature),
    }
}

/// Minutes per kilometer; `None` unless both inputs are non-zero and distance is positive
pub fn pace_min_per_km(distance_km: Option<f64>, duration_min: Option<f64>) -> Option<f64> {
    match (distance_km, duration_min) {
        (Some(distance), Some(duration)) if distance > 0.0 && duration != 0.0 => {
            Some(duration / distance)
        }
        _ => None,
    }
}
