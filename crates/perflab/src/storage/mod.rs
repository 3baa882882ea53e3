//! Storage layer for ingested workouts
//!
//! A single SQLite file holds the `workouts` table. Connections are opened
//! per operation and closed when the operation ends; nothing keeps a
//! connection across unrelated work.
//!
//! ## Schema
//!
//! ```text
//! workouts
//! ├── id                  INTEGER PRIMARY KEY
//! ├── source_file         TEXT UNIQUE NOT NULL   # upsert key
//! ├── source_mtime        REAL NOT NULL
//! ├── workout_date        TEXT (YYYY-MM-DD)
//! ├── sport, sub_sport    TEXT
//! └── distance_km, duration_min, avg_hr, max_hr, avg_cadence,
//!     avg_pace_min_per_km, calories, avg_temperature   REAL
//! ```

mod workout_db;

pub use workout_db::WorkoutDb;

use std::path::Path;

use crate::error::Result;
use crate::models::WorkoutRecord;

/// Open the store, upsert `records`, and close it again
pub fn upsert_workouts(db_path: &Path, records: &[WorkoutRecord]) -> Result<usize> {
    let mut db = WorkoutDb::open(db_path)?;
    let count = db.upsert(records)?;
    db.close()?;
    Ok(count)
}

/// Open the store, read every workout, and close it again
pub fn load_workouts(db_path: &Path) -> Result<Vec<WorkoutRecord>> {
    let db = WorkoutDb::open(db_path)?;
    let records = db.load_all()?;
    db.close()?;
    Ok(records)
}
