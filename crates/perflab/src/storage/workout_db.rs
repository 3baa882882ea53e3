//! SQLite-backed workout store
//!
//! One row per source FIT file, upserted on `source_file`. Rows are only
//! ever inserted or updated; nothing here deletes.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, Row};

use crate::error::{PerfLabError, Result};
use crate::models::{NormalizedSession, WorkoutRecord};

const UPSERT_SQL: &str = r#"
    INSERT INTO workouts (
        source_file, source_mtime, workout_date, sport, sub_sport,
        distance_km, duration_min, avg_hr, max_hr, avg_cadence,
        avg_pace_min_per_km, calories, avg_temperature
    )
    VALUES (
        :source_file, :source_mtime, :workout_date, :sport, :sub_sport,
        :distance_km, :duration_min, :avg_hr, :max_hr, :avg_cadence,
        :avg_pace_min_per_km, :calories, :avg_temperature
    )
    ON CONFLICT (source_file) DO UPDATE SET
        source_mtime = excluded.source_mtime,
        workout_date = excluded.workout_date,
        sport = excluded.sport,
        sub_sport = excluded.sub_sport,
        distance_km = excluded.distance_km,
        duration_min = excluded.duration_min,
        avg_hr = excluded.avg_hr,
        max_hr = excluded.max_hr,
        avg_cadence = excluded.avg_cadence,
        avg_pace_min_per_km = excluded.avg_pace_min_per_km,
        calories = excluded.calories,
        avg_temperature = excluded.avg_temperature
"#;

/// SQLite database of ingested workouts
pub struct WorkoutDb {
    conn: Connection,
}

impl WorkoutDb {
    /// Open or create the workout database
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PerfLabError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| PerfLabError::Database(format!("Failed to open workout database: {}", e)))?;

        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PerfLabError::Database(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Run migrations
    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS workouts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    source_file TEXT UNIQUE NOT NULL,
                    source_mtime REAL NOT NULL,
                    workout_date TEXT,
                    sport TEXT,
                    sub_sport TEXT,
                    distance_km REAL,
                    duration_min REAL,
                    avg_hr REAL,
                    max_hr REAL,
                    avg_cadence REAL,
                    avg_pace_min_per_km REAL,
                    calories REAL,
                    avg_temperature REAL
                );
                "#,
            )
            .map_err(|e| PerfLabError::Database(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Insert or update every record in a single transaction.
    ///
    /// Returns the number of rows written. Either the whole batch commits or
    /// none of it does.
    pub fn upsert(&mut self, records: &[WorkoutRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self
            .conn
            .transaction()
            .map_err(|e| PerfLabError::Database(format!("Failed to begin transaction: {}", e)))?;

        {
            let mut stmt = tx
                .prepare(UPSERT_SQL)
                .map_err(|e| PerfLabError::Database(format!("Failed to prepare upsert: {}", e)))?;

            for record in records {
                let s = &record.session;
                let workout_date = s.workout_date.map(|d| d.format("%Y-%m-%d").to_string());

                stmt.execute(named_params! {
                    ":source_file": record.source_file,
                    ":source_mtime": record.source_mtime,
                    ":workout_date": workout_date,
                    ":sport": s.sport,
                    ":sub_sport": s.sub_sport,
                    ":distance_km": s.distance_km,
                    ":duration_min": s.duration_min,
                    ":avg_hr": s.avg_hr,
                    ":max_hr": s.max_hr,
                    ":avg_cadence": s.avg_cadence,
                    ":avg_pace_min_per_km": s.avg_pace_min_per_km,
                    ":calories": s.calories,
                    ":avg_temperature": s.avg_temperature,
                })
                .map_err(|e| {
                    PerfLabError::Database(format!(
                        "Failed to upsert workout {}: {}",
                        record.source_file, e
                    ))
                })?;
            }
        }

        tx.commit()
            .map_err(|e| PerfLabError::Database(format!("Failed to commit upsert: {}", e)))?;

        Ok(records.len())
    }

    /// Load every stored workout, ordered by workout date (nulls first)
    pub fn load_all(&self) -> Result<Vec<WorkoutRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT source_file, source_mtime, workout_date, sport, sub_sport,
                        distance_km, duration_min, avg_hr, max_hr, avg_cadence,
                        avg_pace_min_per_km, calories, avg_temperature
                 FROM workouts
                 ORDER BY workout_date, id",
            )
            .map_err(|e| PerfLabError::Database(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], row_to_record)
            .map_err(|e| PerfLabError::Database(format!("Failed to query workouts: {}", e)))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| PerfLabError::Database(e.to_string()))?);
        }
        Ok(records)
    }

    /// Count stored workouts
    pub fn count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| PerfLabError::Database(format!("Failed to count workouts: {}", e)))
    }

    /// Close the connection, surfacing any error from SQLite
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| PerfLabError::Database(format!("Failed to close database: {}", e)))
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<WorkoutRecord> {
    Ok(WorkoutRecord {
        source_file: row.get(0)?,
        source_mtime: row.get(1)?,
        session: NormalizedSession {
            workout_date: row
                .get::<_, Option<String>>(2)?
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            sport: row.get(3)?,
            sub_sport: row.get(4)?,
            distance_km: row.get(5)?,
            duration_min: row.get(6)?,
            avg_hr: row.get(7)?,
            max_hr: row.get(8)?,
            avg_cadence: row.get(9)?,
            avg_pace_min_per_km: row.get(10)?,
            calories: row.get(11)?,
            avg_temperature: row.get(12)?,
        },
    })
}
