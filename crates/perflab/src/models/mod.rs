//! Data models for ingested workouts

pub mod workout;

pub use workout::{NormalizedSession, WorkoutRecord};
