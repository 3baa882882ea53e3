pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fit;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod storage;

pub use error::{PerfLabError, Result};
