pub mod export;
pub mod refresh;
pub mod runs;
pub mod stats;

pub use export::run as export_dashboard;
pub use refresh::run as refresh;
pub use runs::list as list_runs;
pub use stats::show as show_stats;
