use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use perflab::cli::{commands, OutputFormat};
use perflab::config::LabConfig;
use perflab::export::DEFAULT_OUTPUT;
use perflab::logging;

#[derive(Parser)]
#[command(name = "perflab")]
#[command(author, version, about = "Local running analytics from Garmin FIT files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// SQLite database path
    #[arg(long, global = true, env = "PERFLAB_DB")]
    db: Option<PathBuf>,

    /// Ingestion error log path
    #[arg(long, global = true, env = "PERFLAB_ERROR_LOG")]
    error_log: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-read all FIT files and update the database
    Refresh {
        /// GARMIN export root (contains Activity/)
        #[arg(short, long, env = "GARMIN_PATH")]
        garmin_path: Option<PathBuf>,
    },
    /// Write the dashboard JSON payload
    Export {
        /// GARMIN export root (contains Activity/)
        #[arg(short, long, env = "GARMIN_PATH")]
        garmin_path: Option<PathBuf>,
        /// Export from the existing database without refreshing
        #[arg(long)]
        skip_refresh: bool,
        /// Output file path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Show running KPIs
    Stats {
        /// GARMIN export root, used when the database does not exist yet
        #[arg(short, long, env = "GARMIN_PATH")]
        garmin_path: Option<PathBuf>,
    },
    /// List recent runs
    Runs {
        /// Number of runs to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = LabConfig::resolve(cli.db, cli.error_log).and_then(|config| match cli.command {
        Commands::Refresh { garmin_path } => commands::refresh(garmin_path, &config),
        Commands::Export {
            garmin_path,
            skip_refresh,
            output,
        } => commands::export_dashboard(garmin_path, skip_refresh, &output, &config),
        Commands::Stats { garmin_path } => commands::show_stats(garmin_path, &config, cli.format),
        Commands::Runs { limit } => commands::list_runs(limit, &config, cli.format),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", perflab::error::format_user_error(&e));
        std::process::exit(1);
    }
}
