//! Salesboard CLI - Interactive sales analytics dashboard.

mod colors;
mod export;
mod report;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use salesboard::dashboard::DEFAULT_SALES_TARGET;
use salesboard_core::paths::BASE_PATH_ENV;
use salesboard_core::{DataPaths, Dataset, EXPORT_FILE_NAME};

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(about = "Interactive sales analytics dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data file (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv); defaults to BA_Dataset.xlsx in the base path
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Directory the default data file is looked up in
    #[arg(long, global = true, env = BASE_PATH_ENV)]
    base_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive dashboard server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Sales target shown on the gauge
        #[arg(long, default_value_t = DEFAULT_SALES_TARGET)]
        target: f64,
    },

    /// Print KPI cards and descriptive statistics for a selection
    Report {
        /// Region to include (repeatable; default: all)
        #[arg(long)]
        region: Vec<String>,

        /// Segment to include (repeatable; default: all)
        #[arg(long)]
        segment: Vec<String>,
    },

    /// Write the data table as CSV
    Export {
        /// Output path for the CSV file
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format salesboard-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<salesboard_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let paths = DataPaths::resolve(cli.data.as_deref(), cli.base_path.as_deref());
    let dataset = load_dataset(&paths).map_err(format_error)?;

    match cli.command {
        Commands::Serve { port, host, target } => {
            serve::execute(dataset, &paths, host, port, target)
                .await
                .map_err(format_error)?;
        }

        Commands::Report { region, segment } => {
            report::execute(&dataset, region, segment).map_err(format_error)?;
        }

        Commands::Export { output } => {
            export::execute(&dataset, &output).map_err(format_error)?;
        }
    }

    Ok(())
}

fn load_dataset(paths: &DataPaths) -> anyhow::Result<Dataset> {
    tracing::debug!("Loading data from {}", paths.data_file.display());
    Ok(Dataset::load(&paths.data_file)?)
}
