//! Serve command implementation for Salesboard CLI.
//!
//! Starts the dashboard server for the loaded data.

use std::sync::Arc;

use salesboard::DashboardConfig;
use salesboard_core::{DataPaths, Dataset};
use salesboard_server::ServerConfig;

use crate::colors;

/// Start the interactive dashboard server.
pub async fn execute(
    dataset: Dataset,
    paths: &DataPaths,
    host: String,
    port: u16,
    target: f64,
) -> anyhow::Result<()> {
    if !target.is_finite() || target <= 0.0 {
        anyhow::bail!("Sales target must be a positive number, got {}", target);
    }

    println!(
        "\n{}Salesboard{} - Sales Analytics Dashboard",
        colors::BOLD,
        colors::RESET
    );
    println!("{}", colors::rule());

    println!(
        "{}  ◆ Data:{} {} ({} rows)",
        colors::CYAN,
        colors::RESET,
        paths.data_file.display(),
        dataset.len()
    );

    let config = ServerConfig { host, port };

    println!(
        "{}  ◆ Server:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!(
        "{}  ◆ WebSocket:{} ws://{}:{}/ws",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!("{}", colors::rule());
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    let dashboard = DashboardConfig {
        sales_target: target,
    };
    salesboard_server::serve(Arc::new(dataset), config, dashboard).await?;

    Ok(())
}
