//! Export command implementation for Salesboard CLI.

use std::path::Path;

use salesboard_core::{Dataset, write_csv_file};

use crate::colors;

/// Write the data table to `output` as CSV.
pub fn execute(dataset: &Dataset, output: &Path) -> anyhow::Result<()> {
    write_csv_file(dataset, output)?;
    println!(
        "{}✓{} Exported {} rows to {}",
        colors::GREEN,
        colors::RESET,
        dataset.len(),
        output.display()
    );
    Ok(())
}
