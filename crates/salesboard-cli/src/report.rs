//! Report command implementation for Salesboard CLI.
//!
//! Prints the KPI cards and the descriptive statistics of a selection.

use salesboard::format;
use salesboard::prelude::*;

use crate::colors;

/// Print the report for the given regions and segments.
///
/// An empty list selects every value of that column.
pub fn execute(dataset: &Dataset, regions: Vec<String>, segments: Vec<String>) -> anyhow::Result<()> {
    let mut selection = FilterSelection::all(dataset);
    if !regions.is_empty() {
        warn_unknown("region", &regions, &selection.regions);
        selection.regions = regions;
    }
    if !segments.is_empty() {
        warn_unknown("segment", &segments, &selection.segments);
        selection.segments = segments;
    }

    let dashboard = Dashboard::build(dataset, &selection, &DashboardConfig::default());
    let rows = dashboard.summary.row_count;
    let share = if dataset.is_empty() { 0.0 } else { rows as f64 / dataset.len() as f64 };

    println!("\n{}{}{}", colors::BOLD, dashboard.title, colors::RESET);
    println!(
        "{}Regions: {} | Segments: {} | Rows: {} of {} ({}){}",
        colors::DIM,
        dashboard.selection.regions.join(", "),
        dashboard.selection.segments.join(", "),
        format::count(rows),
        format::count(dataset.len()),
        format::percent(share),
        colors::RESET
    );
    println!("{}", colors::rule());
    println!("{}", dashboard.kpis.render_text());
    println!("{}", colors::rule());

    println!("{}Descriptive Statistics{}", colors::BOLD, colors::RESET);
    for card in &dashboard.statistics {
        println!("{}  ◆ {}{}", colors::CYAN, card.name, colors::RESET);
        for line in &card.lines {
            println!("    {}", line);
        }
    }
    println!();

    Ok(())
}

fn warn_unknown(kind: &str, requested: &[String], available: &[String]) {
    for value in requested.iter().filter(|v| !available.contains(*v)) {
        eprintln!(
            "{}warning:{} unknown {} '{}' (available: {})",
            colors::YELLOW,
            colors::RESET,
            kind,
            value,
            available.join(", ")
        );
    }
}
