//! Core engine for the Salesboard dashboard.
//!
//! This crate provides:
//! - Dataset loading from spreadsheets and CSV
//! - Region/segment filtering as a pure function of an explicit selection
//! - KPI and descriptive-statistics aggregation
//! - Chart groupings (totals, monthly buckets, correlations, hierarchies, flows)
//! - CSV export of the base table

pub mod aggregate;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod paths;
pub mod stats;

pub use aggregate::{AggregateResult, summarize};
pub use dataset::{Dataset, Dimension, Field, Measure, OrderRecord};
pub use error::{Error, Result};
pub use export::{EXPORT_FILE_NAME, to_csv_bytes, write_csv, write_csv_file};
pub use filter::{FilterSelection, FilteredView, apply};
pub use paths::DataPaths;
pub use stats::SalesStatistics;
