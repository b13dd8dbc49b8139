//! Region/segment filtering.
//!
//! The selection is an explicit value owned by whoever drives the UI; [`apply`]
//! is a pure function of the dataset and that value.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Dimension, OrderRecord, distinct_in_order};

/// The currently selected regions and segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub regions: Vec<String>,
    pub segments: Vec<String>,
}

impl FilterSelection {
    pub fn new(regions: Vec<String>, segments: Vec<String>) -> Self {
        Self { regions, segments }
    }

    /// Select every region and segment present in the dataset.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            regions: dataset.distinct_regions(),
            segments: dataset.distinct_segments(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_segments(mut self, segments: Vec<String>) -> Self {
        self.segments = segments;
        self
    }

    /// Whether both sets cover every distinct value of the dataset.
    pub fn is_full(&self, dataset: &Dataset) -> bool {
        let covers = |selected: &[String], available: Vec<String>| {
            available.iter().all(|value| selected.contains(value))
        };
        covers(&self.regions, dataset.distinct_regions())
            && covers(&self.segments, dataset.distinct_segments())
    }
}

/// Rows of the base table matching a selection, in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a OrderRecord>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row of the dataset.
    pub fn full(dataset: &'a Dataset) -> Self {
        Self {
            rows: dataset.records().iter().collect(),
        }
    }

    pub fn from_rows(rows: Vec<&'a OrderRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a OrderRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct values of a dimension, first appearance first.
    pub fn distinct(&self, dimension: Dimension) -> Vec<String> {
        distinct_in_order(self.iter(), dimension)
    }

    /// Sales values of every row, in view order.
    pub fn sales(&self) -> Vec<f64> {
        self.iter().map(|r| r.sales).collect()
    }
}

/// Keep exactly the rows whose region and segment are both selected.
///
/// An empty region or segment set yields an empty view.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let regions: FxHashSet<&str> = selection.regions.iter().map(String::as_str).collect();
    let segments: FxHashSet<&str> = selection.segments.iter().map(String::as_str).collect();

    let rows: Vec<&OrderRecord> = dataset
        .records()
        .iter()
        .filter(|r| regions.contains(r.region.as_str()) && segments.contains(r.segment.as_str()))
        .collect();

    tracing::debug!(
        "Filter kept {} of {} rows ({} regions, {} segments)",
        rows.len(),
        dataset.len(),
        regions.len(),
        segments.len()
    );

    FilteredView { rows }
}
