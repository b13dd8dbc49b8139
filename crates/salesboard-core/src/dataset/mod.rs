//! The base order table.
//!
//! A [`Dataset`] is loaded once at startup and is read-only afterwards. Every
//! filtered view borrows from it.

mod loader;
mod record;

pub use loader::{ORDERS_SHEET, RawCell, RawTable};
pub use record::{Dimension, Field, Measure, OrderRecord};

use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::Result;

/// Where a column of the base table gets its values from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSlot {
    /// One of the typed, required columns.
    Required(Field),
    /// A preserved non-required column, indexing into [`OrderRecord::extras`].
    Extra(usize),
}

/// The loaded order table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<OrderRecord>,
    /// Kept columns in source order.
    layout: Vec<ColumnSlot>,
    /// Header text of the preserved non-required columns.
    extra_columns: Vec<String>,
}

impl Dataset {
    /// Load the `Orders` table from a spreadsheet or CSV file.
    ///
    /// The format is chosen by extension. Entirely empty columns are dropped,
    /// then every row with an empty cell is dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = loader::read_raw_table(path)?;
        let dataset = raw.into_dataset()?;
        tracing::info!(
            "Loaded {} orders ({} columns) from {}",
            dataset.len(),
            dataset.layout.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Build a dataset from in-memory records with the canonical column layout.
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        Self {
            records,
            layout: Field::ALL.into_iter().map(ColumnSlot::Required).collect(),
            extra_columns: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        records: Vec<OrderRecord>,
        layout: Vec<ColumnSlot>,
        extra_columns: Vec<String>,
    ) -> Self {
        Self {
            records,
            layout,
            extra_columns,
        }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn layout(&self) -> &[ColumnSlot] {
        &self.layout
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Header row of the table, in column order.
    pub fn columns(&self) -> Vec<String> {
        self.layout
            .iter()
            .map(|slot| match slot {
                ColumnSlot::Required(field) => field.header().to_string(),
                ColumnSlot::Extra(idx) => self.extra_columns[*idx].clone(),
            })
            .collect()
    }

    /// Textual cell value for a record and column slot.
    pub fn cell_text(&self, record: &OrderRecord, slot: &ColumnSlot) -> String {
        match slot {
            ColumnSlot::Required(field) => field.display_value(record),
            ColumnSlot::Extra(idx) => record.extras.get(*idx).cloned().unwrap_or_default(),
        }
    }

    /// Distinct values of a dimension in order of first appearance.
    pub fn distinct(&self, dimension: Dimension) -> Vec<String> {
        distinct_in_order(self.records.iter(), dimension)
    }

    pub fn distinct_regions(&self) -> Vec<String> {
        self.distinct(Dimension::Region)
    }

    pub fn distinct_segments(&self) -> Vec<String> {
        self.distinct(Dimension::Segment)
    }
}

/// Distinct values of `dimension` over `records`, first appearance first.
pub(crate) fn distinct_in_order<'a>(
    records: impl IntoIterator<Item = &'a OrderRecord>,
    dimension: Dimension,
) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for record in records {
        let value = dimension.value(record);
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}
