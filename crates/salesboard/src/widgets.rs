//! Sidebar filter widgets.
//!
//! Widgets are declared while a dashboard is built and read their current
//! value from an explicit [`WidgetContext`]. The context is owned by whoever
//! drives the UI (one per browser connection, or one per CLI invocation), so
//! nothing here relies on ambient state.
//!
//! # Example
//!
//! ```rust
//! use salesboard::widgets::{REGION_WIDGET, WidgetContext, WidgetValue};
//!
//! let mut ctx = WidgetContext::new();
//! ctx.set(REGION_WIDGET, WidgetValue::Selection(vec!["West".into()]));
//!
//! let options = vec!["East".to_string(), "West".to_string()];
//! let regions = ctx.multiselect(REGION_WIDGET, "Select Region", &options);
//! assert_eq!(regions, vec!["West"]);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use salesboard_core::{Dataset, FilterSelection};

/// Widget ID of the region filter.
pub const REGION_WIDGET: &str = "region";
/// Widget ID of the segment filter.
pub const SEGMENT_WIDGET: &str = "segment";

/// Widget definition sent to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetDef {
    /// Multi-choice select; every option is selected by default.
    MultiSelect {
        /// Unique widget ID.
        id: String,
        /// Human-readable label.
        label: String,
        /// Available options, in first-appearance order.
        options: Vec<String>,
        /// Currently selected options.
        selected: Vec<String>,
    },
}

impl WidgetDef {
    /// Get the widget ID.
    pub fn id(&self) -> &str {
        match self {
            WidgetDef::MultiSelect { id, .. } => id,
        }
    }
}

/// Widget value that can be stored in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetValue {
    /// Chosen options (for multi-selects).
    Selection(Vec<String>),
}

impl WidgetValue {
    /// Get the chosen options if this is a selection.
    pub fn as_selection(&self) -> Option<&[String]> {
        match self {
            WidgetValue::Selection(values) => Some(values.as_slice()),
        }
    }
}

/// Widget registry and user-set values for one dashboard session.
#[derive(Debug, Clone, Default)]
pub struct WidgetContext {
    /// Widgets registered by the most recent build.
    pub widgets: Vec<WidgetDef>,
    /// Current widget values (set by user interaction).
    pub values: FxHashMap<String, WidgetValue>,
}

impl WidgetContext {
    /// Create a new empty widget context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value set by the user.
    pub fn set(&mut self, id: impl Into<String>, value: WidgetValue) {
        self.values.insert(id.into(), value);
    }

    /// Forget every user-set value so widgets fall back to their defaults.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Take the registered widgets, leaving the registry empty.
    pub fn take_widgets(&mut self) -> Vec<WidgetDef> {
        std::mem::take(&mut self.widgets)
    }

    /// Register a multi-select and return its current selection.
    ///
    /// Without a stored value every option is selected. Stored values that
    /// are not among `options` are ignored, as are duplicates.
    pub fn multiselect(&mut self, id: &str, label: &str, options: &[String]) -> Vec<String> {
        let selected = match self.values.get(id).and_then(|v| v.as_selection()) {
            Some(stored) => {
                let mut selected: Vec<String> = Vec::with_capacity(stored.len());
                for value in stored {
                    if options.contains(value) && !selected.contains(value) {
                        selected.push(value.clone());
                    }
                }
                selected
            }
            None => options.to_vec(),
        };

        self.widgets.push(WidgetDef::MultiSelect {
            id: id.to_string(),
            label: label.to_string(),
            options: options.to_vec(),
            selected: selected.clone(),
        });

        selected
    }

    /// Register the region and segment filters and return the resulting
    /// selection.
    pub fn filter_selection(&mut self, dataset: &Dataset) -> FilterSelection {
        let regions = self.multiselect(REGION_WIDGET, "Select Region", &dataset.distinct_regions());
        let segments =
            self.multiselect(SEGMENT_WIDGET, "Select Segment", &dataset.distinct_segments());
        FilterSelection::new(regions, segments)
    }
}
