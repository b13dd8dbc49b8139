//! Salesboard: an interactive sales analytics dashboard.
//!
//! This crate turns the filtered order table from [`salesboard_core`] into
//! everything the dashboard displays:
//! - **Widgets**: region and segment multi-selects backed by an explicit context
//! - **KPI cards**: total sales, total profit, orders, unique customers
//! - **Statistic cards**: formula plus computed step line for each statistic
//! - **Figures**: Plotly chart declarations for the visualizations tab
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use salesboard::prelude::*;
//!
//! let dataset = Dataset::load("BA_Dataset.xlsx")?;
//! let selection = FilterSelection::all(&dataset);
//! let dashboard = Dashboard::build(&dataset, &selection, &DashboardConfig::default());
//! println!("{}", dashboard.render_text());
//! # Ok::<(), salesboard_core::Error>(())
//! ```

pub mod charts;
pub mod dashboard;
pub mod format;
pub mod render;
pub mod widgets;

pub use dashboard::{Dashboard, DashboardConfig};

pub mod prelude {
    //! Common imports for building dashboards.
    //!
    //! ```rust,ignore
    //! use salesboard::prelude::*;
    //! ```

    pub use crate::charts::Figure;
    pub use crate::dashboard::{Dashboard, DashboardConfig};
    pub use crate::render::{KpiCards, Render, StatisticCard};
    pub use crate::widgets::{WidgetContext, WidgetDef, WidgetValue};

    pub use salesboard_core::{Dataset, FilterSelection};
}
