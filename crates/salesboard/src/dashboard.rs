//! One complete dashboard snapshot.
//!
//! [`Dashboard::build`] runs the whole pipeline (filter, aggregate, format,
//! chart) for a selection. It is cheap enough to call on every widget change.

use serde::{Deserialize, Serialize};

use salesboard_core::{AggregateResult, Dataset, FilterSelection, apply, summarize};

use crate::charts::{self, Figure};
use crate::render::{KpiCards, Render, StatisticCard, html_escape, statistic_cards};
use crate::widgets::{REGION_WIDGET, SEGMENT_WIDGET, WidgetContext, WidgetDef, WidgetValue};

/// Default annual sales target shown on the gauge.
pub const DEFAULT_SALES_TARGET: f64 = 3_000_000.0;

/// Dashboard title.
pub const DASHBOARD_TITLE: &str = "Sales Analytics Dashboard - Sales Company";

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Reference value of the sales gauge.
    pub sales_target: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sales_target: DEFAULT_SALES_TARGET,
        }
    }
}

/// Everything the UI shows for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    /// Sidebar filters with their current selection.
    pub widgets: Vec<WidgetDef>,
    pub selection: FilterSelection,
    pub summary: AggregateResult,
    pub kpis: KpiCards,
    /// Cards of the descriptive statistics tab.
    pub statistics: Vec<StatisticCard>,
    /// Charts of the visualizations tab, in display order.
    pub figures: Vec<Figure>,
}

impl Dashboard {
    /// Build the dashboard for `selection`.
    pub fn build(dataset: &Dataset, selection: &FilterSelection, config: &DashboardConfig) -> Self {
        let mut ctx = WidgetContext::new();
        ctx.set(REGION_WIDGET, WidgetValue::Selection(selection.regions.clone()));
        ctx.set(SEGMENT_WIDGET, WidgetValue::Selection(selection.segments.clone()));
        Self::from_context(dataset, &mut ctx, config)
    }

    /// Build the dashboard from the widget values stored in `ctx`.
    ///
    /// Widgets without a stored value select every option.
    pub fn from_context(dataset: &Dataset, ctx: &mut WidgetContext, config: &DashboardConfig) -> Self {
        let selection = ctx.filter_selection(dataset);
        let widgets = ctx.take_widgets();

        let view = apply(dataset, &selection);
        let summary = summarize(&view);

        let figures = vec![
            charts::sales_by_region(&view),
            charts::profit_by_category(&view),
            charts::segment_distribution(&view),
            charts::sales_by_category(&view),
            charts::monthly_sales_trend(&view),
            charts::correlation_heatmap(&view),
            charts::sales_vs_profit(&view),
            charts::sales_treemap(&view),
            charts::sales_sunburst(&view),
            charts::sales_funnel(&view),
            charts::cumulative_sales(&view),
            charts::target_gauge(summary.total_sales, config.sales_target),
            charts::segment_category_sankey(&view),
        ];

        tracing::debug!(
            "Built dashboard: {} rows, {} figures",
            summary.row_count,
            figures.len()
        );

        Self {
            title: DASHBOARD_TITLE,
            widgets,
            kpis: KpiCards::from_summary(&summary),
            statistics: statistic_cards(summary.sales.as_ref()),
            selection,
            summary,
            figures,
        }
    }

    /// Look up a figure by its identifier.
    pub fn figure(&self, id: &str) -> Option<&Figure> {
        self.figures.iter().find(|f| f.id == id)
    }
}

impl Render for Dashboard {
    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.kpis.render_text());
        out.push_str("\n\nDescriptive Statistics\n");
        for card in &self.statistics {
            out.push_str(&card.render_text());
            out.push('\n');
        }
        out
    }

    fn render_html(&self) -> Option<String> {
        let mut html = format!("<h1>{}</h1>", html_escape(self.title));
        html.push_str(&self.kpis.render_html()?);
        for card in &self.statistics {
            html.push_str(&card.render_html()?);
        }
        Some(html)
    }

    fn render_data(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}
