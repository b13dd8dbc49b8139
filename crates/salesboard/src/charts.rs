//! Chart declarations.
//!
//! Each function turns a [`FilteredView`] into a [`Figure`]: a Plotly figure
//! (`data` traces plus `layout`) that the frontend hands to `Plotly.react`
//! unchanged. The groupings themselves live in
//! [`salesboard_core::aggregate`]; this module only decides how they are drawn.

use serde::Serialize;
use serde_json::{Value, json};

use salesboard_core::aggregate::{
    correlation_matrix, cumulative_by_date, flows, hierarchy, monthly_totals, sum_by, value_counts,
};
use salesboard_core::{Dimension, FilteredView, Measure};

/// Bar color of the sales-by-region chart.
const REGION_BAR_COLOR: &str = "#4e79a7";
/// Bar color of the profit-by-category chart.
const CATEGORY_BAR_COLOR: &str = "#59a14f";
/// Largest scatter marker diameter, in pixels.
const SCATTER_SIZE_MAX: f64 = 20.0;
/// The gauge axis extends this far past the target.
const GAUGE_HEADROOM: f64 = 1.2;

/// A Plotly figure with a stable identifier for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// DOM-friendly identifier, e.g. `sales_by_region`.
    pub id: &'static str,
    /// Section heading shown above the chart.
    pub title: String,
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    fn new(id: &'static str, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            layout: json!({
                "title": { "text": title },
                "template": "plotly_dark",
                "paper_bgcolor": "rgba(0,0,0,0)",
                "plot_bgcolor": "rgba(0,0,0,0)",
                "margin": { "t": 48, "l": 48, "r": 24, "b": 48 },
            }),
            title,
            data: Vec::new(),
        }
    }

    fn trace(mut self, trace: Value) -> Self {
        self.data.push(trace);
        self
    }

    /// Merge top-level keys into the layout.
    fn layout(mut self, extra: Value) -> Self {
        if let (Value::Object(layout), Value::Object(extra)) = (&mut self.layout, extra) {
            layout.extend(extra);
        }
        self
    }

    /// Number of traces.
    pub fn trace_count(&self) -> usize {
        self.data.len()
    }
}

fn iso(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn grouped_bar(
    view: &FilteredView<'_>,
    id: &'static str,
    title: &str,
    dimension: Dimension,
    measure: Measure,
    color: &str,
) -> Figure {
    let totals = sum_by(view, dimension, measure);
    let (keys, values): (Vec<_>, Vec<_>) = totals.into_iter().map(|g| (g.key, g.value)).unzip();
    Figure::new(id, title)
        .trace(json!({
            "type": "bar",
            "x": keys,
            "y": values,
            "name": measure.label(),
            "marker": { "color": color },
        }))
        .layout(json!({
            "xaxis": { "title": { "text": dimension.label() } },
            "yaxis": { "title": { "text": measure.label() } },
        }))
}

/// Total sales per region.
pub fn sales_by_region(view: &FilteredView<'_>) -> Figure {
    grouped_bar(
        view,
        "sales_by_region",
        "Sales by Region",
        Dimension::Region,
        Measure::Sales,
        REGION_BAR_COLOR,
    )
}

/// Total profit per category.
pub fn profit_by_category(view: &FilteredView<'_>) -> Figure {
    grouped_bar(
        view,
        "profit_by_category",
        "Profit by Category",
        Dimension::Category,
        Measure::Profit,
        CATEGORY_BAR_COLOR,
    )
}

fn pie(id: &'static str, title: &str, labels: Vec<String>, values: Vec<f64>) -> Figure {
    Figure::new(id, title).trace(json!({
        "type": "pie",
        "labels": labels,
        "values": values,
        "texttemplate": "%{label}<br>%{percent:.1%}",
        "sort": false,
        "rotation": 140,
    }))
}

/// Row share per segment.
pub fn segment_distribution(view: &FilteredView<'_>) -> Figure {
    let counts = value_counts(view, Dimension::Segment);
    let (labels, values) = counts
        .into_iter()
        .map(|c| (c.key, c.count as f64))
        .unzip();
    pie("segment_distribution", "Segment Distribution", labels, values)
}

/// Sales share per category.
pub fn sales_by_category(view: &FilteredView<'_>) -> Figure {
    let (labels, values) = sum_by(view, Dimension::Category, Measure::Sales)
        .into_iter()
        .map(|g| (g.key, g.value))
        .unzip();
    pie("sales_by_category", "Sales by Category", labels, values)
}

/// Calendar-month sales with empty months shown as zero.
pub fn monthly_sales_trend(view: &FilteredView<'_>) -> Figure {
    let (x, y): (Vec<_>, Vec<_>) = monthly_totals(view, Measure::Sales)
        .into_iter()
        .map(|m| (iso(m.month_end), m.value))
        .unzip();
    Figure::new("monthly_sales_trend", "Monthly Sales Trend")
        .trace(json!({
            "type": "scatter",
            "mode": "lines+markers",
            "x": x,
            "y": y,
            "name": "Sales",
            "line": { "color": "blue" },
        }))
        .layout(json!({ "xaxis": { "type": "date" } }))
}

/// Pairwise Pearson correlation of sales, profit, quantity and discount.
///
/// Undefined cells are `null` and drawn blank.
pub fn correlation_heatmap(view: &FilteredView<'_>) -> Figure {
    let matrix = correlation_matrix(view, &Measure::ALL);
    let labels: Vec<&str> = matrix.measures.iter().map(|m| m.label()).collect();
    let text: Vec<Vec<String>> = matrix
        .values
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.map(|v| format!("{v:.2}")).unwrap_or_default())
                .collect()
        })
        .collect();

    Figure::new("correlation_heatmap", "Correlation Heatmap")
        .trace(json!({
            "type": "heatmap",
            "x": labels,
            "y": labels,
            "z": matrix.values,
            "text": text,
            "texttemplate": "%{text}",
            "colorscale": "RdBu",
            "reversescale": true,
            "zmin": -1.0,
            "zmax": 1.0,
        }))
        .layout(json!({ "yaxis": { "autorange": "reversed" } }))
}

/// Sales against profit, one trace per category, marker area by quantity.
pub fn sales_vs_profit(view: &FilteredView<'_>) -> Figure {
    let max_quantity = view.iter().map(|r| r.quantity).max().unwrap_or(1).max(1) as f64;
    let size_ref = 2.0 * max_quantity / (SCATTER_SIZE_MAX * SCATTER_SIZE_MAX);

    let mut figure = Figure::new("sales_vs_profit", "Sales vs Profit Scatter Plot").layout(json!({
        "xaxis": { "title": { "text": "Sales" } },
        "yaxis": { "title": { "text": "Profit" } },
        "legend": { "title": { "text": "Category" } },
    }));

    for category in view.distinct(Dimension::Category) {
        let rows: Vec<_> = view.iter().filter(|r| r.category == category).collect();
        figure = figure.trace(json!({
            "type": "scatter",
            "mode": "markers",
            "name": category,
            "x": rows.iter().map(|r| r.sales).collect::<Vec<_>>(),
            "y": rows.iter().map(|r| r.profit).collect::<Vec<_>>(),
            "hovertext": rows.iter().map(|r| r.city.as_str()).collect::<Vec<_>>(),
            "hovertemplate": "City=%{hovertext}<br>Sales=%{x}<br>Profit=%{y}<extra></extra>",
            "marker": {
                "size": rows.iter().map(|r| r.quantity).collect::<Vec<_>>(),
                "sizemode": "area",
                "sizeref": size_ref,
            },
        }));
    }
    figure
}

fn hierarchy_figure(
    view: &FilteredView<'_>,
    kind: &str,
    id: &'static str,
    title: &str,
    levels: &[Dimension],
    color: Measure,
) -> Figure {
    let nodes = hierarchy(view, levels, Measure::Sales, color);
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
    let parents: Vec<&str> = nodes.iter().map(|n| n.parent.as_str()).collect();
    let values: Vec<f64> = nodes.iter().map(|n| n.value).collect();
    let colors: Vec<f64> = nodes.iter().map(|n| n.color).collect();

    Figure::new(id, title).trace(json!({
        "type": kind,
        "ids": ids,
        "labels": labels,
        "parents": parents,
        "values": values,
        "branchvalues": "total",
        "marker": {
            "colors": colors,
            "colorscale": "RdBu",
            "showscale": true,
            "colorbar": { "title": { "text": color.label() } },
        },
        "hovertemplate": "%{label}<br>Sales=%{value}<extra></extra>",
    }))
}

/// Sales treemap along region, category and sub-category, colored by profit.
pub fn sales_treemap(view: &FilteredView<'_>) -> Figure {
    hierarchy_figure(
        view,
        "treemap",
        "sales_treemap",
        "Sales Treemap (Region > Category > Sub-Category)",
        &[Dimension::Region, Dimension::Category, Dimension::SubCategory],
        Measure::Profit,
    )
}

/// Sales sunburst along segment, category and sub-category, colored by sales.
pub fn sales_sunburst(view: &FilteredView<'_>) -> Figure {
    hierarchy_figure(
        view,
        "sunburst",
        "sales_sunburst",
        "Sunburst Chart (Segment > Category > Sub-Category)",
        &[Dimension::Segment, Dimension::Category, Dimension::SubCategory],
        Measure::Sales,
    )
}

/// Sales per ship mode as a funnel.
pub fn sales_funnel(view: &FilteredView<'_>) -> Figure {
    let (modes, sales): (Vec<_>, Vec<_>) = sum_by(view, Dimension::ShipMode, Measure::Sales)
        .into_iter()
        .map(|g| (g.key, g.value))
        .unzip();
    Figure::new("sales_funnel", "Sales Funnel").trace(json!({
        "type": "funnel",
        "x": sales,
        "y": modes,
    }))
}

/// Running sales total in order-date order.
pub fn cumulative_sales(view: &FilteredView<'_>) -> Figure {
    let (x, y): (Vec<_>, Vec<_>) = cumulative_by_date(view, Measure::Sales)
        .into_iter()
        .map(|p| (iso(p.date), p.running_total))
        .unzip();
    Figure::new("cumulative_sales", "Cumulative Sales Over Time")
        .trace(json!({
            "type": "scatter",
            "mode": "lines",
            "x": x,
            "y": y,
            "name": "Cumulative Sales",
        }))
        .layout(json!({
            "title": { "text": "Cumulative Sales" },
            "xaxis": { "title": { "text": "Order Date" }, "type": "date" },
            "yaxis": { "title": { "text": "Cumulative Sales" } },
        }))
}

/// Gauge of actual sales against a target.
pub fn target_gauge(actual: f64, target: f64) -> Figure {
    Figure::new("sales_target", "Sales Target vs Actual").trace(json!({
        "type": "indicator",
        "mode": "gauge+number+delta",
        "value": actual,
        "delta": { "reference": target },
        "gauge": {
            "axis": { "range": [Value::Null, target * GAUGE_HEADROOM] },
            "bar": { "color": "green" },
        },
        "title": { "text": "Total Sales vs Target" },
    }))
}

/// Sales flowing from each segment to each category.
///
/// Node order is first appearance in order-date order.
pub fn segment_category_sankey(view: &FilteredView<'_>) -> Figure {
    let mut by_date: Vec<_> = view.iter().collect();
    by_date.sort_by_key(|r| r.order_date);
    let by_date = FilteredView::from_rows(by_date);

    let graph = flows(&by_date, Dimension::Segment, Dimension::Category, Measure::Sales);
    let source: Vec<usize> = graph.links.iter().map(|l| l.source).collect();
    let target: Vec<usize> = graph.links.iter().map(|l| l.target).collect();
    let value: Vec<f64> = graph.links.iter().map(|l| l.value).collect();

    Figure::new(
        "segment_category_sankey",
        "Simplified Sankey Diagram (Segment to Category Flow)",
    )
    .trace(json!({
        "type": "sankey",
        "node": {
            "pad": 15,
            "thickness": 20,
            "label": graph.nodes,
            "color": "lightblue",
        },
        "link": { "source": source, "target": target, "value": value },
    }))
    .layout(json!({
        "title": { "text": "Segment to Category Flow" },
        "font": { "size": 10 },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_core::{Dataset, OrderRecord};

    fn record(region: &str, segment: &str, category: &str, sales: f64, profit: f64) -> OrderRecord {
        OrderRecord {
            order_id: format!("{region}-{segment}-{category}"),
            order_date: chrono::NaiveDate::from_ymd_opt(2017, 1, 5).unwrap(),
            region: region.to_string(),
            segment: segment.to_string(),
            category: category.to_string(),
            sub_category: "Chairs".to_string(),
            ship_mode: "First Class".to_string(),
            city: "Seattle".to_string(),
            customer_id: "C1".to_string(),
            sales,
            profit,
            quantity: 3,
            discount: 0.0,
            extras: Vec::new(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("West", "Consumer", "Furniture", 100.0, 10.0),
            record("East", "Consumer", "Technology", 300.0, -5.0),
            record("West", "Corporate", "Furniture", 200.0, 20.0),
        ])
    }

    #[test]
    fn test_bar_is_sorted_by_key() {
        let dataset = dataset();
        let fig = sales_by_region(&FilteredView::full(&dataset));
        assert_eq!(fig.data[0]["x"], json!(["East", "West"]));
        assert_eq!(fig.data[0]["y"], json!([300.0, 300.0]));
        assert_eq!(fig.layout["title"]["text"], "Sales by Region");
    }

    #[test]
    fn test_scatter_has_one_trace_per_category() {
        let dataset = dataset();
        let fig = sales_vs_profit(&FilteredView::full(&dataset));
        assert_eq!(fig.trace_count(), 2);
        assert_eq!(fig.data[0]["name"], "Furniture");
        assert_eq!(fig.data[0]["hovertext"], json!(["Seattle", "Seattle"]));
    }

    #[test]
    fn test_gauge_axis_headroom() {
        let fig = target_gauge(1_500_000.0, 3_000_000.0);
        let range = &fig.data[0]["gauge"]["axis"]["range"];
        assert!(range[0].is_null());
        assert_eq!(range[1], json!(3_600_000.0));
        assert_eq!(fig.data[0]["delta"]["reference"], json!(3_000_000.0));
    }

    #[test]
    fn test_sankey_links_only_positive_flows() {
        let dataset = dataset();
        let fig = segment_category_sankey(&FilteredView::full(&dataset));
        let node = &fig.data[0]["node"]["label"];
        assert_eq!(*node, json!(["Consumer", "Corporate", "Furniture", "Technology"]));
        assert_eq!(fig.data[0]["link"]["value"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_sankey_nodes_follow_order_date() {
        let mut late = record("West", "Corporate", "Technology", 50.0, 5.0);
        late.order_date = chrono::NaiveDate::from_ymd_opt(2018, 6, 1).unwrap();
        let mut early = record("East", "Home Office", "Furniture", 80.0, 8.0);
        early.order_date = chrono::NaiveDate::from_ymd_opt(2015, 2, 1).unwrap();
        let dataset = Dataset::from_records(vec![late, early]);

        let fig = segment_category_sankey(&FilteredView::full(&dataset));
        assert_eq!(
            fig.data[0]["node"]["label"],
            json!(["Home Office", "Corporate", "Furniture", "Technology"])
        );
        assert_eq!(fig.data[0]["link"]["source"], json!([0, 1]));
        assert_eq!(fig.data[0]["link"]["target"], json!([2, 3]));
        assert_eq!(fig.layout["title"]["text"], "Segment to Category Flow");
        assert_eq!(fig.title, "Simplified Sankey Diagram (Segment to Category Flow)");
    }

    #[test]
    fn test_empty_view_produces_empty_traces() {
        let view = FilteredView::from_rows(Vec::new());
        assert_eq!(sales_by_region(&view).data[0]["x"], json!([]));
        assert_eq!(monthly_sales_trend(&view).data[0]["x"], json!([]));
        assert_eq!(sales_vs_profit(&view).trace_count(), 0);
        assert_eq!(segment_category_sankey(&view).data[0]["link"]["value"], json!([]));
    }
}
