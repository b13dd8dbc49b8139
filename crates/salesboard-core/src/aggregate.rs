//! KPI scalars and the groupings behind each chart.
//!
//! Everything here is a pure function of a [`FilteredView`]; callers re-run it
//! after every selection change.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dimension, Measure, OrderRecord, distinct_in_order};
use crate::filter::FilteredView;
use crate::stats::SalesStatistics;

/// KPI scalars plus the descriptive statistics of the sales column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Distinct order IDs.
    pub order_count: usize,
    /// Distinct customer IDs.
    pub customer_count: usize,
    pub row_count: usize,
    /// `None` when the view is empty.
    pub sales: Option<SalesStatistics>,
}

/// Compute the KPIs and sales statistics of a view.
pub fn summarize(view: &FilteredView<'_>) -> AggregateResult {
    let sales = view.sales();
    AggregateResult {
        total_sales: sales.iter().sum(),
        total_profit: view.iter().map(|r| r.profit).sum(),
        order_count: distinct_count(view, |r| &r.order_id),
        customer_count: distinct_count(view, |r| &r.customer_id),
        row_count: view.len(),
        sales: SalesStatistics::from_values(&sales),
    }
}

fn distinct_count(view: &FilteredView<'_>, key: impl Fn(&OrderRecord) -> &str) -> usize {
    view.iter().map(key).collect::<FxHashSet<_>>().len()
}

/// A labelled total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// Sum a measure per dimension value, keys sorted ascending.
pub fn sum_by(view: &FilteredView<'_>, dimension: Dimension, measure: Measure) -> Vec<GroupTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in view.iter() {
        *totals.entry(dimension.value(record)).or_insert(0.0) += measure.value(record);
    }
    totals
        .into_iter()
        .map(|(key, value)| GroupTotal {
            key: key.to_string(),
            value,
        })
        .collect()
}

/// A labelled row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub key: String,
    pub count: usize,
}

/// Row counts per dimension value, most frequent first.
///
/// Equal counts keep first-appearance order.
pub fn value_counts(view: &FilteredView<'_>, dimension: Dimension) -> Vec<ValueCount> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for record in view.iter() {
        *counts.entry(dimension.value(record)).or_insert(0) += 1;
    }
    let mut out: Vec<ValueCount> = distinct_in_order(view.iter(), dimension)
        .into_iter()
        .map(|key| ValueCount {
            count: counts[key.as_str()],
            key,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Total of one calendar month, labelled by the month's last day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub value: f64,
}

fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Monthly totals covering every month from the first to the last order.
///
/// Months without orders are present with a zero total.
pub fn monthly_totals(view: &FilteredView<'_>, measure: Measure) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for record in view.iter() {
        let key = (record.order_date.year(), record.order_date.month());
        *buckets.entry(key).or_insert(0.0) += measure.value(record);
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let (mut year, mut month) = first;
    while (year, month) <= last {
        out.push(MonthlyTotal {
            month_end: month_end(year, month),
            value: buckets.get(&(year, month)).copied().unwrap_or(0.0),
        });
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    out
}

/// Pearson correlation of every pair of measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub measures: Vec<Measure>,
    /// Row-major; `None` where a measure is constant or there are fewer than two rows.
    pub values: Vec<Vec<Option<f64>>>,
}

pub fn correlation_matrix(view: &FilteredView<'_>, measures: &[Measure]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = measures
        .iter()
        .map(|m| view.iter().map(|r| m.value(r)).collect())
        .collect();

    let values = columns
        .iter()
        .map(|x| columns.iter().map(|y| pearson(x, y)).collect())
        .collect();

    CorrelationMatrix {
        measures: measures.to_vec(),
        values,
    }
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// One point of a running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub running_total: f64,
}

/// Running total of a measure over rows stably sorted by order date.
pub fn cumulative_by_date(view: &FilteredView<'_>, measure: Measure) -> Vec<CumulativePoint> {
    let mut rows: Vec<&OrderRecord> = view.iter().collect();
    rows.sort_by_key(|r| r.order_date);

    let mut running_total = 0.0;
    rows.into_iter()
        .map(|r| {
            running_total += measure.value(r);
            CumulativePoint {
                date: r.order_date,
                running_total,
            }
        })
        .collect()
}

/// A node of a treemap/sunburst hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Slash-joined path with `\\` and `/` escaped in labels, unique across
    /// the hierarchy.
    pub id: String,
    pub label: String,
    /// Empty for top-level nodes.
    pub parent: String,
    pub value: f64,
    /// Value-weighted mean of the color measure.
    pub color: f64,
}

/// Build a hierarchy along `levels`, sized by `value` and colored by `color`.
///
/// Nodes are emitted parents-first; siblings are sorted by label.
pub fn hierarchy(
    view: &FilteredView<'_>,
    levels: &[Dimension],
    value: Measure,
    color: Measure,
) -> Vec<HierarchyNode> {
    // path -> (value sum, value-weighted color sum, plain color sum, rows)
    let mut nodes: BTreeMap<Vec<&str>, (f64, f64, f64, usize)> = BTreeMap::new();
    for record in view.iter() {
        let v = value.value(record);
        let c = color.value(record);
        for depth in 1..=levels.len() {
            let path: Vec<&str> = levels[..depth].iter().map(|d| d.value(record)).collect();
            let entry = nodes.entry(path).or_insert((0.0, 0.0, 0.0, 0));
            entry.0 += v;
            entry.1 += v * c;
            entry.2 += c;
            entry.3 += 1;
        }
    }

    let mut out: Vec<(usize, HierarchyNode)> = nodes
        .into_iter()
        .map(|(path, (total, weighted, plain, rows))| {
            let color = if total != 0.0 { weighted / total } else { plain / rows as f64 };
            let depth = path.len();
            let node = HierarchyNode {
                id: node_id(&path),
                label: path[depth - 1].to_string(),
                parent: node_id(&path[..depth - 1]),
                value: total,
                color,
            };
            (depth, node)
        })
        .collect();
    out.sort_by_key(|(depth, _)| *depth);
    out.into_iter().map(|(_, node)| node).collect()
}

fn node_id(path: &[&str]) -> String {
    path.iter()
        .map(|label| label.replace('\\', "\\\\").replace('/', "\\/"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Nodes and links of a two-level flow diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    /// Distinct `from` values, then distinct `to` values, first appearance first.
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// Links from each `from` value to each `to` value with a positive total.
pub fn flows(view: &FilteredView<'_>, from: Dimension, to: Dimension, measure: Measure) -> FlowGraph {
    let sources = distinct_in_order(view.iter(), from);
    let targets = distinct_in_order(view.iter(), to);

    let mut totals: FxHashMap<(&str, &str), f64> = FxHashMap::default();
    for record in view.iter() {
        *totals
            .entry((from.value(record), to.value(record)))
            .or_insert(0.0) += measure.value(record);
    }

    let mut links = Vec::new();
    for (i, source) in sources.iter().enumerate() {
        for (j, target) in targets.iter().enumerate() {
            let value = totals
                .get(&(source.as_str(), target.as_str()))
                .copied()
                .unwrap_or(0.0);
            if value > 0.0 {
                links.push(FlowLink {
                    source: i,
                    target: sources.len() + j,
                    value,
                });
            }
        }
    }

    let mut nodes = sources;
    nodes.extend(targets);
    FlowGraph { nodes, links }
}
