//! Rich output rendering for dashboard panels.
//!
//! The [`Render`] trait lets a panel describe itself as plain text (for the
//! terminal report), as HTML (for the inline fallback page), and as structured
//! JSON (for the web frontend).

use serde::Serialize;

use salesboard_core::{AggregateResult, SalesStatistics};

use crate::format;

/// Types that can render themselves for display.
///
/// # Example
///
/// ```rust
/// use salesboard::render::Render;
///
/// #[derive(Debug)]
/// struct Banner(&'static str);
///
/// impl Render for Banner {
///     fn render_html(&self) -> Option<String> {
///         Some(format!("<h1>{}</h1>", self.0))
///     }
/// }
///
/// assert_eq!(Banner("Sales").render_text(), "Banner(\"Sales\")");
/// ```
pub trait Render {
    /// Plain text representation (for terminals).
    ///
    /// Defaults to the [`Debug`] representation if the type implements it.
    fn render_text(&self) -> String
    where
        Self: std::fmt::Debug,
    {
        format!("{:?}", self)
    }

    /// Rich HTML representation.
    ///
    /// Return `None` to fall back to text rendering.
    fn render_html(&self) -> Option<String> {
        None
    }

    /// Structured data for programmatic access.
    ///
    /// Return `None` if no structured data is available.
    fn render_data(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Shown in place of a statistic that is undefined for the current view.
pub const NOT_ENOUGH_DATA: &str = "Not enough data";

/// A single headline number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub icon: &'static str,
    pub title: &'static str,
    /// Display text, already formatted.
    pub value: String,
}

/// The four headline cards shown above both dashboard tabs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCards {
    pub cards: Vec<KpiCard>,
}

impl KpiCards {
    pub fn from_summary(summary: &AggregateResult) -> Self {
        Self {
            cards: vec![
                KpiCard {
                    icon: "💰",
                    title: "Total Sales",
                    value: format::currency(summary.total_sales),
                },
                KpiCard {
                    icon: "📈",
                    title: "Total Profit",
                    value: format::currency(summary.total_profit),
                },
                KpiCard {
                    icon: "🛒",
                    title: "Orders",
                    value: summary.order_count.to_string(),
                },
                KpiCard {
                    icon: "👤",
                    title: "Unique Customers",
                    value: summary.customer_count.to_string(),
                },
            ],
        }
    }
}

impl Render for KpiCards {
    fn render_text(&self) -> String {
        self.cards
            .iter()
            .map(|card| format!("{:<18} {}", card.title, card.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_html(&self) -> Option<String> {
        let mut html = String::from("<div class=\"kpi-row\">");
        for card in &self.cards {
            html.push_str(&format!(
                "<div class=\"kpi-card\">{} <b>{}</b><br><h3>{}</h3></div>",
                card.icon,
                html_escape(card.title),
                html_escape(&card.value)
            ));
        }
        html.push_str("</div>");
        Some(html)
    }

    fn render_data(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

/// One descriptive statistic with its formula and the computed step line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticCard {
    pub name: &'static str,
    /// LaTeX source of the formula.
    pub formula: &'static str,
    /// Result lines, e.g. `Mean = 1,000.00 / 4 = 250.00`.
    pub lines: Vec<String>,
}

impl StatisticCard {
    fn new(name: &'static str, formula: &'static str, lines: Vec<String>) -> Self {
        Self {
            name,
            formula,
            lines,
        }
    }

    fn undefined(name: &'static str, formula: &'static str) -> Self {
        Self::new(name, formula, vec![format!("{name} = {NOT_ENOUGH_DATA}")])
    }
}

/// Builds the statistics tab: mean, median, mode, range, variance, standard
/// deviation, IQR and the count/min/max block.
///
/// When the view is empty every card reads [`NOT_ENOUGH_DATA`]; variance and
/// standard deviation also do so for a single row.
pub fn statistic_cards(stats: Option<&SalesStatistics>) -> Vec<StatisticCard> {
    const MEAN: &str = r"\mu = \frac{\sum_{i=1}^{N} x_i}{N}";
    const MEDIAN: &str = r"\text{Median} = \text{Middle Value of Ordered Dataset}";
    const MODE: &str = r"\text{Mode} = \text{Most Frequent Value}";
    const RANGE: &str = r"\text{Range} = \max(x) - \min(x)";
    const VARIANCE: &str = r"s^2 = \frac{\sum_{i=1}^{N} (x_i - \mu)^2}{N-1}";
    const STD_DEV: &str = r"s = \sqrt{s^2} = \sqrt{\text{Variance}}";
    const IQR: &str = r"IQR = Q_3 - Q_1";
    const ADDITIONAL: &str = r"\text{Additional Metrics}";

    let Some(s) = stats else {
        return vec![
            StatisticCard::undefined("Mean", MEAN),
            StatisticCard::undefined("Median", MEDIAN),
            StatisticCard::undefined("Mode", MODE),
            StatisticCard::undefined("Range", RANGE),
            StatisticCard::undefined("Variance", VARIANCE),
            StatisticCard::undefined("Std Dev", STD_DEV),
            StatisticCard::undefined("IQR", IQR),
            StatisticCard::new(
                "Additional Metrics",
                ADDITIONAL,
                vec![
                    "Count = 0".to_string(),
                    format!("Min = {NOT_ENOUGH_DATA}"),
                    format!("Max = {NOT_ENOUGH_DATA}"),
                ],
            ),
        ];
    };

    let g = format::grouped;
    let variance = match s.variance {
        Some(v) => StatisticCard::new("Variance", VARIANCE, vec![format!("Variance = {}", g(v))]),
        None => StatisticCard::undefined("Variance", VARIANCE),
    };
    let std_dev = match (s.variance, s.std_dev) {
        (Some(v), Some(sd)) => StatisticCard::new(
            "Std Dev",
            STD_DEV,
            vec![format!("Std Dev = √{} = {}", g(v), g(sd))],
        ),
        _ => StatisticCard::undefined("Std Dev", STD_DEV),
    };

    vec![
        StatisticCard::new(
            "Mean",
            MEAN,
            vec![format!("Mean = {} / {} = {}", g(s.sum), s.count, g(s.mean))],
        ),
        StatisticCard::new("Median", MEDIAN, vec![format!("Median = {}", g(s.median))]),
        StatisticCard::new("Mode", MODE, vec![format!("Mode = {}", g(s.mode))]),
        StatisticCard::new(
            "Range",
            RANGE,
            vec![format!("Range = {} - {} = {}", g(s.max), g(s.min), g(s.range))],
        ),
        variance,
        std_dev,
        StatisticCard::new(
            "IQR",
            IQR,
            vec![format!("IQR = {} - {} = {}", g(s.q3), g(s.q1), g(s.iqr))],
        ),
        StatisticCard::new(
            "Additional Metrics",
            ADDITIONAL,
            vec![
                format!("Count = {}", s.count),
                format!("Min = {}", g(s.min)),
                format!("Max = {}", g(s.max)),
            ],
        ),
    ]
}

impl Render for StatisticCard {
    fn render_text(&self) -> String {
        self.lines.join("\n")
    }

    fn render_html(&self) -> Option<String> {
        let lines: Vec<String> = self.lines.iter().map(|l| html_escape(l)).collect();
        Some(format!(
            "<div class=\"calc-box\"><div class=\"calc-formula\">\\[{}\\]</div>\
             <div class=\"calc-result\">{}</div></div>",
            html_escape(self.formula),
            lines.join("<br>")
        ))
    }

    fn render_data(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
