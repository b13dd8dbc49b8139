//! Order records and the named columns they expose.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the `Orders` sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub region: String,
    pub segment: String,
    pub category: String,
    pub sub_category: String,
    pub ship_mode: String,
    pub city: String,
    pub customer_id: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub discount: f64,
    /// Values of the non-required columns, in [`Dataset::extra_columns`] order.
    ///
    /// [`Dataset::extra_columns`]: super::Dataset::extra_columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
}

/// A required column of the `Orders` sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OrderId,
    OrderDate,
    Region,
    Segment,
    Category,
    SubCategory,
    ShipMode,
    City,
    CustomerId,
    Sales,
    Profit,
    Quantity,
    Discount,
}

impl Field {
    /// Every required column, in canonical export order.
    pub const ALL: [Field; 13] = [
        Field::OrderId,
        Field::OrderDate,
        Field::Region,
        Field::Segment,
        Field::Category,
        Field::SubCategory,
        Field::ShipMode,
        Field::City,
        Field::CustomerId,
        Field::Sales,
        Field::Profit,
        Field::Quantity,
        Field::Discount,
    ];

    /// Header text as it appears in the source sheet.
    pub fn header(self) -> &'static str {
        match self {
            Field::OrderId => "Order ID",
            Field::OrderDate => "Order Date",
            Field::Region => "Region",
            Field::Segment => "Segment",
            Field::Category => "Category",
            Field::SubCategory => "Sub-Category",
            Field::ShipMode => "Ship Mode",
            Field::City => "City",
            Field::CustomerId => "Customer ID",
            Field::Sales => "Sales",
            Field::Profit => "Profit",
            Field::Quantity => "Quantity",
            Field::Discount => "Discount",
        }
    }

    /// Look a column up by its header text (surrounding whitespace ignored).
    pub fn from_header(header: &str) -> Option<Field> {
        let header = header.trim();
        Field::ALL.into_iter().find(|f| f.header() == header)
    }

    /// Textual value of this column for a record, as written to CSV.
    pub fn display_value(self, record: &OrderRecord) -> String {
        match self {
            Field::OrderId => record.order_id.clone(),
            Field::OrderDate => record.order_date.format("%Y-%m-%d").to_string(),
            Field::Region => record.region.clone(),
            Field::Segment => record.segment.clone(),
            Field::Category => record.category.clone(),
            Field::SubCategory => record.sub_category.clone(),
            Field::ShipMode => record.ship_mode.clone(),
            Field::City => record.city.clone(),
            Field::CustomerId => record.customer_id.clone(),
            Field::Sales => record.sales.to_string(),
            Field::Profit => record.profit.to_string(),
            Field::Quantity => record.quantity.to_string(),
            Field::Discount => record.discount.to_string(),
        }
    }
}

/// Categorical column usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Region,
    Segment,
    Category,
    SubCategory,
    ShipMode,
    City,
}

impl Dimension {
    /// Borrow this dimension's value from a record.
    pub fn value(self, record: &OrderRecord) -> &str {
        match self {
            Dimension::Region => &record.region,
            Dimension::Segment => &record.segment,
            Dimension::Category => &record.category,
            Dimension::SubCategory => &record.sub_category,
            Dimension::ShipMode => &record.ship_mode,
            Dimension::City => &record.city,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Region => Field::Region.header(),
            Dimension::Segment => Field::Segment.header(),
            Dimension::Category => Field::Category.header(),
            Dimension::SubCategory => Field::SubCategory.header(),
            Dimension::ShipMode => Field::ShipMode.header(),
            Dimension::City => Field::City.header(),
        }
    }
}

/// Numeric column usable as an aggregation measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Sales,
    Profit,
    Quantity,
    Discount,
}

impl Measure {
    /// Measures shown in the correlation heatmap, in display order.
    pub const ALL: [Measure; 4] = [
        Measure::Sales,
        Measure::Profit,
        Measure::Quantity,
        Measure::Discount,
    ];

    pub fn value(self, record: &OrderRecord) -> f64 {
        match self {
            Measure::Sales => record.sales,
            Measure::Profit => record.profit,
            Measure::Quantity => record.quantity as f64,
            Measure::Discount => record.discount,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::Sales => Field::Sales.header(),
            Measure::Profit => Field::Profit.header(),
            Measure::Quantity => Field::Quantity.header(),
            Measure::Discount => Field::Discount.header(),
        }
    }
}
