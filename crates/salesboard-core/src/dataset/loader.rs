//! Reading the source file into a typed table.
//!
//! Both input formats are first decoded into a [`RawTable`] of loosely typed
//! cells; column pruning, row dropping and type parsing then happen once, in
//! [`RawTable::into_dataset`].

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate, NaiveDateTime};
use rustc_hash::FxHashMap;

use super::{ColumnSlot, Dataset, Field, OrderRecord};
use crate::error::{Error, Result};

/// Name of the sheet holding the order table.
pub const ORDERS_SHEET: &str = "Orders";

/// Spreadsheet serial day zero (the 1900 date system, leap-year bug included).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// A loosely typed cell as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawCell {
    fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    fn from_calamine(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Empty,
            Data::String(s) => RawCell::from_text(s),
            Data::Float(f) => RawCell::Number(*f),
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => RawCell::Date(value.date()),
                None => RawCell::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::from_text(s),
        }
    }

    /// Text form of the cell, used for string columns and preserved extras.
    fn to_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            RawCell::Number(n) => n.to_string(),
            RawCell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    fn to_number(&self) -> std::result::Result<f64, String> {
        let value = match self {
            RawCell::Number(n) => *n,
            RawCell::Text(s) => s
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s))?,
            RawCell::Date(d) => return Err(format!("expected a number, found date {}", d)),
            RawCell::Empty => return Err("empty cell".to_string()),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{} is not a finite number", value))
        }
    }

    fn to_integer(&self) -> std::result::Result<i64, String> {
        let value = self.to_number()?;
        if value.fract() != 0.0 {
            return Err(format!("{} is not a whole number", value));
        }
        Ok(value as i64)
    }

    fn to_date(&self) -> std::result::Result<NaiveDate, String> {
        match self {
            RawCell::Date(d) => Ok(*d),
            RawCell::Number(serial) => excel_serial_to_date(*serial)
                .ok_or_else(|| format!("{} is not a valid date serial", serial)),
            RawCell::Text(s) => parse_date(s).ok_or_else(|| format!("'{}' is not a valid date", s)),
            RawCell::Empty => Err("empty cell".to_string()),
        }
    }
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.trunc() as u64))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Header row plus loosely typed data rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.rows[row].get(col).unwrap_or(&RawCell::Empty)
    }

    /// Prune empty columns, drop incomplete rows, and parse the typed columns.
    pub fn into_dataset(self) -> Result<Dataset> {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let kept: Vec<usize> = (0..width)
            .filter(|&col| {
                self.rows.is_empty()
                    || (0..self.rows.len()).any(|row| !self.cell(row, col).is_empty())
            })
            .collect();
        if kept.len() < width {
            tracing::debug!("Dropping {} entirely empty columns", width - kept.len());
        }

        let mut required: FxHashMap<Field, usize> = FxHashMap::default();
        let mut extra_columns = Vec::new();
        let mut layout = Vec::with_capacity(kept.len());
        let mut extra_sources = Vec::new();

        for &col in &kept {
            let header = self
                .headers
                .get(col)
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {}", col));

            match Field::from_header(&header) {
                Some(field) if !required.contains_key(&field) => {
                    required.insert(field, col);
                    layout.push(ColumnSlot::Required(field));
                }
                _ => {
                    layout.push(ColumnSlot::Extra(extra_columns.len()));
                    extra_columns.push(header);
                    extra_sources.push(col);
                }
            }
        }

        for field in Field::ALL {
            if !required.contains_key(&field) {
                return Err(Error::MissingColumn(field.header().to_string()));
            }
        }

        let mut records = Vec::with_capacity(self.rows.len());
        let mut dropped = 0usize;

        for row in 0..self.rows.len() {
            if kept.iter().any(|&col| self.cell(row, col).is_empty()) {
                dropped += 1;
                continue;
            }
            // Header occupies sheet row 1.
            let sheet_row = row + 2;
            let parse = |field: Field| self.cell(row, required[&field]);
            let invalid = |field: Field, message: String| Error::InvalidCell {
                row: sheet_row,
                column: field.header().to_string(),
                message,
            };
            let number = |field: Field| parse(field).to_number().map_err(|m| invalid(field, m));

            records.push(OrderRecord {
                order_id: parse(Field::OrderId).to_text(),
                order_date: parse(Field::OrderDate)
                    .to_date()
                    .map_err(|m| invalid(Field::OrderDate, m))?,
                region: parse(Field::Region).to_text(),
                segment: parse(Field::Segment).to_text(),
                category: parse(Field::Category).to_text(),
                sub_category: parse(Field::SubCategory).to_text(),
                ship_mode: parse(Field::ShipMode).to_text(),
                city: parse(Field::City).to_text(),
                customer_id: parse(Field::CustomerId).to_text(),
                sales: number(Field::Sales)?,
                profit: number(Field::Profit)?,
                quantity: parse(Field::Quantity)
                    .to_integer()
                    .map_err(|m| invalid(Field::Quantity, m))?,
                discount: number(Field::Discount)?,
                extras: extra_sources
                    .iter()
                    .map(|&col| self.cell(row, col).to_text())
                    .collect(),
            });
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} rows with empty cells", dropped);
        }

        Ok(Dataset::from_parts(records, layout, extra_columns))
    }
}

/// Decode the file at `path` according to its extension.
pub(crate) fn read_raw_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "data file not found"),
        ));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn read_workbook(path: &Path) -> Result<RawTable> {
    let workbook_error = |e: calamine::Error| Error::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let sheet_names = workbook.sheet_names().to_owned();
    if !sheet_names.iter().any(|name| name == ORDERS_SHEET) {
        return Err(Error::MissingSheet {
            sheet: ORDERS_SHEET.to_string(),
            available: sheet_names,
        });
    }

    let range = workbook
        .worksheet_range(ORDERS_SHEET)
        .map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|cell| RawCell::from_calamine(cell).to_text()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(RawCell::from_calamine).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(RawCell::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row() -> Vec<String> {
        Field::ALL.iter().map(|f| f.header().to_string()).collect()
    }

    fn text_row(values: [&str; 13]) -> Vec<RawCell> {
        values.iter().map(|v| RawCell::from_text(v)).collect()
    }

    const ROW: [&str; 13] = [
        "CA-1", "2017-11-08", "South", "Consumer", "Furniture", "Chairs", "Second Class",
        "Henderson", "CG-12520", "731.94", "219.58", "3", "0",
    ];

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2017, 11, 8);
        assert_eq!(parse_date("2017-11-08"), expected);
        assert_eq!(parse_date("11/8/2017"), expected);
        assert_eq!(parse_date("2017-11-08 00:00:00"), expected);
        assert_eq!(parse_date("2017-11-08T00:00:00"), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(excel_serial_to_date(43047.0), NaiveDate::from_ymd_opt(2017, 11, 8));
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn test_drops_empty_columns_and_rows() {
        let mut headers = header_row();
        headers.push("Unnamed: 13".to_string());
        let mut incomplete = text_row(ROW);
        incomplete[9] = RawCell::Empty;

        let table = RawTable {
            headers,
            rows: vec![text_row(ROW), incomplete],
        };
        let dataset = table.into_dataset().unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.columns().len(), 13);
        assert_eq!(dataset.records()[0].quantity, 3);
    }

    #[test]
    fn test_preserves_extra_columns() {
        let mut headers = header_row();
        headers.insert(0, "Row ID".to_string());
        let mut row = text_row(ROW);
        row.insert(0, RawCell::Number(1.0));

        let dataset = RawTable { headers, rows: vec![row] }.into_dataset().unwrap();

        assert_eq!(dataset.extra_columns(), ["Row ID".to_string()]);
        assert_eq!(dataset.columns()[0], "Row ID");
        assert_eq!(dataset.records()[0].extras, vec!["1".to_string()]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut headers = header_row();
        headers.retain(|h| h != "Profit");
        let mut row = text_row(ROW);
        row.remove(10);

        let err = RawTable { headers, rows: vec![row] }.into_dataset().unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "Profit"));
    }

    #[test]
    fn test_invalid_number_reports_row_and_column() {
        let mut row = text_row(ROW);
        row[9] = RawCell::Text("lots".to_string());

        let err = RawTable { headers: header_row(), rows: vec![text_row(ROW), row] }
            .into_dataset()
            .unwrap_err();
        match err {
            Error::InvalidCell { row, column, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Sales");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("orders.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(read_raw_table(&path), Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_every_workbook_extension_uses_calamine() {
        let temp = tempfile::TempDir::new().unwrap();
        for ext in ["xlsx", "xlsm", "xlsb", "xls", "ods"] {
            let path = temp.path().join(format!("orders.{ext}"));
            std::fs::write(&path, b"not a workbook").unwrap();
            let err = read_raw_table(&path).unwrap_err();
            assert!(matches!(err, Error::Workbook { .. }), "{ext}: {err}");
            assert!(Error::UnsupportedFormat { path }.with_hint().contains(&format!(".{ext}")));
        }
    }

    #[test]
    fn test_missing_file() {
        let err = read_raw_table(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
