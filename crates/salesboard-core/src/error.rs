//! Error types for salesboard-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for salesboard-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or exporting the dataset.
#[derive(Debug, Error)]
pub enum Error {
    /// The data file could not be read or written.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet could not be opened or decoded.
    #[error("failed to read workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    /// The expected sheet is not present in the workbook.
    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    MissingSheet { sheet: String, available: Vec<String> },

    /// A required column is absent from the header row.
    #[error("required column '{0}' not found")]
    MissingColumn(String),

    /// A cell could not be parsed into its column type.
    #[error("invalid value in column '{column}' at row {row}: {message}")]
    InvalidCell {
        row: usize,
        column: String,
        message: String,
    },

    /// The file extension is not a supported input format.
    #[error("unsupported data file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Build an IO error carrying the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Render the error with a short recovery hint for terminal display.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::Io { .. } => {
                "check that the data file exists, or point --data / SALESBOARD_BASE_PATH at it"
            }
            Error::Workbook { .. } => {
                "make sure the file is a valid .xlsx/.xlsm/.xlsb/.xls/.ods workbook"
            }
            Error::MissingSheet { .. } => "the workbook must contain a sheet named 'Orders'",
            Error::MissingColumn(_) => {
                "the Orders sheet needs: Order ID, Order Date, Region, Segment, Category, \
                 Sub-Category, Ship Mode, City, Customer ID, Sales, Profit, Quantity, Discount"
            }
            Error::InvalidCell { .. } => "fix or remove the offending row in the source sheet",
            Error::UnsupportedFormat { .. } => {
                "supported formats: .xlsx, .xlsm, .xlsb, .xls, .ods, .csv"
            }
            Error::Csv(_) => "the CSV file must be UTF-8 with a header row",
        };
        format!("{}\n  hint: {}", self, hint)
    }
}
