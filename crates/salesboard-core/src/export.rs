//! CSV export of the base table.

use std::io::Write;
use std::path::Path;

use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// File name offered for the download.
pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

/// Write the whole table (header included) as comma-separated UTF-8.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(dataset.columns())?;
    for record in dataset.records() {
        writer.write_record(
            dataset
                .layout()
                .iter()
                .map(|slot| dataset.cell_text(record, slot)),
        )?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Encode the table into an in-memory CSV document.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    Ok(buf)
}

/// Write the table to a CSV file at `path`.
pub fn write_csv_file(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    write_csv(dataset, std::io::BufWriter::new(file))?;
    tracing::info!("Exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}
