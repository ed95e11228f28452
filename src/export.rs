use std::io::Write;

use crate::models::TableRow;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
}

/// Column headers, in the same order as the `TableRow` fields
pub const CSV_HEADERS: [&str; 8] = [
    "id",
    "date",
    "tempMax",
    "tempMin",
    "tempMean",
    "apparentTempMax",
    "apparentTempMin",
    "apparentTempMean",
];

/// Write rows as CSV: one header line, then one line per row.
pub fn write_csv<W: Write>(rows: &[TableRow], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;

    for row in rows {
        let mut record = Vec::with_capacity(CSV_HEADERS.len());
        record.push(row.id.to_string());
        record.push(row.date.clone());
        record.extend(row.cells().iter().map(|cell| cell.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[TableRow]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
