use std::path::Path;

use super::model::BusTable;

/// File name offered when the user downloads the filtered table.
pub const EXPORT_FILE_NAME: &str = "filtered_buses.csv";

/// Serialize a table as UTF-8 CSV with a header row. Missing cells become
/// empty fields.
pub fn to_csv_bytes(table: &BusTable) -> Result<Vec<u8>, csv::Error> {
    let mut writer = builder().from_writer(Vec::new());
    write_rows(&mut writer, table)?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Write the table as CSV to `path`.
pub fn write_csv(table: &BusTable, path: &Path) -> Result<(), csv::Error> {
    let mut writer = builder().from_path(path)?;
    write_rows(&mut writer, table)?;
    writer.flush()?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

fn builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::Any(b'\n'));
    builder
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    table: &BusTable,
) -> Result<(), csv::Error> {
    if table.columns().is_empty() {
        return Ok(());
    }
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_str().unwrap_or("")))?;
    }
    Ok(())
}
