use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{info, instrument, warn};

use crate::column::ColumnDef;
use crate::dataset::Row;
use crate::domain::DVError;

/// `account-payables` -> `account-payables.csv`
pub fn export_file_name(view_id: &str) -> String {
    let stem: String = view_id
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "export.csv".to_string()
    } else {
        format!("{stem}.csv")
    }
}

/// Cell text for export. Missing values become null, which the writer
/// renders as an empty field.
fn cell(row: &Row, column: &ColumnDef) -> Option<String> {
    row.get(&column.field).map(|_| row.display(&column.field))
}

/// Serializes the header line (unless `with_header` is false) followed by one
/// line per row. Fields holding the separator, a quote or a line break are
/// quoted.
fn write_csv(rows: &[Row], columns: &[ColumnDef], with_header: bool) -> Result<String, DVError> {
    if columns.is_empty() {
        warn!("CSV export without columns");
        return Ok(String::new());
    }

    // The header travels as the first data row so labels get the same
    // quoting as values and may repeat.
    let offset = usize::from(with_header);
    let data: Vec<Column> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len() + offset);
            if with_header {
                values.push(Some(column.label.clone()));
            }
            values.extend(rows.iter().map(|row| cell(row, column)));
            Column::new(format!("c{idx}").into(), values)
        })
        .collect();

    let mut frame = DataFrame::new(data)?;
    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(false)
        .with_separator(b',')
        .with_quote_style(QuoteStyle::Necessary)
        .finish(&mut frame)?;

    String::from_utf8(buffer).map_err(|e| DVError::ExportFailed(e.to_string()))
}

pub fn render_csv(rows: &[Row], columns: &[ColumnDef]) -> Result<String, DVError> {
    write_csv(rows, columns, true)
}

/// A single data line without header and line terminator.
pub fn render_csv_row(row: &Row, columns: &[ColumnDef]) -> Result<String, DVError> {
    let line = write_csv(std::slice::from_ref(row), columns, false)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Writes `<dir>/<view_id>.csv` and returns its path. A missing export
/// directory is an error.
#[instrument(skip(rows, columns), fields(rows = rows.len()))]
pub fn export_csv(
    rows: &[Row],
    columns: &[ColumnDef],
    dir: &Path,
    view_id: &str,
) -> Result<PathBuf, DVError> {
    if !dir.is_dir() {
        return Err(DVError::ExportFailed(format!(
            "export directory {} does not exist",
            dir.display()
        )));
    }
    let content = render_csv(rows, columns)?;
    let path = dir.join(export_file_name(view_id));
    fs::write(&path, content.as_bytes())
        .map_err(|e| DVError::ExportFailed(format!("{}: {e}", path.display())))?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}
