//! Inventory Loader Module
//! Reads the Inventory sheet from a workbook (calamine) or a CSV export (Polars).

use crate::error::{InventoryError, Result};
use crate::inventory::row::{Cell, Column, InventoryRow};
use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Sheet holding the inventory records. The cover page is never read.
pub const DEFAULT_SHEET: &str = "Inventory";

/// Options for loading an inventory snapshot.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub sheet: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: DEFAULT_SHEET.to_string(),
        }
    }
}

/// Load inventory rows from a snapshot file.
///
/// Workbooks are read from `options.sheet`; CSV files are taken as an export
/// of that sheet. Every inventory column must be present.
pub fn load_inventory(path: &Path, options: &LoadOptions) -> Result<Vec<InventoryRow>> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, &options.sheet)?,
        "csv" => load_csv(path)?,
        _ => return Err(InventoryError::UnsupportedFormat(extension)),
    };

    info!(path = %path.display(), rows = rows.len(), "Loaded inventory");
    Ok(rows)
}

fn load_workbook(path: &Path, sheet: &str) -> Result<Vec<InventoryRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range(sheet)?;
    debug!(sheet, height = range.height(), width = range.width(), "Read worksheet");
    rows_from_range(&range)
}

/// Convert a worksheet range whose first row is the header.
pub(crate) fn rows_from_range(range: &Range<Data>) -> Result<Vec<InventoryRow>> {
    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let mut indices = [0usize; 10];
    for (slot, column) in indices.iter_mut().zip(Column::ALL) {
        *slot = headers
            .iter()
            .position(|h| h == column.header())
            .ok_or_else(|| InventoryError::MissingColumn(column.header().to_string()))?;
    }

    let rows = sheet_rows
        .map(|cells| {
            let row_cells = indices.map(|i| cells.get(i).map(cell_from_data).unwrap_or_default());
            InventoryRow::from_cells(row_cells)
        })
        .filter(|row| !row.is_blank())
        .collect();

    Ok(rows)
}

fn cell_from_data(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::from_f64(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::from_f64(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
    }
}

/// Load a CSV export using Polars.
fn load_csv(path: &Path) -> Result<Vec<InventoryRow>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    debug!(height = df.height(), width = df.width(), "Read CSV");
    let rows = rows_from_frame(&df)?;
    Ok(rows.into_iter().filter(|row| !row.is_blank()).collect())
}

/// Convert a Polars frame holding the inventory columns into rows.
pub fn rows_from_frame(df: &DataFrame) -> Result<Vec<InventoryRow>> {
    let mut columns = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        let series = df
            .column(column.header())
            .map_err(|_| InventoryError::MissingColumn(column.header().to_string()))?;
        columns.push(series);
    }

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut row = InventoryRow::default();
        for (column, series) in Column::ALL.into_iter().zip(&columns) {
            row.set(column, cell_from_any(series.get(i)?));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn cell_from_any(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => Cell::Empty,
        AnyValue::Boolean(b) => Cell::Bool(b),
        AnyValue::String(s) => Cell::text(s),
        AnyValue::StringOwned(s) => Cell::text(s.as_str()),
        AnyValue::Int8(v) => Cell::Int(v.into()),
        AnyValue::Int16(v) => Cell::Int(v.into()),
        AnyValue::Int32(v) => Cell::Int(v.into()),
        AnyValue::Int64(v) => Cell::Int(v),
        AnyValue::UInt8(v) => Cell::Int(v.into()),
        AnyValue::UInt16(v) => Cell::Int(v.into()),
        AnyValue::UInt32(v) => Cell::Int(v.into()),
        AnyValue::UInt64(v) => i64::try_from(v)
            .map(Cell::Int)
            .unwrap_or(Cell::Float(v as f64)),
        AnyValue::Float32(v) => Cell::from_f64(v.into()),
        AnyValue::Float64(v) => Cell::from_f64(v),
        other => Cell::text(other.to_string().trim_matches('"')),
    }
}
