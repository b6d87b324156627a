//! Inventory Writer Module
//! Builds a Polars frame from rows and writes it as CSV, JSON or an xlsx workbook.

use crate::error::{InventoryError, Result};
use crate::inventory::loader::DEFAULT_SHEET;
use crate::inventory::row::{Cell, Column, InventoryRow};
use polars::prelude::{Column as FrameColumn, CsvWriter, DataFrame, SerWriter};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Output encoding for cleaned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

impl OutputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(InventoryError::UnsupportedFormat(extension)),
        }
    }
}

/// Build one frame column from the cells of an inventory column.
///
/// Integers stay Int64, mixed numbers become Float64, all-bool becomes
/// Boolean and anything else is rendered as text.
fn frame_column(column: Column, rows: &[InventoryRow]) -> FrameColumn {
    let name = column.header().into();
    let cells: Vec<&Cell> = rows.iter().map(|row| row.get(column)).collect();
    let present = || cells.iter().filter(|c| !matches!(c, Cell::Empty));

    let has_values = present().next().is_some();
    if has_values && present().all(|c| matches!(c, Cell::Int(_))) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        return FrameColumn::new(name, values);
    }

    if has_values && present().all(|c| c.is_numeric()) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(i) => Some(*i as f64),
                Cell::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        return FrameColumn::new(name, values);
    }

    if has_values && present().all(|c| matches!(c, Cell::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Cell::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return FrameColumn::new(name, values);
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|c| match c {
            Cell::Empty => None,
            other => Some(other.to_string()),
        })
        .collect();
    FrameColumn::new(name, values)
}

/// Convert rows into a frame with the inventory columns in sheet order.
pub fn rows_to_frame(rows: &[InventoryRow]) -> Result<DataFrame> {
    let columns = Column::ALL
        .into_iter()
        .map(|column| frame_column(column, rows))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Write rows to an "Inventory" sheet with a bold header row in sheet order.
fn write_workbook(rows: &[InventoryRow], destination: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(DEFAULT_SHEET)?;

    for (col, column) in (0u16..).zip(Column::ALL) {
        worksheet.write_string_with_format(0, col, column.header(), &header)?;
    }

    for (line, row) in (1u32..).zip(rows) {
        for (col, column) in (0u16..).zip(Column::ALL) {
            match row.get(column) {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(line, col, s.as_str())?;
                }
                Cell::Int(i) => {
                    worksheet.write_number(line, col, *i as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(line, col, *f)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(line, col, *b)?;
                }
            }
        }
    }

    workbook.save(destination)?;
    Ok(())
}

/// Write cleaned rows to `destination`.
pub fn write(rows: &[InventoryRow], destination: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = BufWriter::new(File::create(destination)?);
            let mut df = rows_to_frame(rows)?;
            CsvWriter::new(&mut writer)
                .include_header(true)
                .finish(&mut df)?;
        }
        OutputFormat::Json => {
            let mut writer = BufWriter::new(File::create(destination)?);
            serde_json::to_writer_pretty(&mut writer, rows)?;
        }
        OutputFormat::Xlsx => write_workbook(rows, destination)?,
    }

    info!(path = %destination.display(), rows = rows.len(), ?format, "Wrote inventory");
    Ok(())
}
