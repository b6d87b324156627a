//! Inventory module - row model, spreadsheet loading and writing

mod loader;
mod row;
mod writer;

pub use crate::error::InventoryError;
pub use loader::{load_inventory, rows_from_frame, LoadOptions, DEFAULT_SHEET};
pub use row::{
    Cell, Column, InventoryRow, NO_DESCRIPTION, UNKNOWN_EXISTING_TECHNOLOGY,
    UNKNOWN_FUNCTIONAL_CATEGORY, UNKNOWN_TECHNOLOGY_CATEGORY, UNKNOWN_TECHNOLOGY_NAME,
    UNKNOWN_TECH_PRODUCER,
};
pub use writer::{rows_to_frame, write, OutputFormat};
