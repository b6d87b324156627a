//! COSMIC Inventory - technology inventory snapshot standardizer
//!
//! Loads the "Inventory" sheet of a COSMIC Technology Inventory snapshot,
//! cleans it and hands back a dataset with the same columns.

pub mod clean;
pub mod error;
pub mod inventory;

pub use clean::{standardize, StandardizeReport, Standardizer};
pub use error::{InventoryError, Result};
pub use inventory::{Cell, Column, InventoryRow};
