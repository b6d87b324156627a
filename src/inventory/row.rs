//! Inventory Row Model
//! Row records and cell values for the "Inventory" sheet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single spreadsheet cell.
///
/// NaN is never stored: `Cell::from_f64` maps it to `Empty`, so "absent" and
/// "NaN" are one state and compare equal during deduplication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Cell::Empty
        } else {
            Cell::Float(value)
        }
    }

    /// Text payload, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for empty cells and for text that holds nothing but whitespace.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Int(_) | Cell::Float(_))
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Empty, Cell::Empty) => true,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a.to_bits() == b.to_bits(),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Empty => {}
            Cell::Bool(b) => b.hash(state),
            Cell::Int(i) => i.hash(state),
            Cell::Float(f) => f.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_f64(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Inventory sheet columns, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    TechnologyName,
    TechProducer,
    Description,
    ExistingTechnology,
    LevelOneCategory,
    LevelTwoCategory,
    LevelThreeCategory,
    Trl,
    LevelOneFunctionalCategory,
    LevelTwoFunctionalCategory,
}

pub const UNKNOWN_TECHNOLOGY_NAME: &str = "Unknown Technology Name";
pub const UNKNOWN_TECH_PRODUCER: &str = "Unknown Tech Producer";
pub const NO_DESCRIPTION: &str = "No Description Available";
pub const UNKNOWN_EXISTING_TECHNOLOGY: &str = "Unknown Existing Technology";
pub const UNKNOWN_TECHNOLOGY_CATEGORY: &str = "Unknown Technology Category";
pub const UNKNOWN_FUNCTIONAL_CATEGORY: &str = "Unknown Functional Category";

impl Column {
    pub const ALL: [Column; 10] = [
        Column::TechnologyName,
        Column::TechProducer,
        Column::Description,
        Column::ExistingTechnology,
        Column::LevelOneCategory,
        Column::LevelTwoCategory,
        Column::LevelThreeCategory,
        Column::Trl,
        Column::LevelOneFunctionalCategory,
        Column::LevelTwoFunctionalCategory,
    ];

    /// Technology category columns, in tie-break order.
    pub const TECH_CATEGORIES: [Column; 3] = [
        Column::LevelOneCategory,
        Column::LevelTwoCategory,
        Column::LevelThreeCategory,
    ];

    /// Functional category columns, in tie-break order.
    pub const FUNCTIONAL_CATEGORIES: [Column; 2] = [
        Column::LevelOneFunctionalCategory,
        Column::LevelTwoFunctionalCategory,
    ];

    /// Header text as it appears in the spreadsheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::TechnologyName => "Technology Name",
            Column::TechProducer => "Tech Producer",
            Column::Description => "Description",
            Column::ExistingTechnology => "Existing Technology",
            Column::LevelOneCategory => "Level One Category",
            Column::LevelTwoCategory => "Level Two Category",
            Column::LevelThreeCategory => "Level Three Category",
            Column::Trl => "TRL",
            Column::LevelOneFunctionalCategory => "Level One Functional Category",
            Column::LevelTwoFunctionalCategory => "Level Two Functional Category",
        }
    }

    /// Value substituted when the column is still missing after cleaning.
    pub fn placeholder(self) -> Cell {
        let text = match self {
            Column::TechnologyName => UNKNOWN_TECHNOLOGY_NAME,
            Column::TechProducer => UNKNOWN_TECH_PRODUCER,
            Column::Description => NO_DESCRIPTION,
            Column::ExistingTechnology => UNKNOWN_EXISTING_TECHNOLOGY,
            Column::LevelOneCategory | Column::LevelTwoCategory | Column::LevelThreeCategory => {
                UNKNOWN_TECHNOLOGY_CATEGORY
            }
            Column::Trl => return Cell::Int(0),
            Column::LevelOneFunctionalCategory | Column::LevelTwoFunctionalCategory => {
                UNKNOWN_FUNCTIONAL_CATEGORY
            }
        };
        Cell::text(text)
    }
}

/// One record of the Inventory sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryRow {
    #[serde(rename = "Technology Name")]
    pub technology_name: Cell,
    #[serde(rename = "Tech Producer")]
    pub tech_producer: Cell,
    #[serde(rename = "Description")]
    pub description: Cell,
    #[serde(rename = "Existing Technology")]
    pub existing_technology: Cell,
    #[serde(rename = "Level One Category")]
    pub level_one_category: Cell,
    #[serde(rename = "Level Two Category")]
    pub level_two_category: Cell,
    #[serde(rename = "Level Three Category")]
    pub level_three_category: Cell,
    #[serde(rename = "TRL")]
    pub trl: Cell,
    #[serde(rename = "Level One Functional Category")]
    pub level_one_functional_category: Cell,
    #[serde(rename = "Level Two Functional Category")]
    pub level_two_functional_category: Cell,
}

impl InventoryRow {
    pub fn get(&self, column: Column) -> &Cell {
        match column {
            Column::TechnologyName => &self.technology_name,
            Column::TechProducer => &self.tech_producer,
            Column::Description => &self.description,
            Column::ExistingTechnology => &self.existing_technology,
            Column::LevelOneCategory => &self.level_one_category,
            Column::LevelTwoCategory => &self.level_two_category,
            Column::LevelThreeCategory => &self.level_three_category,
            Column::Trl => &self.trl,
            Column::LevelOneFunctionalCategory => &self.level_one_functional_category,
            Column::LevelTwoFunctionalCategory => &self.level_two_functional_category,
        }
    }

    pub fn get_mut(&mut self, column: Column) -> &mut Cell {
        match column {
            Column::TechnologyName => &mut self.technology_name,
            Column::TechProducer => &mut self.tech_producer,
            Column::Description => &mut self.description,
            Column::ExistingTechnology => &mut self.existing_technology,
            Column::LevelOneCategory => &mut self.level_one_category,
            Column::LevelTwoCategory => &mut self.level_two_category,
            Column::LevelThreeCategory => &mut self.level_three_category,
            Column::Trl => &mut self.trl,
            Column::LevelOneFunctionalCategory => &mut self.level_one_functional_category,
            Column::LevelTwoFunctionalCategory => &mut self.level_two_functional_category,
        }
    }

    pub fn set(&mut self, column: Column, value: Cell) {
        *self.get_mut(column) = value;
    }

    /// Build a row from cells given in `Column::ALL` order.
    pub fn from_cells(cells: [Cell; 10]) -> Self {
        let mut row = InventoryRow::default();
        for (column, cell) in Column::ALL.into_iter().zip(cells) {
            row.set(column, cell);
        }
        row
    }

    pub fn is_blank(&self) -> bool {
        Column::ALL.iter().all(|&c| matches!(self.get(c), Cell::Empty))
    }
}
