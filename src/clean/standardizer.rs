//! Inventory Standardizer Module
//! Deduplication, text normalization, category consolidation, missing-value
//! fill and description sanitization, applied in that order.

use crate::clean::labels::{repair_label, title_case};
use crate::error::Result;
use crate::inventory::{
    rows_from_frame, rows_to_frame, Cell, Column, InventoryRow, NO_DESCRIPTION,
    UNKNOWN_FUNCTIONAL_CATEGORY, UNKNOWN_TECHNOLOGY_CATEGORY,
};
use polars::prelude::DataFrame;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

// Anything that is not a word character, whitespace, comma, period or hyphen
static DESCRIPTION_STRIP_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_description_strip_regex() -> &'static Regex {
    DESCRIPTION_STRIP_REGEX.get_or_init(|| {
        Regex::new(r"[^\w\s,.\-]").expect("Failed to compile description regex")
    })
}

/// Summary of one standardization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardizeReport {
    pub rows_in: usize,
    pub duplicates_removed: usize,
    pub rows_out: usize,
    /// Placeholder substitutions per column header.
    pub placeholders: BTreeMap<String, usize>,
}

impl StandardizeReport {
    pub fn total_placeholders(&self) -> usize {
        self.placeholders.values().sum()
    }
}

/// Drop rows that exactly repeat an earlier row, keeping first occurrences in order.
///
/// Returns the surviving rows and the number removed.
pub fn deduplicate(rows: Vec<InventoryRow>) -> (Vec<InventoryRow>, usize) {
    let before = rows.len();
    let mut seen: HashSet<InventoryRow> = HashSet::with_capacity(before);
    let unique: Vec<InventoryRow> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();
    let removed = before - unique.len();
    (unique, removed)
}

/// Trim and title-case a name or producer. Non-text values become empty.
pub fn normalize_name(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(title_case(s.trim())),
        _ => Cell::Empty,
    }
}

/// Repair every text label in `columns` and keep the longest.
///
/// Ties go to the first column. Non-text and empty cells are skipped.
fn longest_label(row: &InventoryRow, columns: &[Column]) -> Option<String> {
    columns
        .iter()
        .filter_map(|&column| row.get(column).as_text())
        .filter_map(|text| repair_label(Some(text)))
        .fold(None, |best: Option<String>, label| match best {
            Some(b) if b.chars().count() >= label.chars().count() => Some(b),
            _ => Some(label),
        })
}

/// Consolidated value for the three technology category columns.
pub fn longest_tech_category(row: &InventoryRow) -> String {
    longest_label(row, &Column::TECH_CATEGORIES)
        .unwrap_or_else(|| UNKNOWN_TECHNOLOGY_CATEGORY.to_string())
}

/// Consolidated value for the two functional category columns.
pub fn longest_functional_category(row: &InventoryRow) -> String {
    longest_label(row, &Column::FUNCTIONAL_CATEGORIES)
        .unwrap_or_else(|| UNKNOWN_FUNCTIONAL_CATEGORY.to_string())
}

/// Strip disallowed characters from a description.
pub fn clean_description(cell: &Cell) -> String {
    let Some(text) = cell.as_text() else {
        return NO_DESCRIPTION.to_string();
    };

    let cleaned = get_description_strip_regex().replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Store whole-number readiness levels as integers.
///
/// Spreadsheet readers hand back `4.0` for a cell showing `4`; integral
/// floats and integer text become `Cell::Int`, anything else is kept.
pub fn normalize_trl(cell: &Cell) -> Cell {
    match cell {
        Cell::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Cell::Int(*v as i64),
        Cell::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Cell::Int)
            .unwrap_or_else(|_| cell.clone()),
        other => other.clone(),
    }
}

/// Handles inventory standardization.
pub struct Standardizer;

impl Standardizer {
    /// Run the full pipeline over a set of rows.
    pub fn standardize(rows: Vec<InventoryRow>) -> (Vec<InventoryRow>, StandardizeReport) {
        let mut report = StandardizeReport {
            rows_in: rows.len(),
            ..Default::default()
        };

        let (mut rows, removed) = deduplicate(rows);
        report.duplicates_removed = removed;
        debug!(removed, remaining = rows.len(), "Removed duplicate rows");

        for row in rows.iter_mut() {
            Self::normalize_text(row);
            Self::consolidate_categories(row);
            Self::fill_missing(row, &mut report.placeholders);
            row.description = Cell::Text(clean_description(&row.description));
        }

        report.rows_out = rows.len();
        if rows.is_empty() {
            warn!("Inventory contains no rows after deduplication");
        }
        info!(
            rows_in = report.rows_in,
            duplicates_removed = report.duplicates_removed,
            rows_out = report.rows_out,
            placeholders = report.total_placeholders(),
            "Standardized inventory"
        );

        (rows, report)
    }

    /// Run the pipeline over a polars frame holding the Inventory columns.
    pub fn standardize_frame(df: &DataFrame) -> Result<(DataFrame, StandardizeReport)> {
        let rows = rows_from_frame(df)?;
        let (rows, report) = Self::standardize(rows);
        Ok((rows_to_frame(&rows)?, report))
    }

    fn normalize_text(row: &mut InventoryRow) {
        row.technology_name = normalize_name(&row.technology_name);
        row.tech_producer = normalize_name(&row.tech_producer);
    }

    // A group with no usable label is left empty so the fill step supplies
    // (and counts) its placeholder.
    fn consolidate_categories(row: &mut InventoryRow) {
        let groups: [&[Column]; 2] = [&Column::TECH_CATEGORIES, &Column::FUNCTIONAL_CATEGORIES];
        for group in groups {
            let value: Cell = longest_label(row, group).into();
            for &column in group {
                row.set(column, value.clone());
            }
        }
    }

    fn fill_missing(row: &mut InventoryRow, counts: &mut BTreeMap<String, usize>) {
        for column in Column::ALL {
            if row.get(column).is_missing() {
                row.set(column, column.placeholder());
                *counts.entry(column.header().to_string()).or_insert(0) += 1;
            }
        }
        row.trl = normalize_trl(&row.trl);
    }
}

/// Standardize rows, discarding the report.
pub fn standardize(rows: Vec<InventoryRow>) -> Vec<InventoryRow> {
    Standardizer::standardize(rows).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, category: [Option<&str>; 3]) -> InventoryRow {
        let mut row = InventoryRow::default();
        row.technology_name = Cell::text(name);
        row.level_one_category = category[0].into();
        row.level_two_category = category[1].into();
        row.level_three_category = category[2].into();
        row
    }

    #[test]
    fn deduplicate_keeps_first_in_order() {
        let a = row("a", [Some("X"), None, None]);
        let b = row("b", [None, None, None]);
        let (rows, removed) = deduplicate(vec![a.clone(), a.clone(), b.clone(), a.clone()]);
        assert_eq!(rows, vec![a, b]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn deduplicate_is_exact() {
        let a = row("a", [None, None, None]);
        let upper = row("A", [None, None, None]);
        let (rows, removed) = deduplicate(vec![a, upper]);
        assert_eq!(rows.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn names_are_trimmed_and_title_cased() {
        assert_eq!(normalize_name(&Cell::text("  mars rover ")), Cell::text("Mars Rover"));
        assert_eq!(normalize_name(&Cell::Int(12)), Cell::Empty);
        assert_eq!(normalize_name(&Cell::Empty), Cell::Empty);
    }

    #[test]
    fn longest_category_wins() {
        let r = row("x", [Some("a:1"), Some("bb:22"), None]);
        assert_eq!(longest_tech_category(&r), "Bb");
    }

    #[test]
    fn category_tie_goes_to_first_column() {
        let r = row("x", [Some("ab: one"), Some("cd: two"), Some("ef: three")]);
        assert_eq!(longest_tech_category(&r), "Ab");
    }

    #[test]
    fn non_text_categories_are_skipped() {
        let mut r = row("x", [None, None, None]);
        r.level_one_category = Cell::Int(1234567);
        r.level_two_category = Cell::text("tx01");
        assert_eq!(longest_tech_category(&r), "Tx01");
    }

    #[test]
    fn category_fallbacks() {
        let r = row("x", [None, None, None]);
        assert_eq!(longest_tech_category(&r), UNKNOWN_TECHNOLOGY_CATEGORY);
        assert_eq!(longest_functional_category(&r), UNKNOWN_FUNCTIONAL_CATEGORY);
    }

    #[test]
    fn description_symbols_are_stripped() {
        assert_eq!(
            clean_description(&Cell::text("Valid, text! With #symbols & stuff.")),
            "Valid, text With symbols  stuff."
        );
        assert_eq!(
            clean_description(&Cell::text("  low-mass_arm, v2.0 ")),
            "low-mass_arm, v2.0"
        );
    }

    #[test]
    fn description_fallbacks() {
        assert_eq!(clean_description(&Cell::Float(3.5)), NO_DESCRIPTION);
        assert_eq!(clean_description(&Cell::Empty), NO_DESCRIPTION);
        assert_eq!(clean_description(&Cell::text("!!! ###")), NO_DESCRIPTION);
    }

    #[test]
    fn description_keeps_unicode_word_characters() {
        assert_eq!(clean_description(&Cell::text("Détecteur µm")), "Détecteur µm");
    }

    #[test]
    fn trl_normalization() {
        assert_eq!(normalize_trl(&Cell::Float(6.0)), Cell::Int(6));
        assert_eq!(normalize_trl(&Cell::Float(6.5)), Cell::Float(6.5));
        assert_eq!(normalize_trl(&Cell::text(" 7 ")), Cell::Int(7));
        assert_eq!(normalize_trl(&Cell::text("high")), Cell::text("high"));
    }

    #[test]
    fn pipeline_fills_every_field() {
        let (rows, report) = Standardizer::standardize(vec![InventoryRow::default()]);
        let r = &rows[0];
        for column in Column::ALL {
            assert!(!r.get(column).is_missing(), "{} left empty", column.header());
        }
        assert_eq!(r.trl, Cell::Int(0));
        assert_eq!(r.technology_name, Cell::text("Unknown Technology Name"));
        assert_eq!(r.level_three_category, Cell::text(UNKNOWN_TECHNOLOGY_CATEGORY));
        assert_eq!(report.rows_out, 1);
        assert_eq!(report.total_placeholders(), 10);
        assert_eq!(report.placeholders["TRL"], 1);
    }

    #[test]
    fn whitespace_categories_fall_back_to_placeholder() {
        let r = row("x", [Some("  "), None, None]);
        let rows = standardize(vec![r]);
        assert_eq!(rows[0].level_one_category, Cell::text(UNKNOWN_TECHNOLOGY_CATEGORY));
    }

    #[test]
    fn report_counts_duplicates() {
        let a = row("a", [None, None, None]);
        let (_, report) = Standardizer::standardize(vec![a.clone(), a]);
        assert_eq!(report.rows_in, 2);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.rows_out, 1);
    }
}
