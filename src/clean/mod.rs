//! Clean module - inventory standardization pipeline

mod labels;
mod standardizer;

pub use labels::{repair_label, title_case};
pub use standardizer::{
    clean_description, deduplicate, longest_functional_category, longest_tech_category,
    normalize_name, normalize_trl, standardize, StandardizeReport, Standardizer,
};
