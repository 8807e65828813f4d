//! Merged-cell handling: range extraction, complexity scoring and resolution.

pub mod complexity;
pub mod extraction;
pub mod resolver;

pub use complexity::{HIGH_MERGE_PERCENTAGE, analyze_complexity, analyze_sheet_complexity};
pub use extraction::{extract_merged_ranges, grid_ranges, valid_ranges};
pub use resolver::resolve;
