use super::extraction::grid_ranges;
use crate::datamodel::{
    ComplexityLevel, MergeComplexityAnalysis, MergeOrientation, MergeStrategy, MergedRange, Sheet,
};

/// Share of the bounding box above which a sheet is considered heavily merged.
pub const HIGH_MERGE_PERCENTAGE: f64 = 0.20;

/// Ranges needed, together with a high merge share, for `Chaos`.
pub const CHAOS_MIN_RANGES: usize = 5;

/// Rows and columns covering both the grid and every range.
pub fn bounding_box(ranges: &[MergedRange], extent: (usize, usize)) -> (usize, usize) {
    ranges
        .iter()
        .fold(extent, |(rows, cols), range| {
            (
                rows.max(range.end_row.saturating_add(1)),
                cols.max(range.end_col.saturating_add(1)),
            )
        })
}

/// Classifies how hard the merges of a grid are to flatten.
///
/// `extent` is the `(rows, columns)` size of the grid.
pub fn analyze_complexity(
    ranges: &[MergedRange],
    extent: (usize, usize),
) -> MergeComplexityAnalysis {
    let (rows, cols) = bounding_box(ranges, extent);
    let box_cells = rows.saturating_mul(cols);
    let merged_cells = ranges
        .iter()
        .map(MergedRange::cell_count)
        .fold(0_usize, usize::saturating_add);
    let merged_cell_percentage = if box_cells == 0 {
        0.0
    } else {
        (merged_cells as f64 / box_cells as f64).min(1.0)
    };

    let vertical_merge_count = ranges
        .iter()
        .filter(|range| range.orientation() == MergeOrientation::Vertical)
        .count();
    let horizontal_merge_count = ranges
        .iter()
        .filter(|range| range.orientation() == MergeOrientation::Horizontal)
        .count();
    let total_merge_ranges = ranges.len();

    let (level, recommended_strategy, explanation) = if merged_cell_percentage
        > HIGH_MERGE_PERCENTAGE
        && total_merge_ranges >= CHAOS_MIN_RANGES
    {
        (
            ComplexityLevel::Chaos,
            MergeStrategy::KeepTopLeft,
            format!(
                "{} merged ranges cover {:.1}% of the sheet, only top-left values are kept",
                total_merge_ranges,
                merged_cell_percentage * 100.0
            ),
        )
    } else if vertical_merge_count > 2 * horizontal_merge_count {
        (
            ComplexityLevel::Complex,
            MergeStrategy::KeepTopLeft,
            format!(
                "Vertical merges dominate ({} vertical, {} horizontal), repeated values would distort columns",
                vertical_merge_count, horizontal_merge_count
            ),
        )
    } else if vertical_merge_count > 0 {
        (
            ComplexityLevel::Complex,
            MergeStrategy::ExpandValue,
            format!(
                "{} vertical merges among {} ranges, values are expanded",
                vertical_merge_count, total_merge_ranges
            ),
        )
    } else {
        (
            ComplexityLevel::Simple,
            MergeStrategy::ExpandValue,
            format!("{} horizontal or single-cell merges", total_merge_ranges),
        )
    };

    MergeComplexityAnalysis {
        level,
        merged_cell_percentage,
        recommended_strategy,
        explanation,
        vertical_merge_count,
        horizontal_merge_count,
        total_merge_ranges,
    }
}

/// Complexity of the merges declared on a sheet, clipped to its grid.
/// Invalid ranges are ignored.
pub fn analyze_sheet_complexity(sheet: &Sheet) -> MergeComplexityAnalysis {
    let ranges = grid_ranges(sheet, None);
    analyze_complexity(&ranges, (sheet.row_count(), sheet.column_count()))
}
