use super::complexity::{HIGH_MERGE_PERCENTAGE, analyze_complexity};
use super::extraction::{grid_ranges, report};
use crate::datamodel::{CellRecord, CellValue, MergeStrategy, MergeWarning, MergedRange, Sheet};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// Flattens the merged ranges of a sheet into plain cells.
///
/// The input sheet is never modified. Without merges it is handed back as is,
/// otherwise a new sheet without merged ranges is built. Ranges are clipped to
/// the sheet's rows and columns, and short rows are padded so every merged
/// cell inside the grid exists. A `HighComplexity` warning is reported whenever
/// merges cover more than a fifth of the sheet, whatever the strategy.
pub fn resolve<'a>(
    sheet: &'a Sheet,
    strategy: MergeStrategy,
    on_warning: Option<&dyn Fn(MergeWarning)>,
) -> Cow<'a, Sheet> {
    if !sheet.has_merges() {
        return Cow::Borrowed(sheet);
    }

    let ranges = grid_ranges(sheet, on_warning);
    let analysis = analyze_complexity(&ranges, (sheet.row_count(), sheet.column_count()));
    if analysis.merged_cell_percentage > HIGH_MERGE_PERCENTAGE {
        report(
            on_warning,
            MergeWarning::HighComplexity {
                merged_cell_percentage: analysis.merged_cell_percentage,
                total_merge_ranges: analysis.total_merge_ranges,
            },
        );
    }

    debug!(
        "Resolving {} merged ranges of sheet '{}' with strategy {}",
        ranges.len(),
        sheet.sheet_name,
        strategy
    );

    let mut rows = sheet.rows.clone();
    for range in &ranges {
        pad_to(&mut rows, range);
        apply(sheet, &mut rows, range, strategy);
    }

    Cow::Owned(Sheet {
        sheet_name: sheet.sheet_name.clone(),
        column_names: sheet.column_names.clone(),
        rows,
        merged_ranges: BTreeMap::new(),
        header_row_count: sheet.header_row_count,
    })
}

fn pad_to(rows: &mut [Vec<CellRecord>], range: &MergedRange) {
    for row in &mut rows[range.start_row..=range.end_row] {
        if row.len() <= range.end_col {
            row.resize_with(range.end_col + 1, CellRecord::empty);
        }
    }
}

/// Space-joined text of the non-empty cells of a range, row by row.
fn flattened_text(sheet: &Sheet, range: &MergedRange) -> CellValue {
    let parts: Vec<String> = (range.start_row..=range.end_row)
        .flat_map(|row| (range.start_col..=range.end_col).map(move |col| (row, col)))
        .filter_map(|(row, col)| sheet.cell(row, col))
        .filter(|cell| !cell.value.is_blank())
        .map(|cell| cell.value.to_string().trim().to_string())
        .collect();
    if parts.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(parts.join(" "))
    }
}

fn apply(sheet: &Sheet, rows: &mut [Vec<CellRecord>], range: &MergedRange, strategy: MergeStrategy) {
    let top_left = sheet
        .cell(range.start_row, range.start_col)
        .cloned()
        .unwrap_or_else(CellRecord::empty);

    let anchor = match strategy {
        MergeStrategy::ExpandValue
        | MergeStrategy::TreatAsHeader
        | MergeStrategy::KeepTopLeft => top_left.clone(),
        MergeStrategy::FlattenToString => CellRecord::new(flattened_text(sheet, range)),
    };
    let others = match strategy {
        MergeStrategy::ExpandValue | MergeStrategy::TreatAsHeader => top_left,
        MergeStrategy::KeepTopLeft | MergeStrategy::FlattenToString => CellRecord::empty(),
    };

    for row in range.start_row..=range.end_row {
        for col in range.start_col..=range.end_col {
            rows[row][col] = if range.is_top_left(row, col) {
                anchor.clone()
            } else {
                others.clone()
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn total_row_sheet() -> Sheet {
        let mut sheet = Sheet::new(
            "Report",
            vec![vec![
                CellRecord::new(CellValue::text("Total")),
                CellRecord::empty(),
                CellRecord::empty(),
            ]],
        );
        sheet
            .merged_ranges
            .insert("A1:C1".to_string(), MergedRange::new(0, 0, 0, 2).unwrap());
        sheet
    }

    fn values(sheet: &Sheet, row: usize) -> Vec<CellValue> {
        sheet.rows[row].iter().map(|cell| cell.value.clone()).collect()
    }

    #[test]
    fn test_no_merges_returns_input() {
        let sheet = Sheet::new("Plain", vec![vec![CellRecord::new(CellValue::Integer(1))]]);
        let resolved = resolve(&sheet, MergeStrategy::ExpandValue, None);
        assert!(matches!(resolved, Cow::Borrowed(_)));
    }

    #[test]
    fn test_expand_value() {
        let sheet = total_row_sheet();
        let resolved = resolve(&sheet, MergeStrategy::ExpandValue, None);
        assert_eq!(values(&resolved, 0), vec![CellValue::text("Total"); 3]);
        assert!(!resolved.has_merges());
        // input untouched
        assert_eq!(sheet.rows[0][1].value, CellValue::Empty);
        assert!(sheet.has_merges());
    }

    #[test]
    fn test_keep_top_left() {
        let sheet = total_row_sheet();
        let resolved = resolve(&sheet, MergeStrategy::KeepTopLeft, None);
        assert_eq!(
            values(&resolved, 0),
            vec![CellValue::text("Total"), CellValue::Empty, CellValue::Empty]
        );
    }

    #[test]
    fn test_treat_as_header_expands() {
        let sheet = total_row_sheet();
        let resolved = resolve(&sheet, MergeStrategy::TreatAsHeader, None);
        assert_eq!(values(&resolved, 0), vec![CellValue::text("Total"); 3]);
    }

    #[test]
    fn test_flatten_to_string() {
        let mut sheet = Sheet::new(
            "Notes",
            vec![
                vec![
                    CellRecord::new(CellValue::text("Q1")),
                    CellRecord::new(CellValue::Integer(2024)),
                ],
                vec![CellRecord::empty(), CellRecord::new(CellValue::text("draft"))],
            ],
        );
        sheet
            .merged_ranges
            .insert("A1:B2".to_string(), MergedRange::new(0, 0, 1, 1).unwrap());
        let resolved = resolve(&sheet, MergeStrategy::FlattenToString, None);
        assert_eq!(resolved.rows[0][0].value, CellValue::text("Q1 2024 draft"));
        assert_eq!(resolved.rows[0][1].value, CellValue::Empty);
        assert_eq!(resolved.rows[1][1].value, CellValue::Empty);
    }

    #[test]
    fn test_pads_short_rows() {
        let mut sheet = Sheet::new(
            "Ragged",
            vec![
                vec![CellRecord::new(CellValue::text("Region"))],
                vec![
                    CellRecord::new(CellValue::text("North")),
                    CellRecord::new(CellValue::Integer(4)),
                ],
            ],
        );
        sheet
            .merged_ranges
            .insert("A1:B1".to_string(), MergedRange::new(0, 0, 0, 1).unwrap());
        let resolved = resolve(&sheet, MergeStrategy::ExpandValue, None);
        assert_eq!(values(&resolved, 0), vec![CellValue::text("Region"); 2]);
    }

    #[test]
    fn test_ranges_past_the_grid_are_clipped() {
        let warnings = RefCell::new(Vec::new());
        let on_warning = |warning: MergeWarning| warnings.borrow_mut().push(warning);
        let mut sheet = Sheet::new("Short", vec![vec![CellRecord::new(CellValue::text("Region"))]]);
        sheet
            .merged_ranges
            .insert("A1:A200000".to_string(), MergedRange::new(0, 0, 199_999, 0).unwrap());

        let resolved = resolve(&sheet, MergeStrategy::ExpandValue, Some(&on_warning));
        assert_eq!(resolved.row_count(), 1);
        assert_eq!(resolved.rows[0][0].value, CellValue::text("Region"));
        assert!(warnings
            .into_inner()
            .iter()
            .any(|w| matches!(w, MergeWarning::ClippedRange { key, .. } if key == "A1:A200000")));
    }

    #[test]
    fn test_overflowing_range_is_reported_not_resolved() {
        let warnings = RefCell::new(Vec::new());
        let on_warning = |warning: MergeWarning| warnings.borrow_mut().push(warning);
        let mut sheet = total_row_sheet();
        sheet.merged_ranges.insert(
            "A1:A?".to_string(),
            MergedRange {
                start_row: 0,
                start_col: 0,
                end_row: usize::MAX,
                end_col: 0,
            },
        );

        let resolved = resolve(&sheet, MergeStrategy::KeepTopLeft, Some(&on_warning));
        assert_eq!(resolved.row_count(), 1);
        assert_eq!(
            values(&resolved, 0),
            vec![CellValue::text("Total"), CellValue::Empty, CellValue::Empty]
        );
        assert!(warnings
            .into_inner()
            .iter()
            .any(|w| matches!(w, MergeWarning::InvalidRange { key, .. } if key == "A1:A?")));
    }

    #[test]
    fn test_high_complexity_warning() {
        let warnings = RefCell::new(Vec::new());
        let on_warning = |warning: MergeWarning| warnings.borrow_mut().push(warning);

        let sheet = total_row_sheet();
        let resolved = resolve(&sheet, MergeStrategy::KeepTopLeft, Some(&on_warning));
        assert!(!resolved.has_merges());
        let warnings = warnings.into_inner();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            MergeWarning::HighComplexity {
                total_merge_ranges: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_low_complexity_no_warning() {
        let warnings = RefCell::new(0);
        let on_warning = |_: MergeWarning| *warnings.borrow_mut() += 1;
        let mut sheet = Sheet::new(
            "Big",
            (0..10)
                .map(|_| (0..10).map(|_| CellRecord::new(CellValue::Integer(1))).collect())
                .collect(),
        );
        sheet
            .merged_ranges
            .insert("A1:B1".to_string(), MergedRange::new(0, 0, 0, 1).unwrap());
        let _ = resolve(&sheet, MergeStrategy::ExpandValue, Some(&on_warning));
        assert_eq!(warnings.into_inner(), 0);
    }
}
