use crate::datamodel::{MergeWarning, MergedRange, Sheet};
use std::collections::BTreeMap;

/// Parses the reader's range keys (`A1:C1`, `$B$2:$B$9`).
///
/// Malformed or inverted references are skipped and reported through
/// `on_warning`, they never abort extraction.
pub fn extract_merged_ranges<I, S>(
    keys: I,
    on_warning: Option<&dyn Fn(MergeWarning)>,
) -> BTreeMap<String, MergedRange>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ranges = BTreeMap::new();
    for key in keys {
        let key = key.as_ref();
        match MergedRange::parse_a1(key) {
            Ok(range) => {
                ranges.insert(key.to_string(), range);
            }
            Err(err) => report(
                on_warning,
                MergeWarning::InvalidRange {
                    key: key.to_string(),
                    reason: err.to_string(),
                },
            ),
        }
    }
    ranges
}

/// Ranges of a sheet that satisfy `end >= start` and stay within the
/// worksheet limits, in key order.
///
/// Deserialized sheets bypass [`MergedRange::new`], so the bounds are checked
/// again here.
pub fn valid_ranges(
    ranges: &BTreeMap<String, MergedRange>,
    on_warning: Option<&dyn Fn(MergeWarning)>,
) -> Vec<MergedRange> {
    ranges
        .iter()
        .filter_map(|(key, range)| validate(key, range, on_warning))
        .collect()
}

/// Valid ranges of a sheet cut back to its rows and columns.
///
/// A range whose top-left cell lies outside the grid is dropped as
/// `InvalidRange`, one reaching past the grid is clipped and reported as
/// `ClippedRange`.
pub fn grid_ranges(sheet: &Sheet, on_warning: Option<&dyn Fn(MergeWarning)>) -> Vec<MergedRange> {
    let (rows, cols) = (sheet.row_count(), sheet.column_count());
    sheet
        .merged_ranges
        .iter()
        .filter_map(|(key, range)| {
            let range = validate(key, range, on_warning)?;
            match range.clipped_to(rows, cols) {
                Some(clipped) => {
                    if clipped != range {
                        report(
                            on_warning,
                            MergeWarning::ClippedRange {
                                key: key.clone(),
                                clipped_to: clipped,
                            },
                        );
                    }
                    Some(clipped)
                }
                None => {
                    report(
                        on_warning,
                        MergeWarning::InvalidRange {
                            key: key.clone(),
                            reason: format!("starts outside the {} x {} sheet", rows, cols),
                        },
                    );
                    None
                }
            }
        })
        .collect()
}

fn validate(
    key: &str,
    range: &MergedRange,
    on_warning: Option<&dyn Fn(MergeWarning)>,
) -> Option<MergedRange> {
    match MergedRange::new(range.start_row, range.start_col, range.end_row, range.end_col) {
        Ok(range) => Some(range),
        Err(err) => {
            report(
                on_warning,
                MergeWarning::InvalidRange {
                    key: key.to_string(),
                    reason: err.to_string(),
                },
            );
            None
        }
    }
}

pub(crate) fn report(on_warning: Option<&dyn Fn(MergeWarning)>, warning: MergeWarning) {
    if let Some(callback) = on_warning {
        callback(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{CellRecord, CellValue};
    use std::cell::RefCell;

    #[test]
    fn test_extract_reports_invalid_keys() {
        let warnings = RefCell::new(Vec::new());
        let on_warning = |warning: MergeWarning| warnings.borrow_mut().push(warning);
        let ranges = extract_merged_ranges(["A1:C1", "nonsense", "C3:A1", "$B$2:$B$4"], Some(&on_warning));

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges["A1:C1"], MergedRange::new(0, 0, 0, 2).unwrap());
        assert_eq!(ranges["$B$2:$B$4"], MergedRange::new(1, 1, 3, 1).unwrap());

        let warnings = warnings.into_inner();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(&warnings[0], MergeWarning::InvalidRange { key, .. } if key == "nonsense"));
        assert!(matches!(&warnings[1], MergeWarning::InvalidRange { key, .. } if key == "C3:A1"));
    }

    #[test]
    fn test_extract_without_callback() {
        let ranges = extract_merged_ranges(vec!["A1:A3".to_string(), "??".to_string()], None);
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_valid_ranges_drops_inverted() {
        let mut ranges = BTreeMap::new();
        ranges.insert("A1:B1".to_string(), MergedRange::new(0, 0, 0, 1).unwrap());
        ranges.insert(
            "bad".to_string(),
            MergedRange {
                start_row: 4,
                start_col: 0,
                end_row: 2,
                end_col: 0,
            },
        );
        let warnings = RefCell::new(0);
        let on_warning = |_: MergeWarning| *warnings.borrow_mut() += 1;
        let valid = valid_ranges(&ranges, Some(&on_warning));
        assert_eq!(valid, vec![MergedRange::new(0, 0, 0, 1).unwrap()]);
        assert_eq!(warnings.into_inner(), 1);
    }

    #[test]
    fn test_valid_ranges_drops_out_of_bounds() {
        let mut ranges = BTreeMap::new();
        ranges.insert(
            "huge".to_string(),
            MergedRange {
                start_row: 0,
                start_col: 0,
                end_row: usize::MAX,
                end_col: 0,
            },
        );
        let warnings = RefCell::new(Vec::new());
        let on_warning = |warning: MergeWarning| warnings.borrow_mut().push(warning);
        assert!(valid_ranges(&ranges, Some(&on_warning)).is_empty());
        assert!(matches!(
            &warnings.into_inner()[..],
            [MergeWarning::InvalidRange { key, .. }] if key == "huge"
        ));
    }

    #[test]
    fn test_grid_ranges_clip_to_sheet() {
        let mut sheet = Sheet::new(
            "Small",
            vec![vec![
                CellRecord::new(CellValue::text("Title")),
                CellRecord::empty(),
            ]],
        );
        sheet.merged_ranges = extract_merged_ranges(["A1:XFD1048576", "C5:D6"], None);

        let warnings = RefCell::new(Vec::new());
        let on_warning = |warning: MergeWarning| warnings.borrow_mut().push(warning);
        let ranges = grid_ranges(&sheet, Some(&on_warning));

        assert_eq!(ranges, vec![MergedRange::new(0, 0, 0, 1).unwrap()]);
        let warnings = warnings.into_inner();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| matches!(
            w,
            MergeWarning::ClippedRange { key, clipped_to }
                if key == "A1:XFD1048576" && clipped_to.to_string() == "A1:B1"
        )));
        assert!(warnings.iter().any(|w| matches!(
            w,
            MergeWarning::InvalidRange { key, .. } if key == "C5:D6"
        )));
    }
}
