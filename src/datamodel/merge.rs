use crate::error::MergeRangeError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

static CELL_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").expect("Failed to compile cell reference regex")
});

/// Rows available in a worksheet.
pub const MAX_ROWS: usize = 1_048_576;

/// Columns available in a worksheet (`A` to `XFD`).
pub const MAX_COLUMNS: usize = 16_384;

/// Rectangular block of cells sharing one logical value.
/// Bounds are zero-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergedRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrientation {
    Vertical,
    Horizontal,
    Square,
}

impl MergedRange {
    pub fn new(
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<Self, MergeRangeError> {
        if end_row < start_row || end_col < start_col {
            return Err(MergeRangeError::Inverted {
                start_row,
                start_col,
                end_row,
                end_col,
            });
        }
        if end_row >= MAX_ROWS || end_col >= MAX_COLUMNS {
            return Err(MergeRangeError::OutOfBounds { end_row, end_col });
        }
        Ok(Self {
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }

    /// Parses an A1-style reference such as `B2:D4` or `$A$1:$C$1`.
    /// A single cell reference yields a one-cell range.
    pub fn parse_a1(reference: &str) -> Result<Self, MergeRangeError> {
        let reference = reference.trim();
        let (start, end) = match reference.split_once(':') {
            Some((start, end)) => (start, end),
            None => (reference, reference),
        };
        let (start_row, start_col) = parse_cell_reference(start)
            .ok_or_else(|| MergeRangeError::Malformed(reference.to_string()))?;
        let (end_row, end_col) = parse_cell_reference(end)
            .ok_or_else(|| MergeRangeError::Malformed(reference.to_string()))?;
        Self::new(start_row, start_col, end_row, end_col)
    }

    pub fn row_span(&self) -> usize {
        self.end_row.saturating_sub(self.start_row).saturating_add(1)
    }

    pub fn col_span(&self) -> usize {
        self.end_col.saturating_sub(self.start_col).saturating_add(1)
    }

    pub fn cell_count(&self) -> usize {
        self.row_span().saturating_mul(self.col_span())
    }

    /// The part of the range inside a `rows` x `cols` grid, `None` when the
    /// top-left cell lies outside it.
    pub fn clipped_to(&self, rows: usize, cols: usize) -> Option<MergedRange> {
        if self.start_row >= rows || self.start_col >= cols {
            return None;
        }
        Some(MergedRange {
            start_row: self.start_row,
            start_col: self.start_col,
            end_row: self.end_row.min(rows - 1),
            end_col: self.end_col.min(cols - 1),
        })
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }

    pub fn is_top_left(&self, row: usize, col: usize) -> bool {
        row == self.start_row && col == self.start_col
    }

    pub fn orientation(&self) -> MergeOrientation {
        match self.row_span().cmp(&self.col_span()) {
            std::cmp::Ordering::Greater => MergeOrientation::Vertical,
            std::cmp::Ordering::Less => MergeOrientation::Horizontal,
            std::cmp::Ordering::Equal => MergeOrientation::Square,
        }
    }
}

impl fmt::Display for MergedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letters(self.start_col),
            self.start_row.saturating_add(1),
            column_letters(self.end_col),
            self.end_row.saturating_add(1)
        )
    }
}

impl FromStr for MergedRange {
    type Err = MergeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s)
    }
}

fn parse_cell_reference(reference: &str) -> Option<(usize, usize)> {
    let captures = CELL_REFERENCE_REGEX.captures(reference.trim())?;
    let letters = captures.get(1)?.as_str();
    let row: usize = captures.get(2)?.as_str().parse().ok()?;
    if row == 0 {
        return None;
    }
    let col = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize);
    Some((row - 1, col - 1))
}

/// Zero-based column index to spreadsheet letters (`0` -> `A`, `26` -> `AA`).
pub fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// How cells inside a merged range are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Every cell takes the value of the top-left cell.
    ExpandValue,
    /// Only the top-left cell keeps its value.
    KeepTopLeft,
    /// The top-left cell receives the space-joined text of the whole range.
    FlattenToString,
    /// Same rewrite as `ExpandValue`, named for header blocks.
    TreatAsHeader,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MergeStrategy::ExpandValue => "expand",
            MergeStrategy::KeepTopLeft => "keep-top-left",
            MergeStrategy::FlattenToString => "flatten",
            MergeStrategy::TreatAsHeader => "header",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "expand" | "expand-value" | "expandvalue" => Ok(MergeStrategy::ExpandValue),
            "keep-top-left" | "keeptopleft" | "top-left" => Ok(MergeStrategy::KeepTopLeft),
            "flatten" | "flatten-to-string" | "flattentostring" => {
                Ok(MergeStrategy::FlattenToString)
            }
            "header" | "treat-as-header" | "treatasheader" => Ok(MergeStrategy::TreatAsHeader),
            _ => Err(format!("Unknown merge strategy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplexityLevel {
    Simple,
    Complex,
    Chaos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeComplexityAnalysis {
    pub level: ComplexityLevel,
    pub merged_cell_percentage: f64,
    pub recommended_strategy: MergeStrategy,
    pub explanation: String,
    pub vertical_merge_count: usize,
    pub horizontal_merge_count: usize,
    pub total_merge_ranges: usize,
}

/// Non-fatal findings reported while extracting or resolving merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MergeWarning {
    HighComplexity {
        merged_cell_percentage: f64,
        total_merge_ranges: usize,
    },
    InvalidRange {
        key: String,
        reason: String,
    },
    /// The range reaches past the grid and was cut back to it.
    ClippedRange {
        key: String,
        clipped_to: MergedRange,
    },
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeWarning::HighComplexity {
                merged_cell_percentage,
                total_merge_ranges,
            } => write!(
                f,
                "{:.1}% of the sheet is covered by {} merged ranges",
                merged_cell_percentage * 100.0,
                total_merge_ranges
            ),
            MergeWarning::InvalidRange { key, reason } => {
                write!(f, "Invalid merged range '{}': {}", key, reason)
            }
            MergeWarning::ClippedRange { key, clipped_to } => {
                write!(
                    f,
                    "Merged range '{}' extends beyond the sheet, clipped to {}",
                    key, clipped_to
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_ranges() {
        assert!(MergedRange::new(0, 0, 0, 2).is_ok());
        assert!(matches!(
            MergedRange::new(3, 0, 1, 0),
            Err(MergeRangeError::Inverted { .. })
        ));
        assert!(MergedRange::new(0, 4, 0, 3).is_err());
    }

    #[test]
    fn test_parse_a1() {
        assert_eq!(
            MergedRange::parse_a1("B2:D4").unwrap(),
            MergedRange::new(1, 1, 3, 3).unwrap()
        );
        assert_eq!(
            MergedRange::parse_a1("$A$1:$C$1").unwrap(),
            MergedRange::new(0, 0, 0, 2).unwrap()
        );
        assert_eq!(
            MergedRange::parse_a1("aa10").unwrap(),
            MergedRange::new(9, 26, 9, 26).unwrap()
        );
        assert!(matches!(
            MergedRange::parse_a1("A0:B2"),
            Err(MergeRangeError::Malformed(_))
        ));
        assert!(matches!(
            MergedRange::parse_a1("1A:B2"),
            Err(MergeRangeError::Malformed(_))
        ));
        assert!(matches!(
            MergedRange::parse_a1("C3:A1"),
            Err(MergeRangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let range = MergedRange::new(0, 25, 4, 27).unwrap();
        assert_eq!(range.to_string(), "Z1:AB5");
        assert_eq!(MergedRange::from_str("Z1:AB5").unwrap(), range);
    }

    #[test]
    fn test_orientation() {
        assert_eq!(
            MergedRange::new(0, 0, 3, 0).unwrap().orientation(),
            MergeOrientation::Vertical
        );
        assert_eq!(
            MergedRange::new(0, 0, 0, 2).unwrap().orientation(),
            MergeOrientation::Horizontal
        );
        assert_eq!(
            MergedRange::new(0, 0, 1, 1).unwrap().orientation(),
            MergeOrientation::Square
        );
    }

    #[test]
    fn test_geometry() {
        let range = MergedRange::new(1, 1, 2, 3).unwrap();
        assert_eq!(range.cell_count(), 6);
        assert!(range.contains(2, 3));
        assert!(!range.contains(0, 1));
        assert!(range.is_top_left(1, 1));
        assert!(!range.is_top_left(1, 2));
    }

    #[test]
    fn test_merge_strategy_from_str() {
        assert_eq!(
            MergeStrategy::from_str("keep_top_left"),
            Ok(MergeStrategy::KeepTopLeft)
        );
        assert_eq!(MergeStrategy::from_str("Flatten"), Ok(MergeStrategy::FlattenToString));
        assert!(MergeStrategy::from_str("explode").is_err());
        for strategy in [
            MergeStrategy::ExpandValue,
            MergeStrategy::KeepTopLeft,
            MergeStrategy::FlattenToString,
            MergeStrategy::TreatAsHeader,
        ] {
            assert_eq!(MergeStrategy::from_str(&strategy.to_string()), Ok(strategy));
        }
    }

    #[test]
    fn test_new_rejects_cells_past_the_last_worksheet_cell() {
        assert!(MergedRange::new(0, 0, MAX_ROWS - 1, MAX_COLUMNS - 1).is_ok());
        assert!(matches!(
            MergedRange::new(0, 0, usize::MAX, 0),
            Err(MergeRangeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            MergedRange::parse_a1("A1:ZZZ1"),
            Err(MergeRangeError::OutOfBounds { .. })
        ));
        assert!(MergedRange::parse_a1("A1:XFD1048576").is_ok());
    }

    #[test]
    fn test_geometry_saturates() {
        let range = MergedRange {
            start_row: 0,
            start_col: 0,
            end_row: usize::MAX,
            end_col: usize::MAX,
        };
        assert_eq!(range.row_span(), usize::MAX);
        assert_eq!(range.cell_count(), usize::MAX);
        assert_eq!(range.orientation(), MergeOrientation::Square);
    }

    #[test]
    fn test_clipped_to() {
        let range = MergedRange::parse_a1("B2:D200").unwrap();
        assert_eq!(range.clipped_to(10, 3), Some(MergedRange::new(1, 1, 9, 2).unwrap()));
        assert_eq!(range.clipped_to(100, 100), Some(range));
        assert_eq!(range.clipped_to(1, 10), None);
        assert_eq!(range.clipped_to(10, 1), None);
    }
}
