//! Header-row heuristic for sheets whose reader could not tell where the
//! header ends.

use crate::datamodel::{CellRecord, CellValue};
use crate::parsing::number::parse_number;
use serde::{Deserialize, Serialize};

const NUMERIC_ROWS_PROBED: usize = 3;
const NUMERIC_RATIO_NO_HEADER: f64 = 0.70;
const HEADER_ROWS_SCANNED: usize = 5;
const TEXT_RATIO_HEADER: f64 = 0.60;

/// Header rows declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRegion {
    pub first_row: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderDetection {
    pub first_header_row: usize,
    pub header_row_count: usize,
    pub confidence: f64,
}

impl HeaderDetection {
    /// First row holding data.
    pub fn data_start_row(&self) -> usize {
        self.first_header_row + self.header_row_count
    }

    pub fn has_header(&self) -> bool {
        self.header_row_count > 0
    }
}

fn is_numeric_cell(value: &CellValue) -> bool {
    match value {
        CellValue::Integer(_) | CellValue::FloatingPoint(_) => true,
        CellValue::Text(text) => parse_number(text).is_some(),
        _ => false,
    }
}

fn is_text_cell(value: &CellValue) -> bool {
    matches!(value, CellValue::Text(_)) && !value.is_blank() && !is_numeric_cell(value)
}

fn is_blank_row(row: &[CellRecord]) -> bool {
    row.iter().all(|cell| cell.value.is_blank())
}

/// Share of the non-blank cells of `rows` matching `predicate`.
fn ratio<'a, I, P>(rows: I, predicate: P) -> f64
where
    I: IntoIterator<Item = &'a Vec<CellRecord>>,
    P: Fn(&CellValue) -> bool,
{
    let (matching, filled) = rows
        .into_iter()
        .flatten()
        .filter(|cell| !cell.value.is_blank())
        .fold((0_usize, 0_usize), |(matching, filled), cell| {
            (matching + usize::from(predicate(&cell.value)), filled + 1)
        });
    if filled == 0 {
        0.0
    } else {
        matching as f64 / filled as f64
    }
}

fn is_header_like(row: &Vec<CellRecord>) -> bool {
    !is_blank_row(row) && ratio(std::iter::once(row), is_text_cell) >= TEXT_RATIO_HEADER
}

/// Locates the header rows of a grid.
///
/// A caller-declared region is trusted as is. Otherwise leading blank rows
/// are skipped, mostly numeric leading rows mean there is no header, and the
/// first text-heavy row within the first few rows becomes the header (two rows
/// when the next one is text-heavy too).
pub fn detect_headers(rows: &[Vec<CellRecord>], region: Option<HeaderRegion>) -> HeaderDetection {
    if let Some(region) = region {
        return HeaderDetection {
            first_header_row: region.first_row,
            header_row_count: region.row_count,
            confidence: 1.0,
        };
    }

    let Some(first) = rows.iter().position(|row| !is_blank_row(row)) else {
        return HeaderDetection {
            first_header_row: 0,
            header_row_count: 0,
            confidence: 0.0,
        };
    };

    let leading = rows[first..]
        .iter()
        .filter(|row| !is_blank_row(row))
        .take(NUMERIC_ROWS_PROBED);
    if ratio(leading, is_numeric_cell) >= NUMERIC_RATIO_NO_HEADER {
        return HeaderDetection {
            first_header_row: first,
            header_row_count: 0,
            confidence: 0.3,
        };
    }

    let scan_end = (first + HEADER_ROWS_SCANNED).min(rows.len());
    if let Some(candidate) = (first..scan_end).find(|&index| is_header_like(&rows[index])) {
        let two_rows = rows.get(candidate + 1).is_some_and(is_header_like);
        return HeaderDetection {
            first_header_row: candidate,
            header_row_count: if two_rows { 2 } else { 1 },
            confidence: if two_rows { 0.7 } else { 0.8 },
        };
    }

    HeaderDetection {
        first_header_row: first,
        header_row_count: 1,
        confidence: 0.5,
    }
}
