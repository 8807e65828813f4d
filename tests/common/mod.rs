#![allow(dead_code)]

use sheetlens::datamodel::{CellValue, ColumnAnalysisResult};
use sheetlens::infer::ColumnAnalysisService;

pub mod fixtures;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Analyzes a column with the default service and no formats.
pub fn analyze(sample: &[CellValue]) -> ColumnAnalysisResult {
    ColumnAnalysisService::default()
        .analyze(0, "Column", sample, &[])
        .expect("analysis should succeed")
}

/// Analyzes a column where every cell shares one display format.
pub fn analyze_formatted(sample: &[CellValue], format: &str) -> ColumnAnalysisResult {
    let formats = vec![Some(format.to_string()); sample.len()];
    ColumnAnalysisService::default()
        .analyze(0, "Column", sample, &formats)
        .expect("analysis should succeed")
}
