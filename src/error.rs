use serde::Serialize;
use thiserror::Error;

/// Errors raised when a caller hands the analysis services malformed input.
///
/// Data-quality defects are never reported through this type, they travel as
/// anomalies and normalization results.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum AnalysisError {
    /// The sample and its display formats must line up cell by cell
    #[error("Column {column_index}: {formats} number formats supplied for {cells} sample cells")]
    FormatCountMismatch {
        column_index: usize,
        cells: usize,
        formats: usize,
    },

    /// Cancellation was requested before the unit of work started
    #[error("Analysis cancelled before {unit}")]
    Cancelled { unit: String },

    /// Enrichment of a single column failed, the sheet carries on
    #[error("Column {column_index} ('{column_name}') could not be analyzed: {details}")]
    ColumnFailed {
        column_index: usize,
        column_name: String,
        details: String,
    },
}

/// Errors raised while building a merged range from reader input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeRangeError {
    #[error("Malformed range reference: '{0}'")]
    Malformed(String),

    #[error(
        "Range ends before it starts: rows {start_row}..={end_row}, columns {start_col}..={end_col}"
    )]
    Inverted {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    },

    #[error("Range ends past the last worksheet cell: row {end_row}, column {end_col}")]
    OutOfBounds { end_row: usize, end_col: usize },
}

/// Invalid value found in the configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {key}: {message}")]
pub struct ConfigValueError {
    pub key: &'static str,
    pub message: String,
}

/// A serial number that does not map onto a calendar date.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerialDateError {
    #[error("Serial date {0} is outside the supported range")]
    OutOfRange(f64),

    #[error("Serial date does not map to a valid calendar date")]
    InvalidCalendarDate,
}
