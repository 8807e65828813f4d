pub mod analysis;
pub mod cell_value;
pub mod currency_info;
pub mod data_type;
pub mod merge;
pub mod normalization;
pub mod sheet;

pub use analysis::{AnomalyIssue, CellAnomaly, ColumnAnalysisResult, Severity};
pub use cell_value::CellValue;
pub use currency_info::{CurrencyConfidence, CurrencyInfo, CurrencyPosition};
pub use data_type::DataType;
pub use merge::{
    ComplexityLevel, MAX_COLUMNS, MAX_ROWS, MergeComplexityAnalysis, MergeOrientation,
    MergeStrategy, MergeWarning, MergedRange,
};
pub use normalization::{DataQualityIssue, DateSystem, NormalizationResult, QualityIssue};
pub use sheet::{CellRecord, Sheet};
