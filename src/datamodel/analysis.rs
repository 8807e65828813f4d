use super::{CellValue, CurrencyInfo, DataType};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Flat confidence penalty applied once per anomaly of this severity.
    pub fn confidence_penalty(self) -> f64 {
        match self {
            Severity::Info => 0.0,
            Severity::Warning => 0.02,
            Severity::Error => 0.05,
            Severity::Critical => 0.10,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyIssue {
    TypeMismatch,
    FormulaError,
    InconsistentFormat,
    MissingRequired,
    OutOfRange,
}

impl AnomalyIssue {
    pub fn default_severity(self) -> Severity {
        match self {
            AnomalyIssue::TypeMismatch => Severity::Error,
            AnomalyIssue::FormulaError => Severity::Warning,
            AnomalyIssue::InconsistentFormat => Severity::Warning,
            AnomalyIssue::MissingRequired => Severity::Warning,
            AnomalyIssue::OutOfRange => Severity::Error,
        }
    }
}

impl fmt::Display for AnomalyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnomalyIssue::TypeMismatch => "TypeMismatch",
            AnomalyIssue::FormulaError => "FormulaError",
            AnomalyIssue::InconsistentFormat => "InconsistentFormat",
            AnomalyIssue::MissingRequired => "MissingRequired",
            AnomalyIssue::OutOfRange => "OutOfRange",
        };
        write!(f, "{}", s)
    }
}

/// A local data-quality defect found in one cell of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAnomaly {
    pub row_index: usize,
    pub cell_value: CellValue,
    pub issue: AnomalyIssue,
    pub expected_type: DataType,
    pub actual_type: DataType,
    pub message: String,
    pub severity: Severity,
    /// Most frequent type among the neighbouring cells, when one exists.
    /// Recorded for callers, it does not change `severity`.
    #[serde(default)]
    pub local_context: Option<DataType>,
}

/// Outcome of analysing one column sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAnalysisResult {
    pub column_index: usize,
    pub column_name: String,
    pub detected_type: DataType,
    pub type_confidence: f64,
    pub currency: Option<CurrencyInfo>,
    pub type_distribution: BTreeMap<DataType, usize>,
    pub sample_values: Vec<CellValue>,
    pub anomalies: Vec<CellAnomaly>,
}

impl ColumnAnalysisResult {
    /// Result for a column without any sampled cell.
    pub fn empty(column_index: usize, column_name: impl Into<String>) -> Self {
        Self {
            column_index,
            column_name: column_name.into(),
            detected_type: DataType::Unknown,
            type_confidence: 0.0,
            currency: None,
            type_distribution: BTreeMap::new(),
            sample_values: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    pub fn count_of(&self, data_type: DataType) -> usize {
        self.type_distribution
            .get(&data_type)
            .copied()
            .unwrap_or(0)
    }

    pub fn anomalies_with(&self, issue: AnomalyIssue) -> impl Iterator<Item = &CellAnomaly> {
        self.anomalies.iter().filter(move |a| a.issue == issue)
    }
}
