use super::{CellValue, DataType, Severity};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Workbook date system used to interpret serial date values.
///
/// - `Date1900` is the Windows default and carries the fictitious 1900-02-29.
/// - `Date1904` is the legacy Mac default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateSystem {
    #[default]
    #[serde(rename = "1900")]
    Date1900,
    #[serde(rename = "1904")]
    Date1904,
}

impl FromStr for DateSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1900" | "date1900" | "excel1900" => Ok(DateSystem::Date1900),
            "1904" | "date1904" | "excel1904" => Ok(DateSystem::Date1904),
            _ => Err(format!("Unknown date system: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataQualityIssue {
    /// Text needed trimming, line-ending or invisible-character cleanup.
    ExtraWhitespace,
    /// Serial date outside the range a workbook can represent.
    OutOfRange,
    /// Numeric value that cannot be represented (NaN, infinities).
    InvalidNumber,
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataQualityIssue::ExtraWhitespace => "ExtraWhitespace",
            DataQualityIssue::OutOfRange => "OutOfRange",
            DataQualityIssue::InvalidNumber => "InvalidNumber",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub issue: DataQualityIssue,
    pub severity: Severity,
}

/// Canonical form of one cell, or the reason it could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub original: CellValue,
    pub cleaned: Option<CellValue>,
    pub detected_type: DataType,
    pub success: bool,
    pub quality_issue: Option<QualityIssue>,
    pub error_message: Option<String>,
}

impl NormalizationResult {
    /// The distinguished result for an empty cell. Not a failure.
    pub fn empty() -> Self {
        Self {
            original: CellValue::Empty,
            cleaned: Some(CellValue::Empty),
            detected_type: DataType::Unknown,
            success: true,
            quality_issue: None,
            error_message: None,
        }
    }

    pub fn success(original: CellValue, cleaned: CellValue, detected_type: DataType) -> Self {
        Self {
            original,
            cleaned: Some(cleaned),
            detected_type,
            success: true,
            quality_issue: None,
            error_message: None,
        }
    }

    pub fn failure(
        original: CellValue,
        detected_type: DataType,
        issue: DataQualityIssue,
        message: impl Into<String>,
    ) -> Self {
        Self {
            original,
            cleaned: None,
            detected_type,
            success: false,
            quality_issue: Some(QualityIssue {
                issue,
                severity: Severity::Error,
            }),
            error_message: Some(message.into()),
        }
    }

    pub fn with_quality_issue(mut self, issue: DataQualityIssue, severity: Severity) -> Self {
        self.quality_issue = Some(QualityIssue { issue, severity });
        self
    }
}
