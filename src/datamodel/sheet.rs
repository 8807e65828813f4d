use super::{CellValue, CurrencyInfo, DataType, MergedRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cell value plus the optional metadata a reader may attach to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellRecord {
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_type: Option<DataType>,
}

impl CellRecord {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    pub fn with_format(value: CellValue, number_format: impl Into<String>) -> Self {
        Self {
            value,
            number_format: Some(number_format.into()),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<CellValue> for CellRecord {
    fn from(value: CellValue) -> Self {
        Self::new(value)
    }
}

/// A raw sheet as handed over by a file reader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub sheet_name: String,
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<CellRecord>>,
    /// Keyed by the reader's range reference, typically `A1:C1`.
    #[serde(default)]
    pub merged_ranges: BTreeMap<String, MergedRange>,
    /// Header rows declared by the reader. `None` lets the enrichment
    /// pipeline detect them.
    #[serde(default)]
    pub header_row_count: Option<usize>,
}

impl Sheet {
    pub fn new(sheet_name: impl Into<String>, rows: Vec<Vec<CellRecord>>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows,
            ..Default::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest of the declared column names and the longest row.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.column_names.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellRecord> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn column_name(&self, col: usize) -> String {
        self.column_names
            .get(col)
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| super::merge::column_letters(col))
    }

    pub fn has_merges(&self) -> bool {
        !self.merged_ranges.is_empty()
    }
}
