//! Per-sheet enrichment: merge resolution, header detection, column analysis
//! and cell annotation, fanned out over columns and sheets.

pub mod orchestrator;

use crate::datamodel::{
    ColumnAnalysisResult, CurrencyInfo, DataType, MergeComplexityAnalysis, MergeStrategy,
    MergeWarning, Sheet,
};
use crate::error::AnalysisError;
use crate::infer::{DEFAULT_CONTEXT_WINDOW, HeaderDetection};
use serde::{Deserialize, Serialize};

pub use orchestrator::{enrich_sheet, enrich_workbook};

pub const DEFAULT_SAMPLE_ROW_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentOptions {
    /// Data rows sampled per column.
    pub sample_row_limit: usize,
    pub context_window: usize,
    /// `None` applies the strategy recommended by the complexity analysis.
    pub merge_strategy: Option<MergeStrategy>,
    /// Analyze columns and sheets on the rayon pool.
    pub parallel: bool,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            sample_row_limit: DEFAULT_SAMPLE_ROW_LIMIT,
            context_window: DEFAULT_CONTEXT_WINDOW,
            merge_strategy: None,
            parallel: true,
        }
    }
}

/// What enrichment learned about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub column_index: usize,
    pub column_name: String,
    pub detected_type: DataType,
    pub type_confidence: f64,
    pub currency: Option<CurrencyInfo>,
    pub anomaly_count: usize,
}

impl From<&ColumnAnalysisResult> for ColumnMetadata {
    fn from(result: &ColumnAnalysisResult) -> Self {
        Self {
            column_index: result.column_index,
            column_name: result.column_name.clone(),
            detected_type: result.detected_type,
            type_confidence: result.type_confidence,
            currency: result.currency.clone(),
            anomaly_count: result.anomalies.len(),
        }
    }
}

/// An enriched sheet and the report of how it was produced.
///
/// `sheet` has its merges resolved and its data cells annotated. Anomaly row
/// indexes in `analyses` refer to rows of that sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSheet {
    pub sheet: Sheet,
    pub header: HeaderDetection,
    pub columns: Vec<ColumnMetadata>,
    pub analyses: Vec<ColumnAnalysisResult>,
    pub complexity: Option<MergeComplexityAnalysis>,
    pub applied_merge_strategy: Option<MergeStrategy>,
    pub warnings: Vec<MergeWarning>,
    /// Columns that could not be analyzed. The other columns are complete.
    pub errors: Vec<AnalysisError>,
}

impl EnrichedSheet {
    pub fn column(&self, column_index: usize) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|column| column.column_index == column_index)
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
