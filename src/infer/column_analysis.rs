use super::elementary::infer_cell_type;
use crate::datamodel::{
    AnomalyIssue, CellAnomaly, CellValue, ColumnAnalysisResult, CurrencyInfo, DataType,
};
use crate::error::AnalysisError;
use crate::parsing::currency::{detect_currency, detect_distinct_currencies};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Cells looked at on each side of a suspicious cell.
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;

/// Non-empty values copied into the result for display.
pub const MAX_SAMPLE_VALUES: usize = 10;

/// Infers the semantic type of a column from a sample of its cells and
/// reports the cells that do not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAnalysisService {
    context_window: usize,
}

impl Default for ColumnAnalysisService {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

impl ColumnAnalysisService {
    pub fn new(context_window: usize) -> Self {
        Self { context_window }
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    /// Analyzes one column sample.
    ///
    /// `number_formats` is either empty (no format metadata at all) or holds
    /// one entry per sample cell. Any other length is a caller error.
    pub fn analyze(
        &self,
        column_index: usize,
        column_name: &str,
        sample: &[CellValue],
        number_formats: &[Option<String>],
    ) -> Result<ColumnAnalysisResult, AnalysisError> {
        if !number_formats.is_empty() && number_formats.len() != sample.len() {
            return Err(AnalysisError::FormatCountMismatch {
                column_index,
                cells: sample.len(),
                formats: number_formats.len(),
            });
        }
        if sample.is_empty() {
            return Ok(ColumnAnalysisResult::empty(column_index, column_name));
        }

        let format_at = |row: usize| number_formats.get(row).and_then(|f| f.as_deref());

        let types: Vec<DataType> = sample
            .iter()
            .enumerate()
            .map(|(row, value)| infer_cell_type(value, format_at(row)))
            .collect();

        let type_distribution = types.iter().fold(BTreeMap::new(), |mut counts, data_type| {
            *counts.entry(*data_type).or_insert(0_usize) += 1;
            counts
        });

        let (mut detected_type, dominant_count) = dominant_type(&type_distribution);

        let mut currency: Option<CurrencyInfo> = None;
        if matches!(detected_type, DataType::Number | DataType::Currency) {
            currency = detect_distinct_currencies(number_formats.iter().flatten())
                .into_iter()
                .next();
            if currency.is_some() && detected_type == DataType::Number {
                detected_type = DataType::Currency;
            }
        }

        let cell_currencies: Vec<Option<String>> = (0..sample.len())
            .map(|row| format_at(row).and_then(detect_currency).map(|info| info.code))
            .collect();
        let majority_currency = if detected_type == DataType::Currency {
            majority_code(&cell_currencies)
        } else {
            None
        };

        let mut anomalies = Vec::new();
        for (row, (value, actual_type)) in sample.iter().zip(types.iter().copied()).enumerate() {
            match actual_type {
                DataType::Error => anomalies.push(CellAnomaly {
                    row_index: row,
                    cell_value: value.clone(),
                    issue: AnomalyIssue::FormulaError,
                    expected_type: detected_type,
                    actual_type,
                    message: format!("Formula error {} in column '{}'", value, column_name),
                    severity: AnomalyIssue::FormulaError.default_severity(),
                    local_context: None,
                }),
                DataType::Unknown => {}
                other if other == detected_type => {}
                other => {
                    let local_context = self.local_context(&types, row);
                    let context_note = match local_context {
                        Some(context) => format!("neighbouring cells are mostly {}", context),
                        None => "no typed neighbouring cells".to_string(),
                    };
                    anomalies.push(CellAnomaly {
                        row_index: row,
                        cell_value: value.clone(),
                        issue: AnomalyIssue::TypeMismatch,
                        expected_type: detected_type,
                        actual_type: other,
                        message: format!(
                            "Expected {} but found {} ({})",
                            detected_type, other, context_note
                        ),
                        severity: AnomalyIssue::TypeMismatch.default_severity(),
                        local_context,
                    });
                }
            }

            if let (Some(majority), Some(code)) = (&majority_currency, &cell_currencies[row]) {
                if code != majority {
                    anomalies.push(CellAnomaly {
                        row_index: row,
                        cell_value: value.clone(),
                        issue: AnomalyIssue::InconsistentFormat,
                        expected_type: detected_type,
                        actual_type,
                        message: format!(
                            "Currency {} differs from the column currency {}",
                            code, majority
                        ),
                        severity: AnomalyIssue::InconsistentFormat.default_severity(),
                        local_context: None,
                    });
                }
            }
        }

        let base_confidence = dominant_count as f64 / sample.len() as f64;
        let penalty: f64 = anomalies
            .iter()
            .map(|anomaly| anomaly.severity.confidence_penalty())
            .sum();
        let type_confidence = (base_confidence - penalty).clamp(0.0, 1.0);

        let sample_values = sample
            .iter()
            .filter(|value| !value.is_blank())
            .take(MAX_SAMPLE_VALUES)
            .cloned()
            .collect();

        Ok(ColumnAnalysisResult {
            column_index,
            column_name: column_name.to_string(),
            detected_type,
            type_confidence,
            currency,
            type_distribution,
            sample_values,
            anomalies,
        })
    }

    /// Most frequent typed neighbour within the window, the cell itself
    /// excluded. Ties go to the type declared first.
    fn local_context(&self, types: &[DataType], row: usize) -> Option<DataType> {
        let start = row.saturating_sub(self.context_window);
        let end = (row + self.context_window + 1).min(types.len());
        let neighbours: SmallVec<[DataType; 8]> = (start..end)
            .filter(|&index| index != row)
            .map(|index| types[index])
            .filter(|data_type| *data_type != DataType::Unknown)
            .collect();

        let mut best: Option<(DataType, usize)> = None;
        for candidate in DataType::ALL {
            let count = neighbours.iter().filter(|t| **t == candidate).count();
            if count > 0 && best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((candidate, count));
            }
        }
        best.map(|(data_type, _)| data_type)
    }
}

/// Highest count among dominant candidates, ties to the type declared first.
fn dominant_type(distribution: &BTreeMap<DataType, usize>) -> (DataType, usize) {
    distribution
        .iter()
        .filter(|(data_type, _)| data_type.is_dominant_candidate())
        .fold((DataType::Unknown, 0), |best, (data_type, count)| {
            if *count > best.1 {
                (*data_type, *count)
            } else {
                best
            }
        })
}

/// Most used currency code, ties to the code seen first. `None` unless at
/// least two distinct codes appear.
fn majority_code(codes: &[Option<String>]) -> Option<String> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for code in codes.iter().flatten() {
        match tally.iter_mut().find(|(seen, _)| *seen == code.as_str()) {
            Some((_, count)) => *count += 1,
            None => tally.push((code.as_str(), 1)),
        }
    }
    if tally.len() < 2 {
        return None;
    }
    tally
        .iter()
        .fold(None::<(&str, usize)>, |best, &(code, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((code, count)),
        })
        .map(|(code, _)| code.to_string())
}
