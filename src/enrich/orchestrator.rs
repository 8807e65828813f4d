use super::{ColumnMetadata, EnrichedSheet, EnrichmentOptions};
use crate::datamodel::{
    CellValue, ColumnAnalysisResult, DataType, MergeWarning, Sheet, merge::column_letters,
};
use crate::error::AnalysisError;
use crate::infer::{
    ColumnAnalysisService, HeaderDetection, HeaderRegion, detect_headers, infer_record_type,
};
use crate::merge::{analyze_sheet_complexity, resolve};
use crate::parsing::currency::detect_currency;
use rayon::prelude::*;
use std::borrow::Cow;
use std::cell::RefCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Enriches one sheet.
///
/// Stages run in order: merge resolution, header detection, column analysis
/// on at most `sample_row_limit` data rows, then cell annotation. A column
/// that fails is recorded in `errors` and the others carry on. Cancellation
/// is checked before the sheet and before each column.
pub fn enrich_sheet(
    sheet: &Sheet,
    options: &EnrichmentOptions,
    cancel: &CancellationToken,
) -> Result<EnrichedSheet, AnalysisError> {
    if cancel.is_cancelled() {
        warn!("Enrichment of sheet '{}' cancelled", sheet.sheet_name);
        return Err(AnalysisError::Cancelled {
            unit: format!("sheet '{}'", sheet.sheet_name),
        });
    }

    info!(
        "Enriching sheet '{}' ({} rows, {} merged ranges)",
        sheet.sheet_name,
        sheet.row_count(),
        sheet.merged_ranges.len()
    );

    let warnings = RefCell::new(Vec::new());
    let on_warning = |warning: MergeWarning| {
        warn!("Sheet '{}': {}", sheet.sheet_name, warning);
        warnings.borrow_mut().push(warning);
    };

    let complexity = sheet.has_merges().then(|| analyze_sheet_complexity(sheet));
    let applied_merge_strategy = complexity
        .as_ref()
        .map(|analysis| options.merge_strategy.unwrap_or(analysis.recommended_strategy));
    let resolved = match applied_merge_strategy {
        Some(strategy) => resolve(sheet, strategy, Some(&on_warning)),
        None => Cow::Borrowed(sheet),
    };
    let mut enriched = resolved.into_owned();
    let warnings = warnings.into_inner();

    let region = sheet
        .header_row_count
        .map(|row_count| HeaderRegion {
            first_row: 0,
            row_count,
        });
    let header = detect_headers(&enriched.rows, region);
    let data_start = header.data_start_row().min(enriched.rows.len());
    debug!(
        "Sheet '{}': {} header rows starting at row {} (confidence {:.2})",
        enriched.sheet_name, header.header_row_count, header.first_header_row, header.confidence
    );

    if enriched.column_names.is_empty() && header.has_header() {
        enriched.column_names = header_names(&enriched, &header, data_start);
    }

    let outcomes = analyze_columns(&enriched, data_start, options, cancel);

    let mut analyses = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(mut result) => {
                for anomaly in &mut result.anomalies {
                    anomaly.row_index += data_start;
                }
                analyses.push(result);
            }
            Err(err) => {
                warn!("Sheet '{}': {}", enriched.sheet_name, err);
                errors.push(err);
            }
        }
    }

    annotate(&mut enriched, data_start, &analyses);
    let columns: Vec<ColumnMetadata> = analyses.iter().map(ColumnMetadata::from).collect();

    info!(
        "Sheet '{}' enriched: {} columns analyzed, {} failed",
        enriched.sheet_name,
        columns.len(),
        errors.len()
    );

    Ok(EnrichedSheet {
        sheet: enriched,
        header,
        columns,
        analyses,
        complexity,
        applied_merge_strategy,
        warnings,
        errors,
    })
}

/// Enriches independent sheets, in parallel when the options allow it.
/// Reports come back in input order.
pub fn enrich_workbook(
    sheets: &[Sheet],
    options: &EnrichmentOptions,
    cancel: &CancellationToken,
) -> Vec<Result<EnrichedSheet, AnalysisError>> {
    info!("Enriching workbook of {} sheets", sheets.len());
    if options.parallel {
        sheets
            .par_iter()
            .map(|sheet| enrich_sheet(sheet, options, cancel))
            .collect()
    } else {
        sheets
            .iter()
            .map(|sheet| enrich_sheet(sheet, options, cancel))
            .collect()
    }
}

fn analyze_columns(
    sheet: &Sheet,
    data_start: usize,
    options: &EnrichmentOptions,
    cancel: &CancellationToken,
) -> Vec<Result<ColumnAnalysisResult, AnalysisError>> {
    let service = ColumnAnalysisService::new(options.context_window);
    let sample_end = data_start
        .saturating_add(options.sample_row_limit)
        .min(sheet.rows.len());
    let sample_rows = &sheet.rows[data_start..sample_end];

    let analyze_column = |column_index: usize| {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled {
                unit: format!("column {} of sheet '{}'", column_index, sheet.sheet_name),
            });
        }
        let column_name = sheet.column_name(column_index);
        let (values, formats): (Vec<CellValue>, Vec<Option<String>>) = sample_rows
            .iter()
            .map(|row| match row.get(column_index) {
                Some(cell) => (cell.value.clone(), cell.number_format.clone()),
                None => (CellValue::Empty, None),
            })
            .unzip();
        debug!(
            "Analyzing column {} ('{}') of sheet '{}' on {} rows",
            column_index,
            column_name,
            sheet.sheet_name,
            values.len()
        );
        service
            .analyze(column_index, &column_name, &values, &formats)
            .map_err(|err| AnalysisError::ColumnFailed {
                column_index,
                column_name,
                details: err.to_string(),
            })
    };

    let column_count = sheet.column_count();
    if options.parallel {
        (0..column_count)
            .into_par_iter()
            .map(&analyze_column)
            .collect()
    } else {
        (0..column_count).map(&analyze_column).collect()
    }
}

/// Column names read from the header rows, multi-row headers joined by a space.
fn header_names(sheet: &Sheet, header: &HeaderDetection, data_start: usize) -> Vec<String> {
    let header_rows = &sheet.rows[header.first_header_row.min(data_start)..data_start];
    (0..sheet.column_count())
        .map(|col| {
            let parts: Vec<String> = header_rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|cell| !cell.value.is_blank())
                .map(|cell| cell.value.to_string().trim().to_string())
                .collect();
            if parts.is_empty() {
                column_letters(col)
            } else {
                parts.join(" ")
            }
        })
        .collect()
}

/// Stamps the elementary type and currency of every non-blank data cell of
/// the analyzed columns. Values already present on a cell are kept.
fn annotate(sheet: &mut Sheet, data_start: usize, analyses: &[ColumnAnalysisResult]) {
    for row in sheet.rows.iter_mut().skip(data_start) {
        for analysis in analyses {
            let Some(cell) = row.get_mut(analysis.column_index) else {
                continue;
            };
            if cell.value.is_blank() {
                continue;
            }
            let cell_type = infer_record_type(cell);
            cell.detected_type = Some(cell_type);
            if cell.currency.is_none() {
                let column_currency = matches!(cell_type, DataType::Number | DataType::Currency)
                    && analysis.detected_type == DataType::Currency;
                cell.currency = cell
                    .number_format
                    .as_deref()
                    .and_then(detect_currency)
                    .or_else(|| {
                        if column_currency {
                            analysis.currency.clone()
                        } else {
                            None
                        }
                    });
            }
        }
    }
}
