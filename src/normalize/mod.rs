//! Converts raw cells into their canonical typed form.
//!
//! Each cell is handled on its own, nothing here looks at neighbouring rows.

pub mod text;

use crate::datamodel::{
    CellRecord, CellValue, DataQualityIssue, DataType, DateSystem, NormalizationResult, Severity,
};
use crate::parsing::{
    currency::is_currency_format,
    date::{parse_text_date, serial_to_datetime},
    format_code::{is_date_format, is_numeric_format, is_percentage_format},
    number::parse_number,
};
use text::{boolean_synonym, clean_text};

/// Normalizes one cell.
///
/// Numeric values under a date-looking format (or a `Date` hint) are read as
/// serial dates. A `Text` hint keeps text cells as cleaned text, skipping
/// every conversion.
pub fn normalize(
    raw: &CellValue,
    format: Option<&str>,
    hinted_type: Option<DataType>,
    date_system: DateSystem,
) -> NormalizationResult {
    let format = format.map(str::trim).filter(|format| !format.is_empty());
    let serial_hint =
        hinted_type == Some(DataType::Date) || format.is_some_and(is_date_format);

    match raw {
        CellValue::Empty => NormalizationResult::empty(),
        CellValue::Integer(_) | CellValue::FloatingPoint(_) if serial_hint => {
            normalize_serial_date(raw, date_system)
        }
        CellValue::Integer(_) | CellValue::FloatingPoint(_) => normalize_number(raw, format),
        CellValue::Boolean(value) => {
            NormalizationResult::success(raw.clone(), CellValue::Boolean(*value), DataType::Boolean)
        }
        CellValue::DateTime(value) => {
            NormalizationResult::success(raw.clone(), CellValue::DateTime(*value), DataType::Date)
        }
        CellValue::Text(text) => normalize_text(raw, text, format, hinted_type),
    }
}

/// Element-wise normalization of reader cells, using each cell's own format
/// and pre-resolved type as the hint.
pub fn normalize_batch(cells: &[CellRecord], date_system: DateSystem) -> Vec<NormalizationResult> {
    cells
        .iter()
        .map(|cell| {
            normalize(
                &cell.value,
                cell.number_format.as_deref(),
                cell.detected_type,
                date_system,
            )
        })
        .collect()
}

fn non_finite(raw: &CellValue, detected_type: DataType) -> Option<NormalizationResult> {
    match raw.as_f64() {
        Some(value) if !value.is_finite() => Some(NormalizationResult::failure(
            raw.clone(),
            detected_type,
            DataQualityIssue::InvalidNumber,
            format!("{} is not a finite number", value),
        )),
        _ => None,
    }
}

fn normalize_serial_date(raw: &CellValue, date_system: DateSystem) -> NormalizationResult {
    if let Some(failure) = non_finite(raw, DataType::Date) {
        return failure;
    }
    let serial = raw.as_f64().unwrap_or_default();
    match serial_to_datetime(serial, date_system) {
        Ok(datetime) => {
            NormalizationResult::success(raw.clone(), CellValue::DateTime(datetime), DataType::Date)
        }
        Err(err) => NormalizationResult::failure(
            raw.clone(),
            DataType::Date,
            DataQualityIssue::OutOfRange,
            err.to_string(),
        ),
    }
}

fn numeric_type_for_format(format: Option<&str>) -> DataType {
    match format {
        Some(format) if is_percentage_format(format) => DataType::Percentage,
        Some(format) if is_currency_format(format) => DataType::Currency,
        _ => DataType::Number,
    }
}

fn normalize_number(raw: &CellValue, format: Option<&str>) -> NormalizationResult {
    let detected_type = numeric_type_for_format(format);
    if let Some(failure) = non_finite(raw, detected_type) {
        return failure;
    }
    NormalizationResult::success(raw.clone(), raw.clone(), detected_type)
}

fn parse_text_number(
    raw: &CellValue,
    text: &str,
    format: Option<&str>,
) -> Option<NormalizationResult> {
    let parsed = parse_number(text)?;
    let detected_type = if parsed.is_percentage {
        DataType::Percentage
    } else if parsed.had_currency {
        DataType::Currency
    } else {
        numeric_type_for_format(format)
    };
    Some(NormalizationResult::success(
        raw.clone(),
        CellValue::FloatingPoint(parsed.value),
        detected_type,
    ))
}

fn parse_date(raw: &CellValue, text: &str) -> Option<NormalizationResult> {
    parse_text_date(text).map(|datetime| {
        NormalizationResult::success(raw.clone(), CellValue::DateTime(datetime), DataType::Date)
    })
}

fn normalize_text(
    raw: &CellValue,
    text: &str,
    format: Option<&str>,
    hinted_type: Option<DataType>,
) -> NormalizationResult {
    let cleaned = clean_text(text);

    if hinted_type != Some(DataType::Text) {
        if let Some(value) = boolean_synonym(&cleaned) {
            return NormalizationResult::success(
                raw.clone(),
                CellValue::Boolean(value),
                DataType::Boolean,
            );
        }

        // "1,234" must not be read as a date when the format asks for digits
        let number_first = format.is_some_and(is_numeric_format);
        let converted = if number_first {
            parse_text_number(raw, &cleaned, format).or_else(|| parse_date(raw, &cleaned))
        } else {
            parse_date(raw, &cleaned).or_else(|| parse_text_number(raw, &cleaned, format))
        };
        if let Some(result) = converted {
            return result;
        }
    }

    let changed = cleaned != text;
    let result = NormalizationResult::success(raw.clone(), CellValue::Text(cleaned), DataType::Text);
    if changed {
        result.with_quality_issue(DataQualityIssue::ExtraWhitespace, Severity::Warning)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run(raw: CellValue, format: Option<&str>) -> NormalizationResult {
        normalize(&raw, format, None, DateSystem::Date1900)
    }

    fn midnight(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::DateTime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_empty_is_not_a_failure() {
        let result = run(CellValue::Empty, Some("0.00"));
        assert_eq!(result, NormalizationResult::empty());
        assert!(result.success);
    }

    #[test]
    fn test_serial_date_with_date_format() {
        let result = run(CellValue::Integer(61), Some("mm/dd/yyyy"));
        assert!(result.success);
        assert_eq!(result.detected_type, DataType::Date);
        assert_eq!(result.cleaned, Some(midnight(1900, 3, 2)));

        let result = normalize(
            &CellValue::Integer(0),
            Some("yyyy-mm-dd"),
            None,
            DateSystem::Date1904,
        );
        assert_eq!(result.cleaned, Some(midnight(1904, 1, 1)));
    }

    #[test]
    fn test_serial_date_out_of_range() {
        let result = run(CellValue::FloatingPoint(3_000_000.0), Some("dd/mm/yyyy"));
        assert!(!result.success);
        assert_eq!(result.cleaned, None);
        assert_eq!(
            result.quality_issue.map(|q| q.issue),
            Some(DataQualityIssue::OutOfRange)
        );
        assert!(result.error_message.is_some());
    }

    #[test]
    fn test_date_hint_without_format() {
        let result = normalize(
            &CellValue::Integer(1),
            None,
            Some(DataType::Date),
            DateSystem::Date1900,
        );
        assert_eq!(result.cleaned, Some(midnight(1899, 12, 31)));
    }

    #[test]
    fn test_native_numbers() {
        let result = run(CellValue::FloatingPoint(0.25), Some("0.00%"));
        assert_eq!(result.detected_type, DataType::Percentage);
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(0.25)));

        let result = run(CellValue::Integer(12), Some("[$€-407] #,##0.00"));
        assert_eq!(result.detected_type, DataType::Currency);

        let result = run(CellValue::Integer(12), None);
        assert_eq!(result.detected_type, DataType::Number);
        assert_eq!(result.cleaned, Some(CellValue::Integer(12)));
    }

    #[test]
    fn test_non_finite_numbers_fail() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = run(CellValue::FloatingPoint(value), None);
            assert!(!result.success);
            assert_eq!(
                result.quality_issue.map(|q| q.issue),
                Some(DataQualityIssue::InvalidNumber)
            );
        }
    }

    #[test]
    fn test_boolean_synonyms_and_digits() {
        for text in ["Y", "x", "✓"] {
            let result = run(CellValue::text(text), None);
            assert_eq!(result.cleaned, Some(CellValue::Boolean(true)));
            assert_eq!(result.detected_type, DataType::Boolean);
        }
        let result = run(CellValue::text("0"), None);
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(0.0)));
        assert_eq!(result.detected_type, DataType::Number);
        let result = run(CellValue::text("1"), None);
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(1.0)));
    }

    #[test]
    fn test_numeric_format_parses_numbers_before_dates() {
        let result = run(CellValue::text("1,234"), Some("#,##0"));
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(1234.0)));
        assert_eq!(result.detected_type, DataType::Number);
    }

    #[test]
    fn test_text_dates() {
        let result = run(CellValue::text("2024-01-15"), None);
        assert_eq!(result.cleaned, Some(midnight(2024, 1, 15)));
        let result = run(CellValue::text("25/12/2024"), None);
        assert_eq!(result.cleaned, Some(midnight(2024, 12, 25)));
    }

    #[test]
    fn test_text_numbers() {
        let result = run(CellValue::text("$1,234.50"), None);
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(1234.5)));
        assert_eq!(result.detected_type, DataType::Currency);

        let result = run(CellValue::text("45%"), None);
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(0.45)));
        assert_eq!(result.detected_type, DataType::Percentage);

        let result = run(CellValue::text("1 234,5"), None);
        assert_eq!(result.cleaned, Some(CellValue::FloatingPoint(1234.5)));
    }

    #[test]
    fn test_text_cleanup_reports_warning() {
        let result = run(CellValue::text("  Widget\u{200B} "), None);
        assert!(result.success);
        assert_eq!(result.cleaned, Some(CellValue::text("Widget")));
        let issue = result.quality_issue.unwrap();
        assert_eq!(issue.issue, DataQualityIssue::ExtraWhitespace);
        assert_eq!(issue.severity, Severity::Warning);

        let result = run(CellValue::text("Widget"), None);
        assert_eq!(result.quality_issue, None);
    }

    #[test]
    fn test_text_hint_keeps_identifiers() {
        let result = normalize(
            &CellValue::text("00123"),
            None,
            Some(DataType::Text),
            DateSystem::Date1900,
        );
        assert_eq!(result.cleaned, Some(CellValue::text("00123")));
        assert_eq!(result.detected_type, DataType::Text);
    }

    #[test]
    fn test_normalize_batch() {
        let cells = vec![
            CellRecord::new(CellValue::text("yes")),
            CellRecord::with_format(CellValue::Integer(60), "mm/dd/yyyy"),
            CellRecord::empty(),
        ];
        let results = normalize_batch(&cells, DateSystem::Date1900);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].cleaned, Some(CellValue::Boolean(true)));
        assert_eq!(results[1].cleaned, Some(midnight(1900, 3, 1)));
        assert_eq!(results[2], NormalizationResult::empty());
    }
}
