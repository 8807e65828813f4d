use crate::datamodel::{CellRecord, CellValue, DataType};
use crate::parsing::{
    currency::is_currency_format,
    format_code::{is_date_format, is_percentage_format},
};

/// Classifies a single cell from its value and display format.
///
/// Blank text counts as `Unknown`, like an empty cell.
pub fn infer_cell_type(value: &CellValue, format: Option<&str>) -> DataType {
    match value {
        CellValue::Empty => DataType::Unknown,
        CellValue::Boolean(_) => DataType::Boolean,
        CellValue::DateTime(_) => DataType::Date,
        CellValue::Integer(_) | CellValue::FloatingPoint(_) => match format {
            Some(format) if is_percentage_format(format) => DataType::Percentage,
            Some(format) if is_currency_format(format) => DataType::Currency,
            Some(format) if is_date_format(format) => DataType::Date,
            _ => DataType::Number,
        },
        CellValue::Text(text) if text.trim().is_empty() => DataType::Unknown,
        CellValue::Text(text) if text.starts_with('#') => DataType::Error,
        CellValue::Text(_) => DataType::Text,
    }
}

/// A pre-resolved type on the record wins over inference.
pub fn infer_record_type(record: &CellRecord) -> DataType {
    record
        .detected_type
        .unwrap_or_else(|| infer_cell_type(&record.value, record.number_format.as_deref()))
}
