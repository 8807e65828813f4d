use sheetlens::datamodel::CellValue;

pub fn numbers(values: &[f64]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::FloatingPoint(*v)).collect()
}

pub fn texts(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::text(*v)).collect()
}

/// A reader export in the JSON shape consumed by the CLI.
pub const SHEET_JSON: &str = r#"{
    "sheet_name": "Invoices",
    "column_names": ["Customer", "Amount", "Paid"],
    "rows": [
        [
            {"value": {"type": "Text", "value": "Customer"}},
            {"value": {"type": "Text", "value": "Amount"}},
            {"value": {"type": "Text", "value": "Paid"}}
        ],
        [
            {"value": {"type": "Text", "value": "ACME"}},
            {"value": {"type": "FloatingPoint", "value": 1250.0}, "number_format": "[$£-809] #,##0.00"},
            {"value": {"type": "Boolean", "value": true}}
        ],
        [
            {"value": {"type": "Text", "value": "Globex"}},
            {"value": {"type": "FloatingPoint", "value": 310.5}, "number_format": "[$£-809] #,##0.00"},
            {"value": {"type": "Boolean", "value": false}}
        ],
        [
            {"value": {"type": "Text", "value": "Initech"}},
            {"value": {"type": "Integer", "value": 99}, "number_format": "[$£-809] #,##0.00"},
            {"value": {"type": "Empty"}}
        ]
    ],
    "merged_ranges": {},
    "header_row_count": 1
}"#;
