//! Grid builders shared by unit and integration tests.

use crate::config::{SheetLensConfig, load_configuration};
use crate::datamodel::{CellRecord, CellValue, MergedRange, Sheet};
use anyhow::Result;
use std::sync::Mutex;

pub mod fixtures;

static TEST_CONFIG_INIT: Mutex<()> = Mutex::new(());

/// Loads the configuration once per test run, whatever the test order.
pub fn load_configuration_for_tests() -> Result<SheetLensConfig> {
    let _guard = TEST_CONFIG_INIT
        .lock()
        .map_err(|_| anyhow::anyhow!("Test configuration lock poisoned"))?;
    load_configuration()?;
    SheetLensConfig::load()
}

pub fn text(value: &str) -> CellRecord {
    CellRecord::new(CellValue::text(value))
}

pub fn integer(value: i64) -> CellRecord {
    CellRecord::new(CellValue::Integer(value))
}

pub fn number(value: f64) -> CellRecord {
    CellRecord::new(CellValue::FloatingPoint(value))
}

pub fn formatted(value: CellValue, format: &str) -> CellRecord {
    CellRecord::with_format(value, format)
}

pub fn empty() -> CellRecord {
    CellRecord::empty()
}

/// Fluent construction of reader sheets.
#[derive(Debug, Default)]
pub struct SheetBuilder {
    sheet: Sheet,
}

impl SheetBuilder {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet: Sheet::new(sheet_name, Vec::new()),
        }
    }

    pub fn column_names(mut self, names: &[&str]) -> Self {
        self.sheet.column_names = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn row(mut self, cells: Vec<CellRecord>) -> Self {
        self.sheet.rows.push(cells);
        self
    }

    pub fn text_row(self, values: &[&str]) -> Self {
        self.row(values.iter().map(|value| text(value)).collect())
    }

    pub fn blank_row(self) -> Self {
        self.row(Vec::new())
    }

    /// Adds a merged range from an A1 reference. Panics on a bad reference.
    pub fn merge(mut self, reference: &str) -> Self {
        let range = MergedRange::parse_a1(reference)
            .unwrap_or_else(|err| panic!("Invalid merge reference in test: {}", err));
        self.sheet.merged_ranges.insert(reference.to_string(), range);
        self
    }

    pub fn header_rows(mut self, count: usize) -> Self {
        self.sheet.header_row_count = Some(count);
        self
    }

    pub fn build(self) -> Sheet {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_builder() {
        let sheet = SheetBuilder::new("Test")
            .column_names(&["A", "B"])
            .text_row(&["x", "y"])
            .row(vec![integer(1), number(2.5)])
            .merge("A1:B1")
            .header_rows(1)
            .build();
        assert_eq!(sheet.sheet_name, "Test");
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.column_count(), 2);
        assert!(sheet.has_merges());
        assert_eq!(sheet.header_row_count, Some(1));
    }
}
