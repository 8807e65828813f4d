//! Sheets shaped like real exports.

use super::{SheetBuilder, empty, formatted, integer, text};
use crate::datamodel::{CellValue, Sheet};

const EURO: &str = "[$€-407] #,##0.00";
const DOLLAR: &str = "[$$-409] #,##0.00";

/// Quarterly sales export: merged title, two header rows, a currency column
/// with one dollar cell, a formula error and a footer. The reader declares
/// the three leading rows as header.
///
/// ```text
/// row 0  Quarterly sales 2024 (merged A1:D1)
/// row 1  Region | Revenue | Units | Share
/// row 2         | EUR     |       | %
/// row 3-6  North, South, East, West
/// row 7  Central: dollar amount, #N/A units
/// row 8  Total: text share
/// ```
pub fn quarterly_report() -> Sheet {
    let mut builder = SheetBuilder::new("Q-Report")
        .column_names(&["Region", "Revenue", "Units", "Share"])
        .header_rows(3)
        .row(vec![text("Quarterly sales 2024"), empty(), empty(), empty()])
        .merge("A1:D1")
        .text_row(&["Region", "Revenue", "Units", "Share"])
        .row(vec![empty(), text("EUR"), empty(), text("%")]);

    let regions = [
        ("North", 1200.5, 10, 0.25),
        ("South", 980.0, 8, 0.20),
        ("East", 1530.25, 12, 0.30),
        ("West", 1110.0, 9, 0.25),
    ];
    for (region, revenue, units, share) in regions {
        builder = builder.row(vec![
            text(region),
            formatted(CellValue::FloatingPoint(revenue), EURO),
            integer(units),
            formatted(CellValue::FloatingPoint(share), "0%"),
        ]);
    }

    builder
        .row(vec![
            text("Central"),
            formatted(CellValue::FloatingPoint(450.0), DOLLAR),
            text("#N/A"),
            formatted(CellValue::FloatingPoint(0.0), "0%"),
        ])
        .row(vec![
            text("Total"),
            formatted(CellValue::FloatingPoint(5270.75), EURO),
            integer(39),
            text("n/a"),
        ])
        .build()
}

/// A sheet where five two-by-two merged blocks cover most of the grid.
pub fn heavily_merged() -> Sheet {
    let mut builder = SheetBuilder::new("Layout");
    for row in 0..4 {
        builder = builder.row((0..5).map(|col| integer((row * 5 + col) as i64)).collect());
    }
    builder
        .merge("A1:B2")
        .merge("C1:D2")
        .merge("A3:B4")
        .merge("C3:D4")
        .merge("E1:E4")
        .build()
}
