#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sheetlens::config::{self, load_configuration};
use sheetlens::datamodel::{CellValue, DataType, Sheet};
use sheetlens::enrich::{enrich_sheet, enrich_workbook};
use sheetlens::merge::analyze_sheet_complexity;
use sheetlens::normalize::normalize;
use sheetlens::parsing::currency::detect_currency;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(about = "Detects column types, currencies and anomalies in spreadsheet sheets.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enrich one or more sheets exported as JSON and print the reports.
    Enrich {
        /// Sheet files, several files are enriched as one workbook.
        #[arg(required = true)]
        sheets: Vec<PathBuf>,
    },
    /// Normalize a single cell value.
    Normalize {
        value: String,
        /// Display format of the cell, e.g. `mm/dd/yyyy`.
        #[arg(long)]
        format: Option<String>,
        /// Read the value as a number instead of text.
        #[arg(long)]
        numeric: bool,
        /// Type hint such as `Text` or `Date`.
        #[arg(long)]
        hint: Option<DataType>,
    },
    /// Detect the currency of a display format.
    Currency { format: String },
    /// Score the merged ranges of a sheet exported as JSON.
    Complexity { sheet: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    load_configuration().context("Failed to load configuration")?;
    let config = config::get().context("Failed to get configuration")?;

    match Cli::parse().command {
        Command::Enrich { sheets } => {
            let options = config
                .enrichment_options()
                .context("Invalid enrichment configuration")?;
            let cancel = CancellationToken::new();
            let sheets = sheets
                .iter()
                .map(|path| read_sheet(path))
                .collect::<Result<Vec<_>>>()?;

            if let [sheet] = sheets.as_slice() {
                let enriched = enrich_sheet(sheet, &options, &cancel)
                    .with_context(|| format!("Failed to enrich sheet '{}'", sheet.sheet_name))?;
                print_json(&enriched)?;
            } else {
                let reports = enrich_workbook(&sheets, &options, &cancel)
                    .into_iter()
                    .zip(&sheets)
                    .map(|(report, sheet)| {
                        report.with_context(|| {
                            format!("Failed to enrich sheet '{}'", sheet.sheet_name)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                print_json(&reports)?;
            }
        }
        Command::Normalize {
            value,
            format,
            numeric,
            hint,
        } => {
            let date_system = config
                .parse_date_system()
                .context("Invalid date system")?;
            let raw = if numeric {
                let number: f64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("'{}' is not a number", value))?;
                CellValue::FloatingPoint(number)
            } else {
                CellValue::Text(value)
            };
            print_json(&normalize(&raw, format.as_deref(), hint, date_system))?;
        }
        Command::Currency { format } => {
            print_json(&detect_currency(&format))?;
        }
        Command::Complexity { sheet } => {
            let sheet = read_sheet(&sheet)?;
            print_json(&analyze_sheet_complexity(&sheet))?;
        }
    }

    Ok(())
}

fn read_sheet(path: &Path) -> Result<Sheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let sheet: Sheet = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sheet {}", path.display()))?;
    info!(
        "Loaded sheet '{}' from {} ({} rows)",
        sheet.sheet_name,
        path.display(),
        sheet.row_count()
    );
    Ok(sheet)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
