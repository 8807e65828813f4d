use crate::datamodel::{DateSystem, MergeStrategy};
use crate::enrich::EnrichmentOptions;
use crate::error::ConfigValueError;
use anyhow::Error;
use confique::Config;
use std::{
    str::FromStr,
    sync::{Arc, OnceLock},
};

#[derive(Debug, Config)]
pub struct SheetLensConfig {
    /// Data rows sampled per column.
    #[config(env = "SHEETLENS_SAMPLE_ROW_LIMIT", default = 100)]
    pub sample_row_limit: usize,

    /// Cells looked at on each side of an anomaly.
    #[config(env = "SHEETLENS_CONTEXT_WINDOW", default = 3)]
    pub context_window: usize,

    /// `auto` follows the complexity recommendation.
    #[config(env = "SHEETLENS_MERGE_STRATEGY", default = "auto")]
    pub merge_strategy: String,

    #[config(env = "SHEETLENS_DATE_SYSTEM", default = "1900")]
    pub date_system: String,

    #[config(env = "SHEETLENS_PARALLEL", default = true)]
    pub parallel: bool,
}

impl SheetLensConfig {
    pub fn load() -> Result<SheetLensConfig, Error> {
        let c = SheetLensConfig::builder()
            .env()
            .file("sheetlens.toml")
            .load()?;

        Ok(c)
    }

    /// `None` means the strategy is picked per sheet.
    pub fn parse_merge_strategy(&self) -> Result<Option<MergeStrategy>, ConfigValueError> {
        if self.merge_strategy.trim().eq_ignore_ascii_case("auto") {
            return Ok(None);
        }
        MergeStrategy::from_str(&self.merge_strategy)
            .map(Some)
            .map_err(|message| ConfigValueError {
                key: "merge_strategy",
                message,
            })
    }

    pub fn parse_date_system(&self) -> Result<DateSystem, ConfigValueError> {
        DateSystem::from_str(&self.date_system).map_err(|message| ConfigValueError {
            key: "date_system",
            message,
        })
    }

    pub fn enrichment_options(&self) -> Result<EnrichmentOptions, ConfigValueError> {
        if self.sample_row_limit == 0 {
            return Err(ConfigValueError {
                key: "sample_row_limit",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(EnrichmentOptions {
            sample_row_limit: self.sample_row_limit,
            context_window: self.context_window,
            merge_strategy: self.parse_merge_strategy()?,
            parallel: self.parallel,
        })
    }
}

static SHEETLENS_CONFIG: OnceLock<Arc<SheetLensConfig>> = OnceLock::new();

pub fn get() -> Result<Arc<SheetLensConfig>, Error> {
    SHEETLENS_CONFIG.get().cloned().ok_or_else(|| {
        Error::msg(
            "Configuration not loaded. Please call load_configuration() before using the configuration",
        )
    })
}

pub fn load_configuration() -> Result<(), Error> {
    if SHEETLENS_CONFIG.get().is_some() {
        return Ok(());
    }

    let config = SheetLensConfig::load()?;
    SHEETLENS_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}
