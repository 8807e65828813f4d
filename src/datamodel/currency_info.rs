use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyPosition {
    Prefix,
    Suffix,
}

/// How much the detector trusts the resolved ISO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyConfidence {
    /// Resolved from a locale code or an explicit ISO code.
    Unambiguous,
    /// Resolved from a bare symbol, which several currencies may share.
    Low,
}

/// Currency descriptor decoded from a display-format string.
///
/// Equality compares every field. Mismatch checks elsewhere compare `code` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub symbol: String,
    pub position: CurrencyPosition,
    pub decimal_places: u8,
    pub decimal_separator: char,
    pub thousand_separator: char,
    pub locale: Option<String>,
    pub confidence: CurrencyConfidence,
}

impl fmt::Display for CurrencyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.symbol)?;
        if let Some(locale) = &self.locale {
            write!(f, " [{}]", locale)?;
        }
        Ok(())
    }
}
