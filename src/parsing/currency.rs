//! Decodes currency descriptors from display-format strings.
//!
//! Detection order, first match wins:
//! 1. bracketed locale pattern `[$<symbol>-<locale>]`
//! 2. bracketed ISO code `[EUR]`
//! 3. bare currency symbol outside brackets
//!
//! Format codes are always written with US separators (`,` thousands,
//! `.` decimal). When the locale writes numbers with a decimal comma the
//! separators read from the code are swapped.

use super::format_code::{first_digit_placeholder, mask_brackets, mask_literals};
use crate::datamodel::{CurrencyConfidence, CurrencyInfo, CurrencyPosition};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static BRACKET_LOCALE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\$([^\]\-]*)(?:-([0-9A-Fa-f]{1,8}))?\]")
        .expect("Failed to compile bracketed locale regex")
});

static BRACKET_ISO_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Z]{3})\]").expect("Failed to compile ISO code regex"));

static DECIMAL_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,](0+)").expect("Failed to compile decimal run regex"));

struct LocaleEntry {
    code: &'static str,
    tag: &'static str,
    decimal_comma: bool,
}

const fn locale(code: &'static str, tag: &'static str, decimal_comma: bool) -> LocaleEntry {
    LocaleEntry {
        code,
        tag,
        decimal_comma,
    }
}

/// Windows locale identifiers (hex, as written after the dash) to currency.
static LOCALES: Lazy<HashMap<&'static str, LocaleEntry>> = Lazy::new(|| {
    HashMap::from([
        // Dollar
        ("409", locale("USD", "en-US", false)),
        ("1009", locale("CAD", "en-CA", false)),
        ("C09", locale("AUD", "en-AU", false)),
        ("1409", locale("NZD", "en-NZ", false)),
        // Pound
        ("809", locale("GBP", "en-GB", false)),
        // Euro
        ("407", locale("EUR", "de-DE", true)),
        ("C07", locale("EUR", "de-AT", true)),
        ("40C", locale("EUR", "fr-FR", true)),
        ("80C", locale("EUR", "fr-BE", true)),
        ("410", locale("EUR", "it-IT", true)),
        ("C0A", locale("EUR", "es-ES", true)),
        ("40A", locale("EUR", "es-ES", true)),
        ("413", locale("EUR", "nl-NL", true)),
        ("813", locale("EUR", "nl-BE", true)),
        ("816", locale("EUR", "pt-PT", true)),
        ("40B", locale("EUR", "fi-FI", true)),
        ("408", locale("EUR", "el-GR", true)),
        ("1809", locale("EUR", "en-IE", false)),
        // Yen, Won, Yuan
        ("411", locale("JPY", "ja-JP", false)),
        ("412", locale("KRW", "ko-KR", false)),
        ("804", locale("CNY", "zh-CN", false)),
        ("404", locale("TWD", "zh-TW", false)),
        // Others
        ("807", locale("CHF", "de-CH", false)),
        ("416", locale("BRL", "pt-BR", true)),
        ("419", locale("RUB", "ru-RU", true)),
        ("41D", locale("SEK", "sv-SE", true)),
        ("4009", locale("INR", "en-IN", false)),
    ])
});

/// Symbol to ISO code. Longer symbols come first so `R$` wins over `$`.
const SYMBOLS: [(&str, &str); 14] = [
    ("US$", "USD"),
    ("CHF", "CHF"),
    ("R$", "BRL"),
    ("zł", "PLN"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("￥", "JPY"),
    ("₩", "KRW"),
    ("元", "CNY"),
    ("₹", "INR"),
    ("₽", "RUB"),
    ("₺", "TRY"),
    ("$", "USD"),
];

pub fn symbol_to_code(symbol: &str) -> Option<&'static str> {
    let symbol = symbol.trim();
    SYMBOLS
        .iter()
        .find(|(candidate, _)| *candidate == symbol)
        .map(|(_, code)| *code)
}

pub fn default_symbol(code: &str) -> String {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" | "CNY" => "¥".to_string(),
        "KRW" => "₩".to_string(),
        "INR" => "₹".to_string(),
        "BRL" => "R$".to_string(),
        "RUB" => "₽".to_string(),
        _ => code.to_string(),
    }
}

/// Every known currency symbol, longest first.
pub fn known_symbols() -> impl Iterator<Item = &'static str> {
    SYMBOLS.iter().map(|(symbol, _)| *symbol)
}

fn normalize_lcid(lcid: &str) -> String {
    let trimmed = lcid.trim_start_matches('0').to_ascii_uppercase();
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed
    }
}

pub fn detect_currency(format: &str) -> Option<CurrencyInfo> {
    if format.trim().is_empty() {
        return None;
    }
    detect_bracketed_locale(format)
        .or_else(|| detect_bracketed_iso_code(format))
        .or_else(|| detect_bare_symbol(format))
}

/// One descriptor per ISO code, in order of first sighting.
pub fn detect_distinct_currencies<I, S>(formats: I) -> Vec<CurrencyInfo>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut distinct: Vec<CurrencyInfo> = Vec::new();
    for format in formats {
        if let Some(info) = detect_currency(format.as_ref()) {
            if !distinct.iter().any(|seen| seen.code == info.code) {
                distinct.push(info);
            }
        }
    }
    distinct
}

pub fn is_currency_format(format: &str) -> bool {
    detect_currency(format).is_some()
}

fn detect_bracketed_locale(format: &str) -> Option<CurrencyInfo> {
    for captures in BRACKET_LOCALE_REGEX.captures_iter(format) {
        let symbol = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        // `[$-409]` only selects a locale, it carries no currency
        if symbol.is_empty() {
            continue;
        }
        let symbol_index = captures.get(0).map(|m| m.start()).unwrap_or(0);
        let entry = captures
            .get(2)
            .and_then(|lcid| LOCALES.get(normalize_lcid(lcid.as_str()).as_str()));

        if let Some(entry) = entry {
            return Some(build_info(
                format,
                entry.code,
                symbol.to_string(),
                position_of(format, symbol_index),
                Some(entry.tag.to_string()),
                entry.decimal_comma,
                CurrencyConfidence::Unambiguous,
            ));
        }

        let code = symbol_to_code(symbol).map(str::to_string).or_else(|| {
            (symbol.len() == 3 && symbol.chars().all(|c| c.is_ascii_uppercase()))
                .then(|| symbol.to_string())
        });
        if let Some(code) = code {
            return Some(build_info(
                format,
                &code,
                symbol.to_string(),
                position_of(format, symbol_index),
                None,
                false,
                CurrencyConfidence::Low,
            ));
        }
    }
    None
}

fn detect_bracketed_iso_code(format: &str) -> Option<CurrencyInfo> {
    let captures = BRACKET_ISO_REGEX.captures(format)?;
    let code = captures.get(1)?.as_str();
    Some(build_info(
        format,
        code,
        default_symbol(code),
        CurrencyPosition::Prefix,
        None,
        false,
        CurrencyConfidence::Unambiguous,
    ))
}

fn detect_bare_symbol(format: &str) -> Option<CurrencyInfo> {
    let visible = mask_brackets(format);
    SYMBOLS.iter().find_map(|(symbol, code)| {
        visible.find(*symbol).map(|index| {
            build_info(
                format,
                code,
                symbol.to_string(),
                position_of(format, index),
                None,
                false,
                CurrencyConfidence::Low,
            )
        })
    })
}

fn position_of(format: &str, symbol_index: usize) -> CurrencyPosition {
    match first_digit_placeholder(format) {
        Some(digit_index) if digit_index < symbol_index => CurrencyPosition::Suffix,
        _ => CurrencyPosition::Prefix,
    }
}

fn build_info(
    format: &str,
    code: &str,
    symbol: String,
    position: CurrencyPosition,
    locale: Option<String>,
    decimal_comma: bool,
    confidence: CurrencyConfidence,
) -> CurrencyInfo {
    let code_part = mask_literals(format);
    let decimal_run = DECIMAL_RUN_REGEX.captures(&code_part);

    let decimal_places = match &decimal_run {
        Some(run) => run.get(1).map(|m| m.as_str().len()).unwrap_or(0) as u8,
        None if matches!(code, "JPY" | "KRW") => 0,
        None => 2,
    };

    let literal_decimal = decimal_run
        .as_ref()
        .and_then(|run| run.get(0))
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or('.');
    let literal_thousand = if literal_decimal == ',' { '.' } else { ',' };

    let (decimal_separator, thousand_separator) = if decimal_comma {
        (literal_thousand, literal_decimal)
    } else {
        (literal_decimal, literal_thousand)
    };

    CurrencyInfo {
        code: code.to_string(),
        symbol,
        position,
        decimal_places,
        decimal_separator,
        thousand_separator,
        locale,
        confidence,
    }
}
