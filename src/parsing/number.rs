//! Locale-tolerant number parsing for text cells.
//!
//! Conventions are tried in order, first success wins:
//! US (`1,234.56`), European with space grouping (`1 234,56`), then
//! scientific notation (`1.5e3`).

use super::currency::known_symbols;
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, opt, recognize, verify},
    multi::many1,
    number::complete::double,
    sequence::{pair, preceded},
};
use once_cell::sync::Lazy;
use regex::Regex;

static CURRENCY_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{3}\b").expect("Failed to compile currency code regex"));

const US_THOUSANDS: &str = ",";
const EU_THOUSANDS: &str = " \u{a0}\u{202f}";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedNumber {
    pub value: f64,
    /// A trailing `%` was present.
    pub is_percentage: bool,
    /// A currency symbol or a three-letter code was stripped.
    pub had_currency: bool,
}

fn leading_group(input: &str) -> IResult<&str, &str> {
    verify(digit1, |digits: &str| digits.len() <= 3).parse(input)
}

fn thousands_group(input: &str) -> IResult<&str, &str> {
    verify(digit1, |digits: &str| digits.len() == 3).parse(input)
}

fn integer_part<'a>(
    separators: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        alt((
            recognize(pair(
                leading_group,
                many1(preceded(one_of(separators), thousands_group)),
            )),
            digit1,
        ))
        .parse(input)
    }
}

/// Sign, grouped integer digits and an optional fraction, nothing else.
fn grouped_number<'a>(
    input: &'a str,
    separators: &'static str,
    decimal: char,
) -> IResult<&'a str, (Option<char>, &'a str, Option<&'a str>)> {
    all_consuming((
        opt(one_of("+-")),
        integer_part(separators),
        opt(preceded(char(decimal), digit1)),
    ))
    .parse(input)
}

fn parse_convention(text: &str, separators: &'static str, decimal: char) -> Option<f64> {
    let (_, (sign, integer, fraction)) = grouped_number(text, separators, decimal).ok()?;
    let digits: String = integer.chars().filter(char::is_ascii_digit).collect();
    let canonical = format!(
        "{}{}.{}",
        if sign == Some('-') { "-" } else { "" },
        digits,
        fraction.unwrap_or("0")
    );
    canonical.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// `1,234.56`, `1234.5`, `-42`
pub fn parse_us_number(text: &str) -> Option<f64> {
    parse_convention(text, US_THOUSANDS, '.')
}

/// `1 234,56`, `1234,5`
pub fn parse_eu_spaced_number(text: &str) -> Option<f64> {
    parse_convention(text, EU_THOUSANDS, ',')
}

/// `1.5e10`, `-2E-3`. Requires an exponent.
pub fn parse_scientific(text: &str) -> Option<f64> {
    if !text.contains(['e', 'E']) {
        return None;
    }
    let result: IResult<&str, f64> = all_consuming(double).parse(text);
    match result {
        Ok((_, value)) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parses a human-authored number, tolerating currency markers, accounting
/// parentheses and a trailing percent sign.
///
/// Percentages above 1 in magnitude are divided by 100. Values already within
/// `[-1, 1]` are taken as fractions and kept as they are.
pub fn parse_number(text: &str) -> Option<ParsedNumber> {
    let mut candidate = text.trim().to_string();
    if candidate.is_empty() {
        return None;
    }

    let negative = candidate.starts_with('(') && candidate.ends_with(')');
    if negative {
        candidate = candidate[1..candidate.len() - 1].trim().to_string();
    }

    let mut had_currency = false;
    for symbol in known_symbols() {
        if candidate.contains(symbol) {
            candidate = candidate.replace(symbol, "");
            had_currency = true;
        }
    }
    if CURRENCY_CODE_REGEX.is_match(&candidate) {
        candidate = CURRENCY_CODE_REGEX.replace_all(&candidate, "").into_owned();
        had_currency = true;
    }

    let mut candidate = candidate.trim();
    let is_percentage = candidate.ends_with('%');
    if is_percentage {
        candidate = candidate[..candidate.len() - 1].trim_end();
    }
    if candidate.is_empty() {
        return None;
    }

    let mut value = parse_us_number(candidate)
        .or_else(|| parse_eu_spaced_number(candidate))
        .or_else(|| parse_scientific(candidate))?;

    if negative {
        value = -value.abs();
    }
    if is_percentage && value.abs() > 1.0 {
        value /= 100.0;
    }

    Some(ParsedNumber {
        value,
        is_percentage,
        had_currency,
    })
}
