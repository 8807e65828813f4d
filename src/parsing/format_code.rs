//! Classification helpers for Excel-style display-format strings.
//!
//! Readers normalize every producer's format metadata to this syntax
//! (`#,##0.00`, `mm/dd/yyyy`, `[$€-407] #,##0.00`, `0.00%`), so these checks
//! only look at the format code and never at the cell value.

use once_cell::sync::Lazy;
use regex::Regex;

static SLASHED_MONTH_DAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^a-z])[md]{1,2}/[md]{1,2}($|[^a-z])")
        .expect("Failed to compile month/day regex")
});

const DATE_TOKENS: [&str; 4] = ["yyyy", "yy", "dd", "mm"];

/// Replaces the bytes of bracketed sections (`[$€-407]`, `[Red]`) with
/// spaces, keeping byte offsets of everything else intact.
pub fn mask_brackets(format: &str) -> String {
    mask(format, false)
}

/// Same as [`mask_brackets`], quoted literals and `\x` escapes are masked too.
pub fn mask_literals(format: &str) -> String {
    mask(format, true)
}

fn mask(format: &str, quotes: bool) -> String {
    let mut masked = String::with_capacity(format.len());
    let mut in_bracket = false;
    let mut in_quote = false;
    let mut escaped = false;
    for c in format.chars() {
        let hide = if escaped {
            escaped = false;
            true
        } else if in_bracket {
            if c == ']' {
                in_bracket = false;
            }
            true
        } else if in_quote {
            if c == '"' {
                in_quote = false;
            }
            true
        } else if c == '[' {
            in_bracket = true;
            true
        } else if quotes && c == '"' {
            in_quote = true;
            true
        } else if quotes && c == '\\' {
            escaped = true;
            true
        } else {
            false
        };
        if hide {
            masked.extend(std::iter::repeat_n(' ', c.len_utf8()));
        } else {
            masked.push(c);
        }
    }
    masked
}

/// Whether the format renders a date or a time (`mm`, `dd`, `yyyy`, `yy`, `m/d`).
pub fn is_date_format(format: &str) -> bool {
    let code = mask_literals(format).to_lowercase();
    DATE_TOKENS.iter().any(|token| code.contains(token))
        || SLASHED_MONTH_DAY_REGEX.is_match(&code)
}

pub fn is_percentage_format(format: &str) -> bool {
    mask_literals(format).contains('%')
}

/// Whether the format lays out digits (`#` or `0` placeholders) without being a date.
pub fn is_numeric_format(format: &str) -> bool {
    let code = mask_literals(format);
    (code.contains('#') || code.contains('0')) && !is_date_format(format)
}

/// Byte offset of the first digit placeholder outside literals.
pub fn first_digit_placeholder(format: &str) -> Option<usize> {
    mask_literals(format).find(['#', '0'])
}
