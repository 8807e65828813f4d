//! Text cleanup and boolean synonyms.

const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{FEFF}', '\u{200C}', '\u{200D}'];

const TRUE_SYNONYMS: [&str; 7] = ["true", "yes", "y", "x", "✓", "✔", "☑"];
const FALSE_SYNONYMS: [&str; 6] = ["false", "no", "n", "✗", "✘", "☐"];

/// Strips zero-width characters and C0 controls (tab and line breaks
/// excepted, DEL kept), folds `\r\n` and lone `\r` into `\n`, then trims.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                cleaned.push('\n');
            }
            '\t' | '\n' => cleaned.push(c),
            c if ZERO_WIDTH.contains(&c) => {}
            '\u{0}'..='\u{1F}' => {}
            c => cleaned.push(c),
        }
    }
    cleaned.trim().to_string()
}

/// Case-insensitive match against the checkbox-style yes/no vocabulary.
///
/// `0` and `1` are not synonyms, numeric identifiers use them far too often.
pub fn boolean_synonym(text: &str) -> Option<bool> {
    let lowered = text.trim().to_lowercase();
    if TRUE_SYNONYMS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_SYNONYMS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}
