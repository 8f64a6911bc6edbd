//! Locale-tolerant parsing of monetary amount strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DECIMAL_COMMA: Regex = Regex::new(r",\d{2}$").unwrap();
}

/// Parse a currency amount with ambiguous separators into a float.
///
/// Strips everything except digits, `.`, `,` and `-`, then decides which
/// separator is the decimal point: when both appear, the one occurring later
/// wins; a lone comma is decimal only when exactly two digits follow it at
/// the end of the string. `1.234,56`, `1,234.56` and `1234,56` all parse to
/// `1234.56`; a leading minus survives. Returns `None` when nothing
/// parseable remains. No rounding is applied.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');

    let normalized = if has_comma && has_dot {
        match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            _ => cleaned.replace(',', ""),
        }
    } else if has_comma {
        if DECIMAL_COMMA.is_match(&cleaned) {
            cleaned.replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else {
        cleaned
    };

    normalized.parse::<f64>().ok()
}
