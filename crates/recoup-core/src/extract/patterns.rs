//! Field extraction patterns for invoice OCR text.
//!
//! Each field gets an ordered list of patterns tried first-match-wins: the
//! first pattern that matches anywhere in the text decides, with no scoring
//! or best-match search. A pattern with a capture group yields group 1, a
//! pattern without yields the full match. The strict patterns are separate
//! and define the canonical shape a field must have after extraction and
//! correction; the validator checks against those.

use lazy_static::lazy_static;
use regex::Regex;

/// Currency amount: optional sign, up to three leading digits, optional
/// `.`/`,` thousands groups, two-digit cents.
pub const AMOUNT: &str = r"-?\d{1,3}(?:[.,]\d{3})*[.,]\d{2}";

lazy_static! {
    // Canonical field shapes, used by the validator's format checks.
    pub static ref STRICT_INVOICE_ID: Regex = Regex::new(r"^INV/\d{8}-\d+$").unwrap();
    pub static ref STRICT_DATE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
    pub static ref STRICT_PERCENT: Regex = Regex::new(r"^\d+(\.\d+)?%$").unwrap();

    // Invoice identifier: labeled forms first, then a bare token where OCR
    // often misreads the slash (INVI..., INV2011...).
    pub static ref INVOICE_ID_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)invoice\s*id[:\s]*([A-Z0-9/-]+)").unwrap(),
        Regex::new(r"(?i)invoice\s*#[:\s]*([A-Z0-9/-]+)").unwrap(),
        Regex::new(r"(?i)inv[i/]?\d{8}-\d+").unwrap(),
    ];

    // Date formats, matched verbatim: DD/MM/YYYY, YYYY-MM-DD, DD-MM-YYYY.
    pub static ref DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d{2}/\d{2}/\d{4})").unwrap(),
        Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap(),
        Regex::new(r"(\d{2}-\d{2}-\d{4})").unwrap(),
    ];

    // Tax rate: parenthesized percent, bare percent, then a parenthesized
    // number with no % sign (the sign is a frequent OCR casualty).
    pub static ref TAX_PERCENT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)tax\s*\(([\d.]+)%\)").unwrap(),
        Regex::new(r"(?i)tax\s*([\d.]+)%").unwrap(),
        Regex::new(r"(?i)tax\s*\(([\d.]+)\)").unwrap(),
    ];

    pub static ref SUBTOTAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(&format!(r"(?i)sub\s*total[:\s]*({AMOUNT})")).unwrap(),
        Regex::new(&format!(r"(?i)subtotal[:\s]*({AMOUNT})")).unwrap(),
    ];

    // Total with an optional 3-letter currency code in parentheses, e.g.
    // "Total (EUR): 901.80". The labeled form goes first so a bare "total"
    // inside "sub total" cannot steal the match.
    pub static ref TOTAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(&format!(r"(?i)total\s*\(?[A-Z]{{3}}\)?[:\s]*({AMOUNT})")).unwrap(),
        Regex::new(&format!(r"(?i)total[:\s]*({AMOUNT})")).unwrap(),
    ];

    pub static ref TAX_AMOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(&format!(r"(?i)tax\s*\([\d.]+%?\)[:\s]*({AMOUNT})")).unwrap(),
        Regex::new(&format!(r"(?i)tax[:\s]*({AMOUNT})")).unwrap(),
    ];

    pub static ref DISCOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(&format!(r"(?i)discount\s*\([\d.]+%?\)[:\s]*({AMOUNT})")).unwrap(),
        Regex::new(&format!(r"(?i)discount[:\s]*({AMOUNT})")).unwrap(),
    ];

    // Quantity marker like "X1.0"; used only for text normalization.
    pub static ref QUANTITY_PATTERN: Regex = Regex::new(r"(?i)x\s*(\d+(?:\.\d+)?)").unwrap();
}

/// Try patterns in order; the first one that matches wins.
///
/// Returns capture group 1 when the pattern defines one, otherwise the full
/// match.
pub fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}
