//! Pattern-driven recovery of invoice fields with heuristic OCR repair.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{Correction, InvoiceFields};

use super::amount::parse_amount;
use super::patterns::{
    first_match, DATE_PATTERNS, DISCOUNT_PATTERNS, INVOICE_ID_PATTERNS, QUANTITY_PATTERN,
    SUBTOTAL_PATTERNS, TAX_AMOUNT_PATTERNS, TAX_PERCENT_PATTERNS, TOTAL_PATTERNS,
};

lazy_static! {
    // Identifier that lost its slash to OCR: INV directly followed by digits.
    static ref ID_MISSING_SLASH: Regex = Regex::new(r"(?i)^INV\d+").unwrap();
    static ref ID_SLASH_REPAIR: Regex = Regex::new(r"(?i)INV(\d+)").unwrap();
}

/// Everything one [`FieldExtractor::extract`] call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Recovered field values.
    pub fields: InvoiceFields,

    /// Corrections applied during extraction, in discovery order.
    pub corrections: Vec<Correction>,

    /// Input text after quantity-case normalization.
    pub normalized_text: String,
}

/// Rule-based field extractor with heuristic OCR repair.
///
/// Stateless across calls: every `extract` starts with a fresh correction
/// list, so one instance can serve any number of documents.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    /// Repair INVI and missing-slash invoice identifiers.
    repair_invoice_ids: bool,
    /// Log a correction when a tax value appears without its % sign.
    restore_tax_percent: bool,
    /// Lowercase quantity markers in the normalized text.
    normalize_quantities: bool,
}

impl FieldExtractor {
    /// Create an extractor with all repairs enabled.
    pub fn new() -> Self {
        Self {
            repair_invoice_ids: true,
            restore_tax_percent: true,
            normalize_quantities: true,
        }
    }

    /// Set invoice identifier repair.
    pub fn with_id_repair(mut self, enabled: bool) -> Self {
        self.repair_invoice_ids = enabled;
        self
    }

    /// Set percent-sign restoration.
    pub fn with_percent_restore(mut self, enabled: bool) -> Self {
        self.restore_tax_percent = enabled;
        self
    }

    /// Set quantity-case normalization.
    pub fn with_quantity_normalization(mut self, enabled: bool) -> Self {
        self.normalize_quantities = enabled;
        self
    }

    /// Extract the seven invoice fields from OCR text.
    ///
    /// Fields fail independently: a pattern miss or an unparseable candidate
    /// leaves that one field `None` and never blocks the others. Corrections
    /// accumulate in discovery order.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut corrections = Vec::new();

        info!("Extracting fields from {} characters of text", text.len());

        let fields = InvoiceFields {
            invoice_id: self.extract_invoice_id(text, &mut corrections),
            invoice_date: first_match(&DATE_PATTERNS, text),
            tax_percentage: self.extract_tax_percentage(text, &mut corrections),
            subtotal: first_match(&SUBTOTAL_PATTERNS, text)
                .as_deref()
                .and_then(parse_amount),
            tax_amount: first_match(&TAX_AMOUNT_PATTERNS, text)
                .as_deref()
                .and_then(parse_amount),
            discount: first_match(&DISCOUNT_PATTERNS, text)
                .as_deref()
                .and_then(parse_amount),
            total: first_match(&TOTAL_PATTERNS, text)
                .as_deref()
                .and_then(parse_amount),
        };

        let normalized_text = self.normalize_quantity_case(text, &mut corrections);

        debug!(
            "Extraction finished: invoice_id={:?}, {} corrections",
            fields.invoice_id,
            corrections.len()
        );

        Extraction {
            fields,
            corrections,
            normalized_text,
        }
    }

    fn extract_invoice_id(&self, text: &str, corrections: &mut Vec<Correction>) -> Option<String> {
        let raw = first_match(&INVOICE_ID_PATTERNS, text)?;

        if !self.repair_invoice_ids {
            return Some(raw);
        }

        // OCR reads the slash as a capital I.
        if raw.contains("INVI") {
            let repaired = raw.replace("INVI", "INV/");
            log_correction(
                corrections,
                Correction::text(&raw, &repaired, "Corrected INVI to INV/"),
            );
            return Some(repaired);
        }

        // Or drops the slash entirely.
        if ID_MISSING_SLASH.is_match(&raw) {
            let repaired = ID_SLASH_REPAIR.replace_all(&raw, "INV/${1}").into_owned();
            log_correction(
                corrections,
                Correction::text(&raw, &repaired, "Restored missing '/' in Invoice ID"),
            );
            return Some(repaired);
        }

        Some(raw)
    }

    fn extract_tax_percentage(
        &self,
        text: &str,
        corrections: &mut Vec<Correction>,
    ) -> Option<f64> {
        let raw = first_match(&TAX_PERCENT_PATTERNS, text)?;
        let value: f64 = raw.parse().ok()?;

        if self.restore_tax_percent {
            // Find the label+value occurrence in the text; no % there means
            // OCR dropped the sign. Text-level correction only, the numeric
            // field is already parsed.
            if let Ok(probe) = Regex::new(&format!(r"(?i)tax\s*[:\s]*{}", regex::escape(&raw))) {
                if let Some(m) = probe.find(text) {
                    if !m.as_str().contains('%') {
                        log_correction(
                            corrections,
                            Correction::text(
                                m.as_str(),
                                format!("{}%", m.as_str()),
                                "Restored missing '%' in tax field",
                            ),
                        );
                    }
                }
            }
        }

        Some(value)
    }

    fn normalize_quantity_case(
        &self,
        text: &str,
        corrections: &mut Vec<Correction>,
    ) -> String {
        if !self.normalize_quantities {
            return text.to_string();
        }

        let mut normalized = text.to_string();
        for m in QUANTITY_PATTERN.find_iter(text) {
            let original = m.as_str();
            let corrected = original.to_lowercase();
            if original != corrected {
                normalized = normalized.replace(original, &corrected);
                log_correction(
                    corrections,
                    Correction::text(original, &corrected, "Normalized quantity case"),
                );
            }
        }
        normalized
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn log_correction(corrections: &mut Vec<Correction>, correction: Correction) {
    if correction.original != correction.corrected {
        debug!("Correction applied: {}", correction.reason);
        corrections.push(correction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_canonical_invoice() {
        let text = r#"
            RedmineCRM Invoice
            Invoice ID: INVI20111209-22
            Sub total: 835.00
            Tax (18.0%): 150.30
            Discount (10.0%): -83.50
            Total (EUR): 901.80
            X1.0 hours
        "#;

        let extraction = FieldExtractor::new().extract(text);
        let fields = &extraction.fields;

        assert_eq!(fields.invoice_id.as_deref(), Some("INV/20111209-22"));
        assert_eq!(fields.tax_percentage, Some(18.0));
        assert_eq!(fields.subtotal, Some(835.0));
        assert_eq!(fields.tax_amount, Some(150.30));
        assert_eq!(fields.discount, Some(-83.50));
        assert_eq!(fields.total, Some(901.80));

        // INVI repair first, quantity normalization last.
        assert_eq!(extraction.corrections.len(), 2);
        assert_eq!(extraction.corrections[0].reason, "Corrected INVI to INV/");
        assert_eq!(extraction.corrections[1].reason, "Normalized quantity case");
        assert!(extraction.normalized_text.contains("x1.0 hours"));
    }

    #[test]
    fn test_invoice_id_invi_repair() {
        let extraction = FieldExtractor::new().extract("Invoice ID: INVI20111209-22");

        assert_eq!(
            extraction.fields.invoice_id.as_deref(),
            Some("INV/20111209-22")
        );
        assert_eq!(extraction.corrections.len(), 1);
        assert_eq!(extraction.corrections[0].reason, "Corrected INVI to INV/");
        assert_eq!(
            extraction.corrections[0].original,
            serde_json::json!("INVI20111209-22")
        );
    }

    #[test]
    fn test_invoice_id_missing_slash_repair() {
        let extraction = FieldExtractor::new().extract("Invoice ID: INV20111209-22");

        assert_eq!(
            extraction.fields.invoice_id.as_deref(),
            Some("INV/20111209-22")
        );
        assert_eq!(
            extraction.corrections[0].reason,
            "Restored missing '/' in Invoice ID"
        );
    }

    #[test]
    fn test_invoice_id_already_canonical() {
        let extraction = FieldExtractor::new().extract("Invoice ID: INV/20111209-22");

        assert_eq!(
            extraction.fields.invoice_id.as_deref(),
            Some("INV/20111209-22")
        );
        assert!(extraction.corrections.is_empty());
    }

    #[test]
    fn test_invoice_id_repair_disabled() {
        let extractor = FieldExtractor::new().with_id_repair(false);
        let extraction = extractor.extract("Invoice ID: INVI20111209-22");

        assert_eq!(
            extraction.fields.invoice_id.as_deref(),
            Some("INVI20111209-22")
        );
        assert!(extraction.corrections.is_empty());
    }

    #[test]
    fn test_date_formats() {
        let extractor = FieldExtractor::new();

        assert_eq!(
            extractor.extract("Date: 12/09/2011").fields.invoice_date.as_deref(),
            Some("12/09/2011")
        );
        assert_eq!(
            extractor.extract("Date: 2011-09-12").fields.invoice_date.as_deref(),
            Some("2011-09-12")
        );
        assert_eq!(
            extractor.extract("Date: 12-09-2011").fields.invoice_date.as_deref(),
            Some("12-09-2011")
        );
        assert_eq!(extractor.extract("no date here").fields.invoice_date, None);
    }

    #[test]
    fn test_tax_percent_restore() {
        // The parenthesized occurrence carries the %, a later bare mention
        // lost it; the probe finds the bare one.
        let text = "Tax (18.0%): 150.30\nvat note: tax 18.0 applied";
        let extraction = FieldExtractor::new().extract(text);

        assert_eq!(extraction.fields.tax_percentage, Some(18.0));
        assert_eq!(extraction.corrections.len(), 1);
        assert_eq!(
            extraction.corrections[0].reason,
            "Restored missing '%' in tax field"
        );
        assert_eq!(extraction.corrections[0].original, serde_json::json!("tax 18.0"));
        assert_eq!(
            extraction.corrections[0].corrected,
            serde_json::json!("tax 18.0%")
        );
    }

    #[test]
    fn test_tax_percent_intact_logs_nothing() {
        let extraction = FieldExtractor::new().extract("Tax (18.0%): 150.30");

        assert_eq!(extraction.fields.tax_percentage, Some(18.0));
        assert!(extraction.corrections.is_empty());
    }

    #[test]
    fn test_tax_percent_dropped_sign_fallback() {
        // Parenthesized but signless, picked up by the fallback pattern.
        let extraction = FieldExtractor::new().extract("Tax (18.09): 150.30");

        assert_eq!(extraction.fields.tax_percentage, Some(18.09));
    }

    #[test]
    fn test_monetary_fields_independent() {
        let extraction = FieldExtractor::new().extract("Sub total: 835.00");
        let fields = &extraction.fields;

        assert_eq!(fields.subtotal, Some(835.0));
        // The bare total fallback also latches onto the "total" inside
        // "Sub total"; first-match-wins keeps that behavior as is.
        assert_eq!(fields.total, Some(835.0));
        assert_eq!(fields.tax_amount, None);
        assert_eq!(fields.discount, None);
    }

    #[test]
    fn test_quantity_normalization() {
        let extraction = FieldExtractor::new().extract("Projecting X1.0 hours");

        assert!(extraction.normalized_text.contains("x1.0"));
        assert_eq!(extraction.corrections.len(), 1);
        assert_eq!(extraction.corrections[0].reason, "Normalized quantity case");
    }

    #[test]
    fn test_quantity_already_lowercase() {
        let extraction = FieldExtractor::new().extract("Projecting x1.0 hours");

        assert_eq!(extraction.normalized_text, "Projecting x1.0 hours");
        assert!(extraction.corrections.is_empty());
    }

    #[test]
    fn test_corrections_reset_between_calls() {
        let extractor = FieldExtractor::new();

        let first = extractor.extract("Invoice ID: INVI20111209-22");
        assert_eq!(first.corrections.len(), 1);

        let second = extractor.extract("Invoice ID: INV/20111209-22");
        assert!(second.corrections.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let extraction = FieldExtractor::new().extract("");

        assert!(extraction.fields.is_empty());
        assert!(extraction.corrections.is_empty());
        assert_eq!(extraction.normalized_text, "");
    }
}
