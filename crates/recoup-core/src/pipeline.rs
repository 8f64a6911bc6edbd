//! End-to-end document processing: cleanup, extraction, validation.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::FieldExtractor;
use crate::models::{Correction, InvoiceFields, RecoupConfig};
use crate::text::{clean_text, to_structured, StructuredText};
use crate::validate::{FieldValidator, ValidationStatus};

/// Full report for one processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Cleaned text after quantity-case normalization.
    pub text: String,
    /// Paragraph and line breakdown of the normalized text.
    pub structured: StructuredText,
    /// Extracted fields with validation corrections applied.
    pub fields: InvoiceFields,
    pub status: ValidationStatus,
    pub errors: Vec<String>,
    /// Extraction corrections followed by validation corrections.
    pub corrections: Vec<Correction>,
    pub processing_time_ms: u64,
}

/// Pipeline combining text cleanup, field extraction and validation.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: FieldExtractor,
    validator: FieldValidator,
}

impl Pipeline {
    /// Create a pipeline with default extractor and validator settings.
    pub fn new() -> Self {
        Self {
            extractor: FieldExtractor::new(),
            validator: FieldValidator::new(),
        }
    }

    /// Create a pipeline honoring the heuristic toggles and tolerance in `config`.
    pub fn from_config(config: &RecoupConfig) -> Self {
        Self {
            extractor: FieldExtractor::new()
                .with_id_repair(config.extraction.repair_invoice_ids)
                .with_percent_restore(config.extraction.restore_tax_percent)
                .with_quantity_normalization(config.extraction.normalize_quantities),
            validator: FieldValidator::new().with_tolerance(config.validation.tolerance),
        }
    }

    /// Replace the field extractor.
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the field validator.
    pub fn with_validator(mut self, validator: FieldValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Process one document's OCR text.
    pub fn process(&self, raw_text: &str) -> DocumentReport {
        let start = Instant::now();

        // Step 1: Normalize whitespace and line structure
        let cleaned = clean_text(raw_text);

        // Step 2: Extract fields and apply in-text repairs
        let extraction = self.extractor.extract(&cleaned);

        // Step 3: Validate and reconcile the extracted fields
        let validated = self.validator.validate(&extraction.fields);

        let mut corrections = extraction.corrections;
        corrections.extend(validated.report.corrections);

        let structured = to_structured(&extraction.normalized_text);

        let report = DocumentReport {
            text: extraction.normalized_text,
            structured,
            fields: validated.fields,
            status: validated.report.status,
            errors: validated.report.errors,
            corrections,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Document processed: status={}, {} corrections in {}ms",
            report.status,
            report.corrections.len(),
            report.processing_time_ms
        );

        report
    }

    /// Process multiple documents.
    pub fn process_batch(&self, texts: &[String]) -> Vec<DocumentReport> {
        texts.iter().map(|text| self.process(text)).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionConfig;
    use pretty_assertions::assert_eq;

    const NOISY_INVOICE: &str = r#"RedmineCRM   Invoice


Invoice ID: INVI20111209-22
Invoice Date: 09/12/2011

Programming work   X1.0 hours

Sub total: 835.00
Tax (18.0%): 150.30
Discount (10.0%): -83.50
Total (EUR): 901.80"#;

    #[test]
    fn test_noisy_invoice_end_to_end() {
        let report = Pipeline::new().process(NOISY_INVOICE);

        assert_eq!(report.status, ValidationStatus::Valid);
        assert!(report.errors.is_empty());

        assert_eq!(report.fields.invoice_id.as_deref(), Some("INV/20111209-22"));
        assert_eq!(report.fields.invoice_date.as_deref(), Some("09/12/2011"));
        assert_eq!(report.fields.tax_percentage, Some(18.0));
        assert_eq!(report.fields.subtotal, Some(835.0));
        assert_eq!(report.fields.tax_amount, Some(150.30));
        assert_eq!(report.fields.discount, Some(-83.50));
        assert_eq!(report.fields.total, Some(901.80));

        // Cleanup collapsed the double spacing and extra blank lines.
        assert!(report.text.contains("RedmineCRM Invoice"));
        assert!(!report.text.contains("\n\n\n"));

        // Quantity normalization shows in the text; the id repair is
        // field-level and leaves the text untouched.
        assert!(report.text.contains("x1.0 hours"));
        assert!(report.text.contains("INVI20111209-22"));

        // One correction for the id repair, one for the quantity marker.
        assert_eq!(report.corrections.len(), 2);
        assert_eq!(
            report.corrections[0].original,
            serde_json::json!("INVI20111209-22")
        );
        assert_eq!(report.corrections[1].original, serde_json::json!("X1.0"));
    }

    #[test]
    fn test_validation_corrections_follow_extraction_corrections() {
        // No tax amount on the document, so validation infers it from the
        // percentage after extraction repaired the id.
        let text = "Invoice ID: INVI20111209-22\nSub total: 835.00\nTax (18.0%)\nDiscount: -83.50\nTotal (EUR): 901.80";
        let report = Pipeline::new().process(text);

        assert_eq!(report.status, ValidationStatus::Corrected);
        assert_eq!(report.corrections.len(), 2);
        assert_eq!(report.corrections[0].field, None);
        assert_eq!(report.corrections[1].field.as_deref(), Some("tax_amount"));
        assert_eq!(report.fields.tax_amount, Some(150.3));
    }

    #[test]
    fn test_structured_output_follows_normalized_text() {
        let report = Pipeline::new().process("Invoice ID: INV/20111209-22\n\n\n\nTotal: 100.00");

        assert_eq!(report.structured.paragraphs.len(), 2);
        assert_eq!(
            report.structured.paragraphs[0].lines,
            vec!["Invoice ID: INV/20111209-22".to_string()]
        );
    }

    #[test]
    fn test_from_config_disables_heuristics() {
        let mut config = RecoupConfig::default();
        config.extraction = ExtractionConfig {
            repair_invoice_ids: false,
            restore_tax_percent: false,
            normalize_quantities: false,
        };

        let report = Pipeline::from_config(&config).process("Invoice ID: INVI20111209-22");

        assert_eq!(
            report.fields.invoice_id.as_deref(),
            Some("INVI20111209-22")
        );
        assert!(report.corrections.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let report = Pipeline::new().process("");

        assert_eq!(report.status, ValidationStatus::Invalid);
        assert!(report.fields.is_empty());
        assert_eq!(
            report.errors,
            vec![
                "Missing total amount".to_string(),
                "Missing subtotal amount".to_string(),
            ]
        );
    }
}
