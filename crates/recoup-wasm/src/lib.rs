//! WASM bindings for invoice field recovery.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Text goes in, plain JS objects come out; OCR itself happens on the JS side.

use wasm_bindgen::prelude::*;

use recoup_core::models::InvoiceFields;
use recoup_core::pipeline::Pipeline;
use recoup_core::validate::FieldValidator;
use recoup_core::FieldExtractor;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Normalize raw OCR text (line endings, spacing, blank-line runs).
#[wasm_bindgen]
pub fn clean_text(text: &str) -> String {
    recoup_core::clean_text(text)
}

/// Parse a currency amount with ambiguous separators.
///
/// Handles both `1.234,56` and `1,234.56`; returns `undefined` when nothing
/// parseable remains.
#[wasm_bindgen]
pub fn parse_amount(text: &str) -> Option<f64> {
    recoup_core::parse_amount(text)
}

/// Extract invoice fields from OCR text.
///
/// Returns `{ fields, corrections, normalized_text }` without validation.
#[wasm_bindgen]
pub fn extract_fields(text: &str) -> Result<JsValue, JsValue> {
    let extraction = FieldExtractor::new().extract(&recoup_core::clean_text(text));
    to_js(&extraction)
}

/// Run the full pipeline: cleanup, extraction, validation.
///
/// Returns the complete document report including validation status,
/// errors and the combined correction list.
#[wasm_bindgen]
pub fn process_document(text: &str) -> Result<JsValue, JsValue> {
    let report = Pipeline::new().process(text);
    to_js(&report)
}

/// Invoice scanner class for browser use.
#[wasm_bindgen]
pub struct InvoiceScanner {
    pipeline: Pipeline,
    validator: FieldValidator,
}

#[wasm_bindgen]
impl InvoiceScanner {
    /// Create a scanner with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(),
            validator: FieldValidator::new(),
        }
    }

    /// Set the absolute tolerance used for arithmetic checks.
    #[wasm_bindgen]
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.validator = FieldValidator::new().with_tolerance(tolerance);
        self.pipeline = Pipeline::new().with_validator(self.validator.clone());
    }

    /// Extract fields from OCR text without validation.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let extraction = FieldExtractor::new().extract(&recoup_core::clean_text(text));
        to_js(&extraction)
    }

    /// Validate a field mapping given as a JSON string.
    ///
    /// Returns `{ fields, report }` with the corrected field copy.
    #[wasm_bindgen]
    pub fn validate_json(&self, fields_json: &str) -> Result<JsValue, JsValue> {
        let fields: InvoiceFields = serde_json::from_str(fields_json)
            .map_err(|e| js_sys::Error::new(&format!("invalid field JSON: {}", e)))?;

        to_js(&self.validator.validate(&fields))
    }

    /// Run the full pipeline on OCR text.
    #[wasm_bindgen]
    pub fn process(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.pipeline.process(text))
    }
}

impl Default for InvoiceScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("-83.50"), Some(-83.50));
        assert_eq!(parse_amount("no digits"), None);
    }

    #[wasm_bindgen_test]
    fn test_clean_text() {
        assert_eq!(clean_text("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[wasm_bindgen_test]
    fn test_extract_fields_returns_object() {
        let value = extract_fields("Invoice ID: INVI20111209-22").unwrap();
        assert!(value.is_object());
    }

    #[wasm_bindgen_test]
    fn test_scanner_validate_json() {
        let scanner = InvoiceScanner::new();
        let value = scanner
            .validate_json(r#"{"subtotal": 835.0, "tax_amount": 150.30, "discount": -83.50, "total": 901.80}"#)
            .unwrap();
        assert!(value.is_object());
    }

    #[wasm_bindgen_test]
    fn test_scanner_rejects_bad_json() {
        let scanner = InvoiceScanner::new();
        assert!(scanner.validate_json("{not json").is_err());
    }
}
