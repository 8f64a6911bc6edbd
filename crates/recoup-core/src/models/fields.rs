//! Extracted invoice fields and correction records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The seven canonical invoice fields recovered from OCR text.
///
/// Every field is optional: a pattern miss or an unparseable candidate
/// resolves to `None`, never to a placeholder value. Serialized JSON keeps
/// explicit nulls so downstream consumers see the full schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceFields {
    /// Invoice identifier, canonical form `INV/XXXXXXXX-N`.
    pub invoice_id: Option<String>,

    /// Invoice date as the raw matched substring, never parsed to a date type.
    pub invoice_date: Option<String>,

    /// Tax rate in percent, expected within 0..=100.
    pub tax_percentage: Option<f64>,

    /// Net amount before tax.
    pub subtotal: Option<f64>,

    /// Tax amount.
    pub tax_amount: Option<f64>,

    /// Discount amount; negative values represent a reduction.
    pub discount: Option<f64>,

    /// Gross total.
    pub total: Option<f64>,
}

impl InvoiceFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no field was recovered at all.
    pub fn is_empty(&self) -> bool {
        self.invoice_id.is_none()
            && self.invoice_date.is_none()
            && self.tax_percentage.is_none()
            && self.subtotal.is_none()
            && self.tax_amount.is_none()
            && self.discount.is_none()
            && self.total.is_none()
    }
}

/// A logged automatic adjustment, distinct from a validation error.
///
/// `field` names the corrected field; when absent the correction applies to
/// the document text itself. `original` and `corrected` carry whatever
/// crossed the boundary: a string, a number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    /// Field the correction applies to; `None` for text-level corrections.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub field: Option<String>,

    /// Value before the correction.
    pub original: Value,

    /// Value after the correction.
    pub corrected: Value,

    /// Human-readable reason.
    pub reason: String,
}

impl Correction {
    /// A correction applied to the document text or a raw candidate string.
    pub fn text(
        original: impl Into<String>,
        corrected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: None,
            original: Value::String(original.into()),
            corrected: Value::String(corrected.into()),
            reason: reason.into(),
        }
    }

    /// A correction applied to a named field.
    pub fn field(
        field: impl Into<String>,
        original: Value,
        corrected: Value,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: Some(field.into()),
            original,
            corrected,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fields_serialize_with_explicit_nulls() {
        let fields = InvoiceFields {
            subtotal: Some(835.0),
            ..InvoiceFields::new()
        };

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["subtotal"], serde_json::json!(835.0));
        assert!(json["invoice_id"].is_null());
        assert!(json["total"].is_null());
    }

    #[test]
    fn test_fields_deserialize_missing_keys_as_null() {
        let fields: InvoiceFields =
            serde_json::from_str(r#"{"subtotal": 100.0, "total": 120.0}"#).unwrap();

        assert_eq!(fields.subtotal, Some(100.0));
        assert_eq!(fields.total, Some(120.0));
        assert_eq!(fields.tax_amount, None);
        assert_eq!(fields.invoice_id, None);
    }

    #[test]
    fn test_is_empty() {
        assert!(InvoiceFields::new().is_empty());

        let fields = InvoiceFields {
            invoice_date: Some("12/09/2011".to_string()),
            ..InvoiceFields::new()
        };
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_text_correction_omits_field_key() {
        let correction = Correction::text("X1.0", "x1.0", "Normalized quantity case");

        let json = serde_json::to_value(&correction).unwrap();
        assert!(json.get("field").is_none());
        assert_eq!(json["original"], "X1.0");
        assert_eq!(json["corrected"], "x1.0");
    }

    #[test]
    fn test_field_correction_round_trip() {
        let correction = Correction::field(
            "tax_amount",
            Value::Null,
            Value::from(150.3),
            "Inferred from tax_percent (18%)",
        );

        let json = serde_json::to_string(&correction).unwrap();
        let back: Correction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, correction);
        assert_eq!(back.field.as_deref(), Some("tax_amount"));
    }
}
