//! Field validation and math-based reconciliation.
//!
//! The validator checks a set of extracted invoice fields for format,
//! range and arithmetic consistency. It never mutates its input; inferred
//! values land in the copy carried by [`Validated`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::extract::patterns::{STRICT_DATE, STRICT_INVOICE_ID};
use crate::models::{Correction, InvoiceFields};

/// Overall outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No errors and no corrections.
    Valid,
    /// No errors, but at least one field was corrected.
    Corrected,
    /// At least one error.
    Invalid,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Corrected => "corrected",
            ValidationStatus::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors and corrections collected while validating one field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    /// Human-readable problems, in discovery order.
    pub errors: Vec<String>,
    /// Corrections applied to the field copy, in discovery order.
    pub corrections: Vec<Correction>,
}

/// A validation report together with the (possibly corrected) field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validated {
    pub fields: InvoiceFields,
    pub report: ValidationReport,
}

/// Validates extracted invoice fields against format rules and arithmetic.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    tolerance: f64,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self { tolerance: 0.01 }
    }

    /// Sets the absolute tolerance used for all float comparisons.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Runs all checks against `fields` and returns the report plus an
    /// updated copy of the fields. The input is left untouched.
    pub fn validate(&self, fields: &InvoiceFields) -> Validated {
        let mut updated = fields.clone();
        let mut errors: Vec<String> = Vec::new();
        let mut corrections: Vec<Correction> = Vec::new();

        // 1. Strict format checks; absent fields are handled by the
        //    existence checks below, not here.
        check_format(
            &mut errors,
            "invoice_id",
            updated.invoice_id.as_deref(),
            &STRICT_INVOICE_ID,
        );
        check_format(
            &mut errors,
            "invoice_date",
            updated.invoice_date.as_deref(),
            &STRICT_DATE,
        );

        // 2. Tax rate must be a sane percentage.
        if let Some(percent) = updated.tax_percentage {
            if !(0.0..=100.0).contains(&percent) {
                errors.push(format!("Invalid tax percentage: {percent}"));
            }
        }

        // 3. 18.09 is a known misread of "18.0" followed by a stray glyph.
        //    Accept the correction only when the amounts confirm an 18% rate.
        if updated.tax_percentage == Some(18.09) {
            if let (Some(subtotal), Some(tax_amount)) = (updated.subtotal, updated.tax_amount) {
                if is_close(subtotal * 0.18, tax_amount, self.tolerance) {
                    corrections.push(Correction::field(
                        "tax_percentage",
                        Value::from(18.09),
                        Value::from(18.0),
                        "Corrected misread 18.09 to 18.0 based on math",
                    ));
                    updated.tax_percentage = Some(18.0);
                }
            }
        }

        // 4. Arithmetic consistency: subtotal + tax + discount == total.
        //    A missing discount counts as zero in this step only.
        let discount = updated.discount.unwrap_or(0.0);
        if let (Some(subtotal), Some(total)) = (updated.subtotal, updated.total) {
            let calculated_tax = updated.tax_amount.unwrap_or(0.0);
            let expected_total = subtotal + calculated_tax + discount;

            if !is_close(expected_total, total, self.tolerance) {
                if let Some(percent) = updated.tax_percentage {
                    let estimated_tax = round2(subtotal * percent / 100.0);
                    let expected_with_tax = subtotal + estimated_tax + discount;

                    if is_close(expected_with_tax, total, self.tolerance) {
                        let already_close = updated
                            .tax_amount
                            .is_some_and(|t| is_close(t, estimated_tax, self.tolerance));
                        if !already_close {
                            corrections.push(Correction::field(
                                "tax_amount",
                                updated.tax_amount.map_or(Value::Null, Value::from),
                                Value::from(estimated_tax),
                                format!("Inferred from tax_percent ({percent}%)"),
                            ));
                            updated.tax_amount = Some(estimated_tax);
                        }
                    } else if subtotal > 0.0 {
                        let suggested = round1((total - subtotal - discount) / subtotal * 100.0);
                        errors.push(format!(
                            "{}. Suggested tax%: {suggested}%",
                            math_error(subtotal, updated.tax_amount, discount, total)
                        ));
                    } else {
                        errors.push(math_error(subtotal, updated.tax_amount, discount, total));
                    }
                } else {
                    errors.push(math_error(subtotal, updated.tax_amount, discount, total));
                }
            }
        }

        // 5. Existence checks, independent of the arithmetic outcome.
        if updated.total.is_none() {
            errors.push("Missing total amount".to_string());
        }
        if updated.subtotal.is_none() {
            errors.push("Missing subtotal amount".to_string());
        }

        let status = if !errors.is_empty() {
            ValidationStatus::Invalid
        } else if !corrections.is_empty() {
            ValidationStatus::Corrected
        } else {
            ValidationStatus::Valid
        };

        debug!(
            "Validation finished: status={}, {} errors, {} corrections",
            status,
            errors.len(),
            corrections.len()
        );

        Validated {
            fields: updated,
            report: ValidationReport {
                status,
                errors,
                corrections,
            },
        }
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn check_format(errors: &mut Vec<String>, field: &str, value: Option<&str>, pattern: &Regex) {
    if let Some(value) = value {
        if !pattern.is_match(value) {
            errors.push(format!(
                "Format error: {field} '{value}' does not match pattern {}",
                pattern.as_str()
            ));
        }
    }
}

fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn fmt_tax(value: Option<f64>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

fn math_error(subtotal: f64, tax_amount: Option<f64>, discount: f64, total: f64) -> String {
    format!(
        "Math inconsistency: subtotal({subtotal}) + tax({}) + discount({discount}) != total({total})",
        fmt_tax(tax_amount)
    )
}
