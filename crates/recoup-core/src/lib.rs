//! Core library for recovering structured invoice data from OCR text.
//!
//! This crate provides:
//! - OCR text cleanup and paragraph structuring
//! - Rule-based extraction of invoice fields (id, date, amounts, tax)
//! - Math-based validation and reconciliation of the extracted fields
//! - Engine routing over a pluggable document classifier
//! - CER/WER metrics for evaluating OCR output

pub mod error;
pub mod extract;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod route;
pub mod text;
pub mod validate;

pub use error::{RecoupError, Result};
pub use extract::{parse_amount, Extraction, FieldExtractor};
pub use models::{Correction, InvoiceFields, RecoupConfig};
pub use pipeline::{DocumentReport, Pipeline};
pub use route::{Classification, DocumentClassifier, DocumentType, EngineKind, EngineRouter, RouteDecision};
pub use text::{clean_text, to_structured, StructuredText};
pub use validate::{FieldValidator, Validated, ValidationReport, ValidationStatus};
