//! Data models for extracted fields and pipeline configuration.

pub mod config;
pub mod fields;

pub use config::{ExtractionConfig, RecoupConfig, RoutingConfig, ValidationConfig};
pub use fields::{Correction, InvoiceFields};
