//! Rule-based field extraction from OCR text.

pub mod amount;
pub mod extractor;
pub mod patterns;

pub use amount::parse_amount;
pub use extractor::{Extraction, FieldExtractor};
pub use patterns::first_match;
