//! OCR text cleanup and paragraph structuring.
//!
//! OCR output arrives with carriage returns, ragged spacing, and runs of
//! blank lines. [`clean_text`] normalizes that into something the field
//! extractor can pattern-match reliably; [`to_structured`] groups the
//! cleaned text into paragraphs for callers that want layout hints.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref EXCESS_SPACING: Regex = Regex::new(r"[ \t]{2,}").unwrap();
}

/// Normalize raw OCR text.
///
/// Carriage returns become newlines, runs of three or more newlines collapse
/// to a paragraph break, runs of spaces/tabs collapse to a single space, and
/// the ends are trimmed.
pub fn clean_text(raw: &str) -> String {
    let unified = raw.replace('\r', "\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&unified, "\n\n");
    let spaced = EXCESS_SPACING.replace_all(&collapsed, " ");
    spaced.trim().to_string()
}

/// A cleaned document grouped into paragraphs of non-empty lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredText {
    /// Paragraphs in document order.
    pub paragraphs: Vec<Paragraph>,
}

/// A run of consecutive non-empty lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Trimmed lines in order.
    pub lines: Vec<String>,
}

/// Split text into paragraphs at blank lines.
///
/// Lines are trimmed; empty lines only act as paragraph separators and are
/// never emitted.
pub fn to_structured(text: &str) -> StructuredText {
    let mut paragraphs = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(Paragraph {
                    lines: std::mem::take(&mut current),
                });
            }
        } else {
            current.push(line.to_string());
        }
    }

    if !current.is_empty() {
        paragraphs.push(Paragraph { lines: current });
    }

    StructuredText { paragraphs }
}
