//! Document classification boundary and OCR engine routing.
//!
//! The classifier itself stays behind [`DocumentClassifier`]; this module
//! only decides which engine a document should be read with.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Document categories the router can dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Invoice,
    Receipt,
    Note,
    Form,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Receipt => "receipt",
            DocumentType::Note => "note",
            DocumentType::Form => "form",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// OCR engines a document can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Transformer recognizer, best on printed invoice/receipt layouts.
    TrOcr,
    /// General-purpose engine, also the fallback.
    EasyOcr,
    /// Both engines with result merging.
    Hybrid,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::TrOcr => "trocr",
            EngineKind::EasyOcr => "easyocr",
            EngineKind::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifier verdict for one document image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: DocumentType,
    pub confidence: f32,
}

/// Trait for document-type classifiers.
///
/// Implementations wrap whatever model produces the label; the router
/// depends only on this interface.
pub trait DocumentClassifier: Send + Sync {
    /// Classify a document image given as raw encoded bytes.
    fn predict(&self, image: &[u8]) -> Result<Classification>;
}

/// Outcome of routing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub document_type: DocumentType,
    pub confidence: f32,
    pub engine: EngineKind,
    /// Human-readable explanation of the choice.
    pub reasoning: String,
}

/// Routes documents to an OCR engine based on their classified type.
pub struct EngineRouter<C: DocumentClassifier> {
    classifier: C,
    min_confidence: f32,
}

impl<C: DocumentClassifier> EngineRouter<C> {
    /// Create a router with the default confidence floor of 0.5.
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            min_confidence: 0.5,
        }
    }

    /// Set the confidence floor below which routing falls back to easyocr.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Pick an engine for the document image.
    ///
    /// Never fails: a classifier error or a low-confidence verdict both
    /// fall back to the general-purpose engine.
    pub fn route(&self, image: &[u8]) -> RouteDecision {
        match self.classifier.predict(image) {
            Ok(classification) if classification.confidence < self.min_confidence => {
                debug!(
                    "Confidence {:.2} below floor {:.2}, falling back",
                    classification.confidence, self.min_confidence
                );
                RouteDecision {
                    document_type: classification.label,
                    confidence: classification.confidence,
                    engine: EngineKind::EasyOcr,
                    reasoning: format!(
                        "Low confidence ({:.2}) for {}, using general-purpose engine",
                        classification.confidence, classification.label
                    ),
                }
            }
            Ok(classification) => {
                let engine = engine_for(classification.label);
                debug!(
                    "Classified as {} ({:.2}), routing to {}",
                    classification.label, classification.confidence, engine
                );
                RouteDecision {
                    document_type: classification.label,
                    confidence: classification.confidence,
                    engine,
                    reasoning: format!(
                        "Classified as {} ({:.2}), routed to {}",
                        classification.label, classification.confidence, engine
                    ),
                }
            }
            Err(e) => {
                warn!("Classification failed: {}", e);
                RouteDecision {
                    document_type: DocumentType::Unknown,
                    confidence: 0.0,
                    engine: EngineKind::EasyOcr,
                    reasoning: format!(
                        "Classification failed ({}), using general-purpose engine",
                        e
                    ),
                }
            }
        }
    }
}

fn engine_for(document_type: DocumentType) -> EngineKind {
    match document_type {
        DocumentType::Invoice | DocumentType::Receipt => EngineKind::TrOcr,
        DocumentType::Note | DocumentType::Unknown => EngineKind::EasyOcr,
        DocumentType::Form => EngineKind::Hybrid,
    }
}
