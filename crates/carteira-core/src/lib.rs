//! Core library for reading Brazilian health-insurance cards and RG identity
//! cards from OCR text.
//!
//! This crate provides:
//! - Field validators (CPF, RG, CNS, local dates, person names)
//! - Document type detection (RG vs insurance card)
//! - A registry of known insurance issuers and their plan names
//! - Per-issuer rule tables and a shared rule engine
//! - The extraction pipeline and the flat output schema

pub mod assembler;
pub mod detector;
pub mod error;
pub mod extract;
pub mod fields;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod text;

pub use assembler::{assemble, StructuredDocument};
pub use detector::{DetectionReport, DocumentTypeDetector};
pub use error::{CarteiraError, Result};
pub use extract::Extractor;
pub use models::config::{CarteiraConfig, DetectionConfig, ExtractionConfig};
pub use models::document::{
    DetectionMethod, DocumentCategory, ExtractedField, ExtractionIssue, ExtractionResult,
    FieldName,
};
pub use orchestrator::DocumentPipeline;
pub use registry::{Issuer, IssuerIdentity, IssuerRegistry, PlanLexicon};
pub use text::CardText;
