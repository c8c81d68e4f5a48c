//! Extraction result data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::IssuerIdentity;

/// Category of a document, decided by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    /// Brazilian RG identity card.
    RgIdentity,
    /// Health-insurance membership card.
    InsuranceCard,
    /// Not enough evidence for either category. No extraction runs.
    Unknown,
}

impl DocumentCategory {
    /// Parse a caller hint (`rg`, `card`, `insurance_card`, ...).
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().replace('-', "_").as_str() {
            "rg" | "rg_identity" | "identity" | "id" => Some(Self::RgIdentity),
            "card" | "insurance" | "insurance_card" | "carteirinha" => Some(Self::InsuranceCard),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RgIdentity => "RG_IDENTITY",
            Self::InsuranceCard => "INSURANCE_CARD",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// How the extractor for a document was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionMethod {
    /// A known ANS code was found in the text.
    RegulatorCode,
    /// An issuer's phrase signatures matched.
    TextSignature,
    /// No issuer strategy applied (generic insurance card or identity
    /// document).
    GenericFallback,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RegulatorCode => "REGULATOR_CODE",
            Self::TextSignature => "TEXT_SIGNATURE",
            Self::GenericFallback => "GENERIC_FALLBACK",
        };
        f.write_str(name)
    }
}

/// Fields the pipeline knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Card holder, or the subject of an identity document.
    HolderName,
    /// RG number.
    IdentityNumber,
    /// CPF.
    TaxpayerId,
    BirthDate,
    /// Card or membership number.
    CardNumber,
    /// Canonical plan name.
    PlanName,
    /// CNS.
    HealthSystemNumber,
    /// RG expedition date.
    IssueDate,
    /// Card validity date.
    ValidUntil,
}

impl FieldName {
    /// Stable snake_case key used in the external schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HolderName => "holder_name",
            Self::IdentityNumber => "identity_number",
            Self::TaxpayerId => "taxpayer_id",
            Self::BirthDate => "birth_date",
            Self::CardNumber => "card_number",
            Self::PlanName => "plan_name",
            Self::HealthSystemNumber => "health_system_number",
            Self::IssueDate => "issue_date",
            Self::ValidUntil => "valid_until",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted field. A `None` value is an expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: FieldName,

    /// Normalized value, or `None` when nothing valid was found.
    pub value: Option<String>,

    /// Confidence of the rule that produced the value (0.0 when absent).
    pub confidence: f32,

    /// Identifier of the rule that produced the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl ExtractedField {
    /// A field with no value.
    pub fn absent(name: FieldName) -> Self {
        Self {
            name,
            value: None,
            confidence: 0.0,
            rule: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// A problem found while reading a document. Issues never abort extraction;
/// they are reported alongside whatever could be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExtractionIssue {
    /// No category reached the signature threshold, or two tied.
    CategoryUndetermined,
    /// Insurance card with no recognizable issuer.
    IssuerUnresolved,
    /// An ANS code was printed but is not in the registry.
    UnrecognizedRegulatorCode(String),
    /// No candidate was found for a field.
    FieldAbsent(FieldName),
    /// Candidates were found but none passed validation.
    FieldInvalid(FieldName),
    /// A field the extractor requires is missing.
    RequiredFieldMissing(FieldName),
    /// The caller's category hint disagreed with the detector.
    HintOverridden {
        hint: DocumentCategory,
        detected: DocumentCategory,
    },
}

impl fmt::Display for ExtractionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryUndetermined => write!(f, "document category could not be determined"),
            Self::IssuerUnresolved => write!(f, "insurance issuer could not be resolved"),
            Self::UnrecognizedRegulatorCode(code) => write!(f, "unrecognized ANS code {code}"),
            Self::FieldAbsent(field) => write!(f, "{field} not found"),
            Self::FieldInvalid(field) => write!(f, "{field} found but failed validation"),
            Self::RequiredFieldMissing(field) => write!(f, "required field {field} is missing"),
            Self::HintOverridden { hint, detected } => {
                write!(f, "category hint {hint} overridden by detected {detected}")
            }
        }
    }
}

/// Outcome of running the pipeline on one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Detected category.
    pub category: DocumentCategory,

    /// Detector confidence for the category.
    pub category_confidence: f32,

    /// Selected issuer, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<IssuerIdentity>,

    /// Confidence in the issuer selection.
    pub issuer_confidence: f32,

    /// How the extractor was chosen. `None` when the category is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<DetectionMethod>,

    /// Extracted fields, in the extractor's declaration order.
    pub fields: Vec<ExtractedField>,

    /// Fields the selected extractor requires.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<FieldName>,

    /// Aggregate confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Problems found during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ExtractionIssue>,
}

impl ExtractionResult {
    /// Result for a document that could not be categorized.
    pub fn undetermined() -> Self {
        Self {
            category: DocumentCategory::Unknown,
            category_confidence: 0.0,
            issuer: None,
            issuer_confidence: 0.0,
            method: None,
            fields: Vec::new(),
            required_fields: Vec::new(),
            confidence: 0.0,
            issues: vec![ExtractionIssue::CategoryUndetermined],
        }
    }

    /// The extracted field record for a name, if the extractor declares it.
    pub fn field(&self, name: FieldName) -> Option<&ExtractedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The extracted value for a name.
    pub fn value(&self, name: FieldName) -> Option<&str> {
        self.field(name).and_then(|f| f.value.as_deref())
    }

    /// Whether the result clears the given accept threshold.
    pub fn is_accepted(&self, threshold: f32) -> bool {
        self.category != DocumentCategory::Unknown && self.confidence >= threshold
    }

    pub fn has_issue(&self, issue: &ExtractionIssue) -> bool {
        self.issues.contains(issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_hint() {
        assert_eq!(DocumentCategory::from_hint("RG"), Some(DocumentCategory::RgIdentity));
        assert_eq!(DocumentCategory::from_hint("insurance-card"), Some(DocumentCategory::InsuranceCard));
        assert_eq!(DocumentCategory::from_hint("passport"), None);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&DocumentCategory::InsuranceCard).unwrap();
        assert_eq!(json, "\"INSURANCE_CARD\"");
        let json = serde_json::to_string(&DetectionMethod::RegulatorCode).unwrap();
        assert_eq!(json, "\"REGULATOR_CODE\"");
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(
            ExtractionIssue::FieldInvalid(FieldName::TaxpayerId).to_string(),
            "taxpayer_id found but failed validation"
        );
    }

    #[test]
    fn test_undetermined_result() {
        let result = ExtractionResult::undetermined();
        assert_eq!(result.confidence, 0.0);
        assert!(result.fields.is_empty());
        assert!(!result.is_accepted(0.0));
        assert!(result.has_issue(&ExtractionIssue::CategoryUndetermined));
    }
}
