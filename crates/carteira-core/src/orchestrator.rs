//! Extraction pipeline: category detection, issuer resolution, field
//! extraction and confidence aggregation.

use tracing::{debug, info, warn};

use crate::detector::DocumentTypeDetector;
use crate::extract::Extractor;
use crate::fields::patterns::{REGULATOR_CODE_LABELED, REGULATOR_CODE_STANDALONE};
use crate::models::config::{CarteiraConfig, ExtractionConfig};
use crate::models::document::{
    DetectionMethod, DocumentCategory, ExtractedField, ExtractionIssue, ExtractionResult,
};
use crate::registry::{normalize_regulator_code, Issuer, IssuerRegistry};
use crate::text::CardText;

/// How the extractor for an insurance card was chosen.
#[derive(Debug, Clone, PartialEq)]
struct IssuerSelection {
    issuer: Option<Issuer>,
    confidence: f32,
    method: DetectionMethod,
    issues: Vec<ExtractionIssue>,
}

impl IssuerSelection {
    fn extractor(&self) -> Extractor {
        self.issuer
            .map(Extractor::for_issuer)
            .unwrap_or(Extractor::GenericInsurance)
    }
}

/// Turns OCR text into an [`ExtractionResult`].
///
/// The pipeline holds no per-document state; one instance can serve any
/// number of documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    detector: DocumentTypeDetector,
    registry: &'static IssuerRegistry,
    config: ExtractionConfig,
}

impl DocumentPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(CarteiraConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: CarteiraConfig) -> Self {
        Self {
            detector: DocumentTypeDetector::with_config(config.detection),
            registry: IssuerRegistry::global(),
            config: config.extraction,
        }
    }

    /// Extraction settings in use.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The detector used for the first stage.
    pub fn detector(&self) -> &DocumentTypeDetector {
        &self.detector
    }

    /// Process one document.
    ///
    /// `hint` is advisory: when the detector disagrees, detection wins and
    /// the disagreement is reported as an issue.
    pub fn process(&self, text: &str, hint: Option<DocumentCategory>) -> ExtractionResult {
        let text = CardText::new(text);
        let detection = self.detector.detect(&text);
        let category = detection.category;

        let mut issues = Vec::new();
        if let Some(hint) = hint.filter(|h| *h != category) {
            warn!("Category hint {} overridden by detected {}", hint, category);
            issues.push(ExtractionIssue::HintOverridden { hint, detected: category });
        }

        let (extractor, issuer, issuer_confidence, method) = match category {
            DocumentCategory::Unknown => {
                info!("Document category undetermined, nothing extracted");
                let mut result = ExtractionResult::undetermined();
                issues.append(&mut result.issues);
                result.issues = issues;
                return result;
            }
            DocumentCategory::RgIdentity => (
                Extractor::Identity,
                None,
                1.0,
                DetectionMethod::GenericFallback,
            ),
            DocumentCategory::InsuranceCard => {
                let mut selection = self.resolve_issuer(&text);
                issues.append(&mut selection.issues);
                (
                    selection.extractor(),
                    selection.issuer,
                    selection.confidence,
                    selection.method,
                )
            }
        };

        let outcome = extractor.extract(&text, self.registry, self.config.validate_checksums);
        let mut fields = outcome.fields;
        issues.extend(outcome.issues);

        if extractor == Extractor::GenericInsurance {
            for field in &mut fields {
                field.confidence *= self.config.generic_penalty;
            }
        }

        let required_fields = extractor.required_fields();
        let missing: Vec<_> = required_fields
            .iter()
            .copied()
            .filter(|name| !fields.iter().any(|f| f.name == *name && f.is_present()))
            .collect();

        let mut confidence =
            self.aggregate_confidence(detection.confidence, issuer_confidence, &fields);
        if !missing.is_empty() {
            confidence = confidence.min(self.config.required_missing_cap);
            issues.extend(missing.into_iter().map(ExtractionIssue::RequiredFieldMissing));
        }

        let result = ExtractionResult {
            category,
            category_confidence: detection.confidence,
            issuer: issuer.map(|i| self.registry.identity(i).clone()),
            issuer_confidence,
            method: Some(method),
            fields,
            required_fields,
            confidence,
            issues,
        };

        info!(
            "Processed {} via {} ({}): confidence {:.2}, {} issue(s)",
            category,
            extractor,
            method,
            result.confidence,
            result.issues.len()
        );

        result
    }

    /// Pick the issuer of an insurance card: printed regulator code first,
    /// then text signatures, then no issuer.
    fn resolve_issuer(&self, text: &CardText) -> IssuerSelection {
        let mut issues = Vec::new();

        for caps in REGULATOR_CODE_LABELED.captures_iter(text.upper()) {
            let Some(code) = normalize_regulator_code(&caps[1]) else {
                continue;
            };
            match self.registry.by_regulator_code(&code) {
                Some(identity) => {
                    debug!("ANS code {} selects {}", code, identity.name);
                    return IssuerSelection {
                        issuer: Some(identity.issuer),
                        confidence: 1.0,
                        method: DetectionMethod::RegulatorCode,
                        issues,
                    };
                }
                None => {
                    warn!("Unrecognized ANS code {}", code);
                    let issue = ExtractionIssue::UnrecognizedRegulatorCode(code);
                    if !issues.contains(&issue) {
                        issues.push(issue);
                    }
                }
            }
        }

        // Bare six-digit tokens only count when they are registered codes.
        for caps in REGULATOR_CODE_STANDALONE.captures_iter(text.upper()) {
            if let Some(identity) = self.registry.by_regulator_code(&caps[1]) {
                debug!("Bare code {} selects {}", &caps[1], identity.name);
                return IssuerSelection {
                    issuer: Some(identity.issuer),
                    confidence: 1.0,
                    method: DetectionMethod::RegulatorCode,
                    issues,
                };
            }
        }

        for identity in self.registry.issuers() {
            let extractor = Extractor::for_issuer(identity.issuer);
            let Some(score) = extractor.applicability(text, self.registry) else {
                continue;
            };
            if score.selected {
                debug!(
                    "Text signatures select {} ({} hit(s): {:?})",
                    extractor, score.hits, score.matched
                );
                return IssuerSelection {
                    issuer: Some(identity.issuer),
                    confidence: score.ratio,
                    method: DetectionMethod::TextSignature,
                    issues,
                };
            }
        }

        debug!("No issuer resolved, using generic extractor");
        issues.push(ExtractionIssue::IssuerUnresolved);
        IssuerSelection {
            issuer: None,
            confidence: 0.0,
            method: DetectionMethod::GenericFallback,
            issues,
        }
    }

    fn aggregate_confidence(
        &self,
        category: f32,
        issuer: f32,
        fields: &[ExtractedField],
    ) -> f32 {
        let filled = if fields.is_empty() {
            0.0
        } else {
            fields.iter().filter(|f| f.is_present()).count() as f32 / fields.len() as f32
        };

        let c = &self.config;
        (c.category_weight * category + c.issuer_weight * issuer + c.fill_weight * filled)
            .clamp(0.0, 1.0)
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::FieldName;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_category_extracts_nothing() {
        let result = DocumentPipeline::new().process("lorem ipsum dolor", None);
        assert_eq!(result.category, DocumentCategory::Unknown);
        assert_eq!(result.method, None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.fields.is_empty());
        assert_eq!(result.issues, vec![ExtractionIssue::CategoryUndetermined]);
    }

    #[test]
    fn test_hint_is_advisory() {
        let text = "REGISTRO GERAL\nFILIAÇÃO\nNATURALIDADE\nNOME\nMARIA DA SILVA SANTOS";
        let result = DocumentPipeline::new().process(text, Some(DocumentCategory::InsuranceCard));
        assert_eq!(result.category, DocumentCategory::RgIdentity);
        assert!(result.has_issue(&ExtractionIssue::HintOverridden {
            hint: DocumentCategory::InsuranceCard,
            detected: DocumentCategory::RgIdentity,
        }));

        let agreeing = DocumentPipeline::new().process(text, Some(DocumentCategory::RgIdentity));
        assert!(!agreeing
            .issues
            .iter()
            .any(|i| matches!(i, ExtractionIssue::HintOverridden { .. })));
    }

    #[test]
    fn test_unrecognized_labeled_code_falls_through() {
        let text = "BENEFICIÁRIO: JOAO PEREIRA\nPLANO: ESPECIAL\nVALIDADE 31/12/2026\nANS Nº 123456\nHAPVIDA";
        let result = DocumentPipeline::new().process(text, None);
        assert_eq!(result.category, DocumentCategory::InsuranceCard);
        assert!(result.has_issue(&ExtractionIssue::UnrecognizedRegulatorCode("123456".into())));
        assert_eq!(result.method, Some(DetectionMethod::TextSignature));
        assert_eq!(result.issuer.as_ref().map(|i| i.issuer), Some(Issuer::Hapvida));
        assert_eq!(result.issuer_confidence, 0.5);
    }

    #[test]
    fn test_missing_required_field_caps_confidence() {
        let text = "AMIL\nPLANO: S580\nVALIDADE 31/12/2026\nCARTEIRINHA 088765432\nANS Nº 326305";
        let result = DocumentPipeline::new().process(text, None);
        assert_eq!(result.value(FieldName::HolderName), None);
        assert!(result.has_issue(&ExtractionIssue::RequiredFieldMissing(FieldName::HolderName)));
        assert!(result.confidence <= 0.49);
        assert!(!result.is_accepted(0.5));
    }

    #[test]
    fn test_generic_fallback_penalizes_fields() {
        let text = "PLANO DE SAÚDE REGIONAL\nBENEFICIÁRIO: PAULA RIBEIRO\nVALIDADE 01/01/2027\nNº DO CARTÃO: 4321 8765 0012";
        let result = DocumentPipeline::new().process(text, None);
        assert_eq!(result.method, Some(DetectionMethod::GenericFallback));
        assert!(result.issuer.is_none());
        assert_eq!(result.issuer_confidence, 0.0);
        assert!(result.has_issue(&ExtractionIssue::IssuerUnresolved));

        let card = result.field(FieldName::CardNumber).unwrap();
        assert!((card.confidence - 0.8 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_is_bounded() {
        let pipeline = DocumentPipeline::new();
        for text in [
            "",
            "AMIL S580 PLANO VALIDADE",
            "REGISTRO GERAL FILIAÇÃO NATURALIDADE",
            "ANS 006246 PLANO SAÚDE",
        ] {
            let result = pipeline.process(text, None);
            assert!((0.0..=1.0).contains(&result.confidence), "{text}");
        }
    }
}
