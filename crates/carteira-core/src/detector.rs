//! Document type detection.
//!
//! Each category owns an ordered list of signatures: phrases printed on every
//! document of that kind, or structural regularities of its layout. A category
//! is only selected when several independent signatures agree, since short
//! words overlap between RG cards and insurance cards.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::fields::patterns::REGULATOR_CODE_LABELED;
use crate::models::config::DetectionConfig;
use crate::models::document::DocumentCategory;
use crate::text::CardText;

/// Evidence for a document category.
#[derive(Debug)]
pub enum SignatureKind {
    /// Any of the phrases (OCR variants of one label) occurs as whole words.
    Phrase(&'static [&'static str]),
    /// A structural pattern matches the folded text.
    Pattern(Regex),
}

/// A named signature.
#[derive(Debug)]
pub struct Signature {
    pub name: &'static str,
    pub kind: SignatureKind,
}

impl Signature {
    fn phrase(name: &'static str, phrases: &'static [&'static str]) -> Self {
        Self { name, kind: SignatureKind::Phrase(phrases) }
    }

    fn pattern(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            kind: SignatureKind::Pattern(Regex::new(pattern).expect("signature pattern compiles")),
        }
    }

    /// Whether the signature matches the document.
    pub fn matches(&self, text: &CardText) -> bool {
        match &self.kind {
            SignatureKind::Phrase(phrases) => phrases.iter().any(|p| text.contains(p)),
            SignatureKind::Pattern(re) => re.is_match(text.folded()),
        }
    }
}

lazy_static! {
    static ref RG_SIGNATURES: Vec<Signature> = vec![
        Signature::phrase("registro_geral", &["REGISTRO GERAL"]),
        Signature::phrase("identity_card_title", &["CARTEIRA DE IDENTIDADE", "CEDULA DE IDENTIDADE"]),
        Signature::phrase("filiation", &["FILIACAO"]),
        Signature::phrase("birthplace", &["NATURALIDADE"]),
        Signature::phrase("expedition_date", &["DATA DE EXPEDICAO", "DATA EXPEDICAO"]),
        Signature::phrase("issuing_agency", &[
            "SECRETARIA DE SEGURANCA PUBLICA",
            "SECRETARIA DA SEGURANCA PUBLICA",
            "INSTITUTO DE IDENTIFICACAO",
            "SSP",
        ]),
        Signature::phrase("national_validity", &["VALIDA EM TODO O TERRITORIO NACIONAL", "TERRITORIO NACIONAL"]),
        Signature::phrase("origin_document", &["DOC. ORIGEM", "DOC ORIGEM", "CERTIDAO DE NASCIMENTO", "CERT. NASC"]),
        Signature::phrase("federal_law", &["LEI N 7.116", "LEI NO 7.116", "LEI Nº 7.116", "7.116"]),
        Signature::phrase("holder_signature", &["ASSINATURA DO TITULAR", "POLEGAR DIREITO"]),
        Signature::phrase("republic_heading", &["REPUBLICA FEDERATIVA DO BRASIL"]),
        Signature::pattern("name_label_line", r"(?m)^NOME[^\S\n]*:?[^\S\n]*\n[A-Z' ]{5,60}$"),
        Signature::pattern("rg_number_shape", r"\b\d{1,2}\.\d{3}\.\d{3}-[\dX]\b"),
    ];

    static ref CARD_SIGNATURES: Vec<Signature> = vec![
        Signature {
            name: "regulator_code",
            kind: SignatureKind::Pattern(REGULATOR_CODE_LABELED.clone()),
        },
        Signature::phrase("plan_label", &["PLANO", "PRODUTO"]),
        Signature::phrase("beneficiary_label", &["BENEFICIARIO", "BENEFICIARIA", "SEGURADO", "SEGURADA"]),
        Signature::phrase("health_term", &["SAUDE", "ASSISTENCIA MEDICA"]),
        Signature::phrase("validity_label", &["VALIDADE", "VALIDO ATE"]),
        Signature::phrase("accommodation", &["ACOMODACAO", "APARTAMENTO", "ENFERMARIA", "QUARTO PRIVATIVO", "QUARTO COLETIVO"]),
        Signature::phrase("coverage", &["ABRANGENCIA", "SEGMENTACAO", "AMBULATORIAL", "HOSPITALAR", "COBERTURA"]),
        Signature::phrase("copayment", &["COPARTICIPACAO", "CO-PARTICIPACAO"]),
        Signature::phrase("contract", &["CONTRATANTE", "COLETIVO EMPRESARIAL", "COLETIVO POR ADESAO", "CONTRATO"]),
        Signature::phrase("health_system_number", &["CNS", "CARTAO NACIONAL DE SAUDE"]),
        Signature::phrase("card_label", &["CARTEIRINHA", "DO CARTAO", "DA CARTEIRINHA", "MATRICULA"]),
        Signature::phrase("issuer_brand", &[
            "AMIL", "SULAMERICA", "SUL AMERICA", "BRADESCO SAUDE", "UNIMED", "HAPVIDA", "NOTREDAME", "INTERMEDICA",
        ]),
        Signature::phrase("provider_network", &["REDE CREDENCIADA", "REDE DE ATENDIMENTO", "REDE"]),
        Signature::pattern("long_card_number", r"\b\d{4}[ .\-]?\d{4}[ .\-]?\d{4}[ .\-]?\d{2,8}\b"),
    ];
}

/// Detection outcome with the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub category: DocumentCategory,
    /// 0.0 when the category is unknown.
    pub confidence: f32,
    /// RG signatures that matched.
    pub rg_hits: Vec<&'static str>,
    /// Insurance-card signatures that matched.
    pub card_hits: Vec<&'static str>,
}

/// Scores text against category signatures.
#[derive(Debug, Clone, Default)]
pub struct DocumentTypeDetector {
    config: DetectionConfig,
}

impl DocumentTypeDetector {
    /// Create a detector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom thresholds.
    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Detect the category of a raw text blob.
    pub fn detect_str(&self, text: &str) -> DetectionReport {
        self.detect(&CardText::new(text))
    }

    /// Detect the category of a normalized text.
    pub fn detect(&self, text: &CardText) -> DetectionReport {
        let rg_hits = matching(&RG_SIGNATURES, text);
        let card_hits = matching(&CARD_SIGNATURES, text);

        let min = self.config.min_hits;
        let rg_ok = rg_hits.len() >= min;
        let card_ok = card_hits.len() >= min;

        let (category, hits) = match (rg_ok, card_ok) {
            (true, false) => (DocumentCategory::RgIdentity, rg_hits.len()),
            (false, true) => (DocumentCategory::InsuranceCard, card_hits.len()),
            (true, true) if rg_hits.len() > card_hits.len() => {
                (DocumentCategory::RgIdentity, rg_hits.len())
            }
            (true, true) if card_hits.len() > rg_hits.len() => {
                (DocumentCategory::InsuranceCard, card_hits.len())
            }
            // Neither cleared the threshold, or both did with the same count.
            _ => (DocumentCategory::Unknown, 0),
        };

        let confidence = match category {
            DocumentCategory::Unknown => 0.0,
            _ => self.confidence_for(hits),
        };

        debug!(
            "Detected {} (confidence {:.2}): rg hits {:?}, card hits {:?}",
            category, confidence, rg_hits, card_hits
        );

        DetectionReport {
            category,
            confidence,
            rg_hits,
            card_hits,
        }
    }

    fn confidence_for(&self, hits: usize) -> f32 {
        let c = &self.config;
        (c.base_confidence + hits as f32 * c.hit_increment).min(c.confidence_cap)
    }
}

fn matching(signatures: &[Signature], text: &CardText) -> Vec<&'static str> {
    signatures
        .iter()
        .filter(|s| s.matches(text))
        .map(|s| s.name)
        .collect()
}
