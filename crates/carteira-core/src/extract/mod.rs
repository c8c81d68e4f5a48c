//! Per-document extractors.
//!
//! Every extractor is a static, ordered field table evaluated by the shared
//! rule engine in [`engine`]. Extractors differ only in their tables: which
//! fields they read, which labels and layouts they expect, and how much a
//! value found by each rule is trusted.

pub mod engine;

mod amil;
mod bradesco;
mod generic;
mod hapvida;
mod identity;
mod notredame;
mod sulamerica;
mod unimed;

pub use engine::{
    run_table, FieldRule, FieldSpec, FieldValidator, RuleContext, RuleKind, TableOutcome,
};
pub use identity::{filiation_names, place_names};

use std::fmt;

use serde::Serialize;

use crate::fields::patterns::{
    BIRTH_DATE_LABELED, CNS_LABELED, CNS_STANDALONE, NAME_LABELED, NAME_NEXT_LINE, PLAN_LABELED,
    PLAN_NEXT_LINE, VALIDITY_LABELED,
};
use crate::models::document::FieldName;
use crate::registry::{Issuer, IssuerRegistry, SignatureScore};
use crate::text::CardText;

/// The closed set of extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extractor {
    Amil,
    SulAmerica,
    BradescoSaude,
    Unimed,
    Hapvida,
    NotreDame,
    /// RG identity cards.
    Identity,
    /// Insurance cards whose issuer could not be resolved.
    GenericInsurance,
}

impl Extractor {
    /// The extractor dedicated to an issuer.
    pub fn for_issuer(issuer: Issuer) -> Self {
        match issuer {
            Issuer::Amil => Self::Amil,
            Issuer::SulAmerica => Self::SulAmerica,
            Issuer::BradescoSaude => Self::BradescoSaude,
            Issuer::Unimed => Self::Unimed,
            Issuer::Hapvida => Self::Hapvida,
            Issuer::NotreDame => Self::NotreDame,
        }
    }

    /// The issuer this extractor reads cards of, if any.
    pub fn issuer(&self) -> Option<Issuer> {
        match self {
            Self::Amil => Some(Issuer::Amil),
            Self::SulAmerica => Some(Issuer::SulAmerica),
            Self::BradescoSaude => Some(Issuer::BradescoSaude),
            Self::Unimed => Some(Issuer::Unimed),
            Self::Hapvida => Some(Issuer::Hapvida),
            Self::NotreDame => Some(Issuer::NotreDame),
            Self::Identity | Self::GenericInsurance => None,
        }
    }

    /// How strongly the text looks like this extractor's documents, scored
    /// on the issuer's text signatures. `None` for extractors that are never
    /// chosen by signature.
    pub fn applicability(
        &self,
        text: &CardText,
        registry: &IssuerRegistry,
    ) -> Option<SignatureScore> {
        self.issuer().map(|issuer| registry.score_signatures(issuer, text))
    }

    /// The extractor's ordered field table.
    pub fn field_table(&self) -> &'static [FieldSpec] {
        match self {
            Self::Amil => amil::fields(),
            Self::SulAmerica => sulamerica::fields(),
            Self::BradescoSaude => bradesco::fields(),
            Self::Unimed => unimed::fields(),
            Self::Hapvida => hapvida::fields(),
            Self::NotreDame => notredame::fields(),
            Self::Identity => identity::fields(),
            Self::GenericInsurance => generic::fields(),
        }
    }

    /// Fields whose absence caps the overall confidence.
    pub fn required_fields(&self) -> Vec<FieldName> {
        self.field_table()
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.field)
            .collect()
    }

    /// Run the field table against a document.
    pub fn extract(
        &self,
        text: &CardText,
        registry: &IssuerRegistry,
        validate_checksums: bool,
    ) -> TableOutcome {
        let mut ctx = RuleContext::new(text, registry)
            .with_issuer(self.issuer())
            .with_checksums(validate_checksums);

        if *self == Self::Identity {
            ctx = ctx
                .with_excluded_names(filiation_names(text))
                .with_excluded_lines(place_names(text));
        }

        run_table(self.field_table(), &ctx)
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Amil => "amil",
            Self::SulAmerica => "sulamerica",
            Self::BradescoSaude => "bradesco_saude",
            Self::Unimed => "unimed",
            Self::Hapvida => "hapvida",
            Self::NotreDame => "notredame",
            Self::Identity => "identity",
            Self::GenericInsurance => "generic_insurance",
        };
        f.write_str(name)
    }
}

// Field specs shared by the insurance-card tables.

fn holder_name(labeled: f32, next_line: f32) -> FieldSpec {
    FieldSpec::new(FieldName::HolderName, FieldValidator::PersonName)
        .required()
        .rule(FieldRule::labeled("name_labeled", &NAME_LABELED, labeled))
        .rule(FieldRule::labeled("name_next_line", &NAME_NEXT_LINE, next_line))
        .rule(FieldRule::name_line("name_line", 0.5))
}

fn card_number(min_digits: usize, max_digits: usize) -> FieldSpec {
    FieldSpec::new(FieldName::CardNumber, FieldValidator::CardNumber { min_digits, max_digits })
}

fn plan_name(labeled: f32, lexicon: f32) -> FieldSpec {
    FieldSpec::new(FieldName::PlanName, FieldValidator::PlanName)
        .rule(FieldRule::labeled("plan_labeled", &PLAN_LABELED, labeled))
        .rule(FieldRule::labeled("plan_next_line", &PLAN_NEXT_LINE, labeled - 0.05))
        .rule(FieldRule::lexicon("plan_lexicon", lexicon))
}

fn health_system_number() -> FieldSpec {
    FieldSpec::new(FieldName::HealthSystemNumber, FieldValidator::HealthSystemNumber)
        .rule(FieldRule::labeled("cns_labeled", &CNS_LABELED, 0.95))
        .rule(FieldRule::standalone("cns_standalone", &CNS_STANDALONE, 0.75))
}

fn birth_date() -> FieldSpec {
    FieldSpec::new(FieldName::BirthDate, FieldValidator::Date)
        .rule(FieldRule::labeled("birth_date_labeled", &BIRTH_DATE_LABELED, 0.9))
}

fn valid_until() -> FieldSpec {
    FieldSpec::new(FieldName::ValidUntil, FieldValidator::Date)
        .rule(FieldRule::labeled("validity_labeled", &VALIDITY_LABELED, 0.9))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Extractor; 8] = [
        Extractor::Amil,
        Extractor::SulAmerica,
        Extractor::BradescoSaude,
        Extractor::Unimed,
        Extractor::Hapvida,
        Extractor::NotreDame,
        Extractor::Identity,
        Extractor::GenericInsurance,
    ];

    #[test]
    fn test_every_issuer_has_an_extractor() {
        for issuer in Issuer::ALL {
            assert_eq!(Extractor::for_issuer(issuer).issuer(), Some(issuer));
        }
    }

    #[test]
    fn test_holder_name_always_required() {
        for extractor in ALL {
            assert_eq!(
                extractor.required_fields(),
                vec![FieldName::HolderName],
                "{extractor}"
            );
        }
    }

    #[test]
    fn test_tables_have_unique_fields_and_rules() {
        for extractor in ALL {
            let table = extractor.field_table();
            assert!(!table.is_empty());
            let mut fields: Vec<_> = table.iter().map(|s| s.field).collect();
            fields.sort();
            fields.dedup();
            assert_eq!(fields.len(), table.len(), "{extractor} repeats a field");
            assert!(table.iter().all(|s| !s.rules.is_empty()), "{extractor} has a field with no rule");
            assert!(table
                .iter()
                .flat_map(|s| &s.rules)
                .all(|r| r.confidence > 0.0 && r.confidence <= 1.0));
        }
    }

    #[test]
    fn test_applicability() {
        let registry = IssuerRegistry::builtin();
        let text = CardText::new("UNIMED\nCENTRAL NACIONAL UNIMED");
        let unimed = Extractor::Unimed.applicability(&text, &registry).unwrap();
        assert!(unimed.selected);
        assert_eq!(unimed.ratio, 1.0);

        let amil = Extractor::Amil.applicability(&text, &registry).unwrap();
        assert!(!amil.selected);
        assert_eq!(amil.hits, 0);

        assert_eq!(Extractor::Identity.applicability(&text, &registry), None);
        assert_eq!(Extractor::GenericInsurance.applicability(&text, &registry), None);
    }
}
