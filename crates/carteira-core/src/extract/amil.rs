//! Amil cards: short membership numbers and `S`-series plan codes.

use lazy_static::lazy_static;

use super::{card_number, health_system_number, holder_name, plan_name, valid_until};
use super::engine::{FieldRule, FieldSpec};
use crate::fields::patterns::{CARD_NUMBER_LABELED, CARD_NUMBER_STANDALONE};

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        holder_name(0.9, 0.85),
        card_number(8, 10)
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.9))
            .rule(FieldRule::standalone("card_number_standalone", &CARD_NUMBER_STANDALONE, 0.6)),
        // Plan codes are often printed without a label.
        plan_name(0.9, 0.85),
        valid_until(),
        health_system_number(),
    ];
}

pub(super) fn fields() -> &'static [FieldSpec] {
    FIELDS.as_slice()
}

#[cfg(test)]
mod tests {
    use super::super::Extractor;
    use crate::models::document::FieldName;
    use crate::registry::IssuerRegistry;
    use crate::text::CardText;

    #[test]
    fn test_amil_card() {
        let text = CardText::new(
            "amil\nBeneficiário: JOAO PEREIRA DA SILVA\nCarteirinha: 088765432\nS580 QC\nValidade: 31/12/2026",
        );
        let outcome = Extractor::Amil.extract(&text, &IssuerRegistry::builtin(), true);
        let value = |name| {
            outcome
                .fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.value.clone())
        };

        assert_eq!(value(FieldName::HolderName).as_deref(), Some("JOAO PEREIRA DA SILVA"));
        assert_eq!(value(FieldName::CardNumber).as_deref(), Some("088765432"));
        assert_eq!(value(FieldName::PlanName).as_deref(), Some("Amil S580 Coparticipação"));
        assert_eq!(value(FieldName::ValidUntil).as_deref(), Some("2026-12-31"));
        assert_eq!(value(FieldName::HealthSystemNumber), None);
    }
}
