//! Hapvida cards.

use lazy_static::lazy_static;

use super::{birth_date, card_number, health_system_number, holder_name, plan_name};
use super::engine::{FieldRule, FieldSpec, FieldValidator};
use crate::fields::patterns::{CARD_NUMBER_LABELED, CARD_NUMBER_STANDALONE, CPF_LABELED};
use crate::models::document::FieldName;

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        holder_name(0.9, 0.85),
        card_number(8, 12)
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.9))
            .rule(FieldRule::standalone("card_number_standalone", &CARD_NUMBER_STANDALONE, 0.6)),
        plan_name(0.85, 0.8),
        birth_date(),
        // Printed on individual plans only.
        FieldSpec::new(FieldName::TaxpayerId, FieldValidator::TaxpayerId)
            .rule(FieldRule::labeled("cpf_labeled", &CPF_LABELED, 0.95)),
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
    fn test_hapvida_card_with_cpf() {
        let text = CardText::new(
            "HAPVIDA\nBeneficiário: LUCAS MARTINS SOUSA\nMatrícula: 00123456\nPlano: Nosso Plano\nCPF: 529.982.247-25",
        );
        let outcome = Extractor::Hapvida.extract(&text, &IssuerRegistry::builtin(), true);
        let value = |name| {
            outcome
                .fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.value.clone())
        };

        assert_eq!(value(FieldName::HolderName).as_deref(), Some("LUCAS MARTINS SOUSA"));
        assert_eq!(value(FieldName::CardNumber).as_deref(), Some("00123456"));
        assert_eq!(value(FieldName::PlanName).as_deref(), Some("Hapvida Nosso Plano"));
        assert_eq!(value(FieldName::TaxpayerId).as_deref(), Some("529.982.247-25"));
    }
}
