//! SulAmérica cards.

use lazy_static::lazy_static;

use super::{birth_date, card_number, health_system_number, holder_name, plan_name, valid_until};
use super::engine::{FieldRule, FieldSpec};
use crate::fields::patterns::{CARD_NUMBER_LABELED, SULAMERICA_CARD_NUMBER};

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        holder_name(0.9, 0.85),
        card_number(15, 20)
            .rule(FieldRule::standalone("sulamerica_card_layout", &SULAMERICA_CARD_NUMBER, 0.9))
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.85)),
        plan_name(0.9, 0.8),
        valid_until(),
        birth_date(),
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
    fn test_sulamerica_layout_number() {
        let text = CardText::new(
            "SulAmérica Saúde\nSegurado: ANA LUIZA COSTA\n555 12345 6789 0123 4567\nPlano: Clássico",
        );
        let outcome = Extractor::SulAmerica.extract(&text, &IssuerRegistry::builtin(), true);
        let card = outcome.fields.iter().find(|f| f.name == FieldName::CardNumber).unwrap();
        assert_eq!(card.value.as_deref(), Some("55512345678901234567"));
        assert_eq!(card.rule.as_deref(), Some("sulamerica_card_layout"));

        let plan = outcome.fields.iter().find(|f| f.name == FieldName::PlanName).unwrap();
        assert_eq!(plan.value.as_deref(), Some("SulAmérica Clássico"));
    }
}
