//! Bradesco Saúde cards.

use lazy_static::lazy_static;

use super::{birth_date, card_number, holder_name, plan_name, valid_until};
use super::engine::{FieldRule, FieldSpec};
use crate::fields::patterns::{CARD_NUMBER_LABELED, CARD_NUMBER_STANDALONE};

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        holder_name(0.9, 0.85),
        card_number(10, 16)
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.9))
            .rule(FieldRule::standalone("card_number_standalone", &CARD_NUMBER_STANDALONE, 0.65)),
        plan_name(0.85, 0.8),
        valid_until(),
        birth_date(),
    ];
}

pub(super) fn fields() -> &'static [FieldSpec] {
    FIELDS.as_slice()
}
