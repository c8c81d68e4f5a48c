//! Unimed cards: 17-digit numbers led by the cooperative code.

use lazy_static::lazy_static;

use super::{birth_date, card_number, health_system_number, holder_name, plan_name, valid_until};
use super::engine::{FieldRule, FieldSpec};
use crate::fields::patterns::{CARD_NUMBER_LABELED, UNIMED_CARD_NUMBER};

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        holder_name(0.9, 0.85),
        card_number(13, 17)
            .rule(FieldRule::standalone("unimed_card_layout", &UNIMED_CARD_NUMBER, 0.9))
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.85)),
        plan_name(0.85, 0.8),
        valid_until(),
        birth_date(),
        health_system_number(),
    ];
}

pub(super) fn fields() -> &'static [FieldSpec] {
    FIELDS.as_slice()
}
