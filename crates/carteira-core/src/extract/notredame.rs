//! NotreDame Intermédica cards.

use lazy_static::lazy_static;

use super::{card_number, health_system_number, holder_name, plan_name, valid_until};
use super::engine::{FieldRule, FieldSpec};
use crate::fields::patterns::{CARD_NUMBER_LABELED, CARD_NUMBER_STANDALONE};

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        holder_name(0.9, 0.85),
        card_number(9, 17)
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.9))
            .rule(FieldRule::standalone("card_number_standalone", &CARD_NUMBER_STANDALONE, 0.6)),
        plan_name(0.9, 0.85),
        valid_until(),
        health_system_number(),
    ];
}

pub(super) fn fields() -> &'static [FieldSpec] {
    FIELDS.as_slice()
}
