//! Insurance cards from an unresolved issuer.
//!
//! Only fields every card carries are attempted, and rule confidences sit
//! below the issuer tables since no layout is known.

use lazy_static::lazy_static;

use super::{birth_date, card_number, holder_name};
use super::engine::{FieldRule, FieldSpec};
use crate::fields::patterns::{CARD_NUMBER_LABELED, CARD_NUMBER_STANDALONE};

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        card_number(8, 20)
            .rule(FieldRule::labeled("card_number_labeled", &CARD_NUMBER_LABELED, 0.8))
            .rule(FieldRule::standalone("card_number_standalone", &CARD_NUMBER_STANDALONE, 0.5)),
        holder_name(0.8, 0.75),
        birth_date(),
    ];
}

pub(super) fn fields() -> &'static [FieldSpec] {
    FIELDS.as_slice()
}
