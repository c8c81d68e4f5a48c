//! Field validators and normalizers for Brazilian documents.
//!
//! Everything here is a pure function with no shared state, so the rule
//! engine can call validators from any thread.

pub mod cns;
pub mod cpf;
pub mod dates;
pub mod identity;
pub mod names;
pub mod patterns;

pub use cns::{format_health_system_number, validate_health_system_number};
pub use cpf::{format_taxpayer_id, validate_checksum_id};
pub use dates::{format_date_iso, parse_local_date};
pub use identity::{classify_id_length, normalize_identity_number, IdLengthClass};
pub use names::{clean_name, is_name_shaped, validate_person_name};

/// Keep only the ASCII digits of a string.
pub fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
