//! RG (identity-document number) normalization and length classification.

use serde::{Deserialize, Serialize};

/// Length class of a document number.
///
/// RG numbers and CPF numbers both appear on identity cards, often close to
/// each other. Telling them apart by digit count keeps one from being stored
/// in the other's field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdLengthClass {
    /// 7 to 9 characters: an RG number.
    ShortId,
    /// Exactly 11 digits: a CPF.
    LongId,
    /// Anything else.
    Ambiguous,
}

/// Shortest accepted RG, in digits.
pub const RG_MIN_DIGITS: usize = 7;
/// Longest accepted RG, in digits.
pub const RG_MAX_DIGITS: usize = 9;
/// Length of a CPF.
pub const CPF_DIGITS: usize = 11;

/// Classify a document number by its digit count.
///
/// Separators are ignored. A trailing `X` check character (used by some
/// state issuers) counts as a digit.
pub fn classify_id_length(number: &str) -> IdLengthClass {
    match normalize_identity_number(number) {
        Some(n) if (RG_MIN_DIGITS..=RG_MAX_DIGITS).contains(&n.len()) => IdLengthClass::ShortId,
        Some(n) if n.len() == CPF_DIGITS && !n.ends_with('X') => IdLengthClass::LongId,
        _ => IdLengthClass::Ambiguous,
    }
}

/// Strip separators from an RG, keeping digits and a trailing `X`.
///
/// Returns `None` when anything other than digits, separators or a final
/// `X` is present.
pub fn normalize_identity_number(number: &str) -> Option<String> {
    let trimmed = number.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '0'..='9' => out.push(c),
            '.' | '-' | ' ' | '/' => {}
            'X' | 'x' if chars.peek().is_none() && !out.is_empty() => out.push('X'),
            _ => return None,
        }
    }

    if out.is_empty() { None } else { Some(out) }
}
