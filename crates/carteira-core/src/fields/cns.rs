//! CNS (Cartão Nacional de Saúde) validation.

use super::digits_of;

/// Validate a CNS number.
///
/// CNS numbers have 15 digits. Definitive numbers start with 1 or 2,
/// provisional ones with 7, 8 or 9. For both series the sum of each digit
/// weighted from 15 down to 1 must be divisible by 11.
pub fn validate_health_system_number(cns: &str) -> bool {
    if cns.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '.' || c == '-')) {
        return false;
    }

    let digits: Vec<u32> = digits_of(cns).chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 15 || !matches!(digits[0], 1 | 2 | 7 | 8 | 9) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (15 - i as u32))
        .sum();

    sum % 11 == 0
}

/// Format a CNS as `XXX XXXX XXXX XXXX`.
pub fn format_health_system_number(cns: &str) -> String {
    let digits = digits_of(cns);

    if digits.len() != 15 {
        return cns.to_string();
    }

    format!(
        "{} {} {} {}",
        &digits[0..3],
        &digits[3..7],
        &digits[7..11],
        &digits[11..15]
    )
}
