//! CPF (Brazilian taxpayer ID) validation and formatting.

use super::digits_of;

/// Validate a CPF using the modulo-11 double check-digit algorithm.
///
/// CPF format: 11 digits where the last two are check digits. Separators are
/// ignored. Strings made of one repeated digit (`111.111.111-11`) satisfy the
/// arithmetic but are never issued, so they are rejected.
pub fn validate_checksum_id(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || cpf.chars().any(|c| c.is_alphabetic()) {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Check digit for the given prefix. Weights run from `len + 1` down to 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match sum % 11 {
        0 | 1 => 0,
        rest => 11 - rest,
    }
}

/// Format a CPF as `XXX.XXX.XXX-XX`.
pub fn format_taxpayer_id(cpf: &str) -> String {
    let digits = digits_of(cpf);

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cpf_valid() {
        assert!(validate_checksum_id("52998224725"));
        assert!(validate_checksum_id("529.982.247-25"));
        assert!(validate_checksum_id("111.444.777-35"));
    }

    #[test]
    fn test_validate_cpf_invalid() {
        assert!(!validate_checksum_id("52998224724")); // Wrong check digit
        assert!(!validate_checksum_id("5299822472")); // Too short
        assert!(!validate_checksum_id("529982247250")); // Too long
        assert!(!validate_checksum_id("5299822472X"));
    }

    #[test]
    fn test_repeated_digits_always_rejected() {
        for d in 0..=9 {
            let cpf: String = std::iter::repeat(char::from_digit(d, 10).unwrap())
                .take(11)
                .collect();
            assert!(!validate_checksum_id(&cpf), "{cpf} must be rejected");
        }
        assert!(!validate_checksum_id("111.111.111-11"));
    }

    #[test]
    fn test_check_digits_accepted_for_generated_prefixes() {
        // Any 9-digit prefix completed with its own check digits is valid.
        for prefix in ["123456789", "987654321", "000000001", "390533447"] {
            let mut digits: Vec<u32> = prefix.chars().filter_map(|c| c.to_digit(10)).collect();
            let first = check_digit(&digits);
            digits.push(first);
            let second = check_digit(&digits);
            digits.push(second);
            let cpf: String = digits.iter().map(|d| d.to_string()).collect();
            assert!(validate_checksum_id(&cpf), "{cpf} should be valid");
        }
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_taxpayer_id("52998224725"), "529.982.247-25");
        assert_eq!(format_taxpayer_id("529.982.247-25"), "529.982.247-25");
        assert_eq!(format_taxpayer_id("123"), "123");
    }
}
