//! Common regex patterns for Brazilian card and identity-document fields.
//!
//! All patterns run against the uppercased, whitespace-normalized view of the
//! text (see [`CardText::upper`](crate::text::CardText::upper)), so they are
//! written in uppercase and spell out accented alternatives explicitly.

use lazy_static::lazy_static;
use regex::Regex;

/// Date token accepted by [`parse_local_date`](super::dates::parse_local_date),
/// including two-digit years so they can be rejected explicitly.
const DATE: &str = r"\d{1,2}[/.\-](?:\d{1,2}|[A-Z]{3})[/.\-]\d{2,4}";

lazy_static! {
    // CPF (taxpayer ID)
    pub static ref CPF_LABELED: Regex = Regex::new(
        r"\bCPF(?:/MF)?\s*(?:N[º°O]\.?\s*)?[:\-]?\s*(\d{3}\.?\d{3}\.?\d{3}\s?[\-/.]?\s?\d{2})\b"
    ).unwrap();

    pub static ref CPF_STANDALONE: Regex = Regex::new(
        r"\b(\d{3}\.\d{3}\.\d{3}-\d{2}|\d{11})\b"
    ).unwrap();

    // RG (identity-document number)
    // Captures the whole printed number so a CPF after the label is seen
    // with all 11 digits.
    pub static ref RG_LABELED: Regex = Regex::new(
        r"(?:REGISTRO\s+GERAL|\bR\.?G\.?\b|IDENTIDADE\s+N[º°O]\.?)[^\d\n]{0,25}?(\d[\d.]*(?:\s?-\s?[\dX]+)?)"
    ).unwrap();

    pub static ref RG_STANDALONE: Regex = Regex::new(
        r"\b(\d{1,2}\.\d{3}\.\d{3}-[\dX])\b"
    ).unwrap();

    // CNS (national health-system number)
    pub static ref CNS_LABELED: Regex = Regex::new(
        r"(?:\bCNS\b|CART[ÃA]O\s+NACIONAL\s+DE\s+SA[ÚU]DE|CART[ÃA]O\s+SUS)[^\d]{0,20}?(\d{3}\s?\d{4}\s?\d{4}\s?\d{4})\b"
    ).unwrap();

    pub static ref CNS_STANDALONE: Regex = Regex::new(
        r"\b([1-27-9]\d{2}\s?\d{4}\s?\d{4}\s?\d{4})\b"
    ).unwrap();

    // ANS regulator code
    pub static ref REGULATOR_CODE_LABELED: Regex = Regex::new(
        r"\bANS\b\s*[\-–:]?\s*(?:N[º°O]\.?\s*)?[:\-]?\s*(\d{2,3}\.?\d{3}(?:\s?-\s?\d)?)\b"
    ).unwrap();

    pub static ref REGULATOR_CODE_STANDALONE: Regex = Regex::new(
        r"\b(\d{6})\b"
    ).unwrap();

    // Dates
    pub static ref BIRTH_DATE_LABELED: Regex = Regex::new(
        &format!(r"(?:NASC(?:IMENTO)?\.?|DT\.?\s*NASC\.?)[^\d]{{0,40}}?\b({DATE})\b")
    ).unwrap();

    pub static ref ISSUE_DATE_LABELED: Regex = Regex::new(
        &format!(r"EXPEDI[ÇC][ÃA]O[^\d]{{0,40}}?\b({DATE})\b")
    ).unwrap();

    pub static ref VALIDITY_LABELED: Regex = Regex::new(
        &format!(r"(?:VALIDADE|V[ÁA]LID[OA]\s+AT[ÉE]|VENCIMENTO)[^\d\n]{{0,30}}?\b({DATE})\b")
    ).unwrap();

    // Holder names
    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?m)(?:^|\s)(?:NOME(?:\s+DO\s+(?:BENEFICI[ÁA]RIO|SEGURADO|TITULAR))?|BENEFICI[ÁA]RIO|SEGURADO\(?A?\)?|TITULAR)[^\S\n]*[:\-]?[^\S\n]*([\p{Lu}'][\p{Lu}' .]{3,})$"
    ).unwrap();

    pub static ref NAME_NEXT_LINE: Regex = Regex::new(
        r"(?m)^(?:NOME(?:\s+DO\s+(?:BENEFICI[ÁA]RIO|SEGURADO|TITULAR))?|BENEFICI[ÁA]RIO|SEGURADO\(?A?\)?|NOME\s+COMPLETO)[^\S\n]*:?[^\S\n]*\n([^\n]+)$"
    ).unwrap();

    pub static ref FILIATION_LABEL: Regex = Regex::new(
        r"FILIA[ÇC][ÃA]O"
    ).unwrap();

    pub static ref PLACE_LABEL: Regex = Regex::new(
        r"NATURALIDADE|\bNATURAL\s+DE\b|LOCAL\s+DE\s+NASCIMENTO"
    ).unwrap();

    // Card numbers
    pub static ref CARD_NUMBER_LABELED: Regex = Regex::new(
        r"(?:CARTEIRINHA|CARTEIRA|N[º°O]?\.?\s*(?:DO\s+)?(?:CART[ÃA]O|BENEFICI[ÁA]RIO)|MATR[ÍI]CULA|C[ÓO]D(?:IGO|\.)?\s*(?:DO\s+)?(?:BENEFICI[ÁA]RIO|IDENTIFICA[ÇC][ÃA]O)|IDENTIFICA[ÇC][ÃA]O)[^\S\n]*[:\-]?[^\d\n]{0,15}(\d[\d .\-]{5,28}\d)"
    ).unwrap();

    pub static ref CARD_NUMBER_STANDALONE: Regex = Regex::new(
        r"\b(\d{4,}(?:[ \-]?\d{2,}){1,6})\b"
    ).unwrap();

    // SulAmérica prints 20 digits grouped 3-5-4-4-4.
    pub static ref SULAMERICA_CARD_NUMBER: Regex = Regex::new(
        r"\b(\d{3}[ .]?\d{5}[ .]?\d{4}[ .]?\d{4}[ .]?\d{4})\b"
    ).unwrap();

    // Unimed prints 17 digits: cooperative prefix, code, beneficiary, check digit.
    pub static ref UNIMED_CARD_NUMBER: Regex = Regex::new(
        r"\b(\d[ .]?\d{3}[ .]?\d{12}[ .\-]?\d)\b"
    ).unwrap();

    // Plan names
    pub static ref PLAN_LABELED: Regex = Regex::new(
        r"(?m)\bPLANO(?:\s+CONTRATADO)?[^\S\n]*[:\-][^\S\n]*([^\n]{2,60})$"
    ).unwrap();

    pub static ref PLAN_NEXT_LINE: Regex = Regex::new(
        r"(?m)^(?:PLANO|PRODUTO)[^\S\n]*:?[^\S\n]*\n([^\n]{2,60})$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regulator_code_labeled_variants() {
        for (text, expected) in [
            ("ANS - Nº 32630-5", "32630-5"),
            ("ANS Nº 006246", "006246"),
            ("ANS: 005711", "005711"),
        ] {
            let caps = REGULATOR_CODE_LABELED.captures(text).unwrap();
            assert_eq!(&caps[1], expected, "input: {text}");
        }
    }

    #[test]
    fn test_cpf_labeled() {
        let caps = CPF_LABELED.captures("CPF: 529.982.247-25").unwrap();
        assert_eq!(&caps[1], "529.982.247-25");
    }

    #[test]
    fn test_rg_labeled_takes_whole_number() {
        for (text, expected) in [
            ("REGISTRO GERAL 12.345.678-9   DATA DE EXPEDIÇÃO 10/05/2015", "12.345.678-9"),
            ("RG: 12.345.678-X", "12.345.678-X"),
            ("RG 1234567 SSP/SP", "1234567"),
            ("REGISTRO GERAL - CPF 529.982.247-25", "529.982.247-25"),
            ("RG: 111.444.777-35", "111.444.777-35"),
        ] {
            let caps = RG_LABELED.captures(text).unwrap();
            assert_eq!(&caps[1], expected, "input: {text}");
        }
    }

    #[test]
    fn test_name_labeled_same_line() {
        let caps = NAME_LABELED.captures("NOME: MARIA DA SILVA").unwrap();
        assert_eq!(&caps[1], "MARIA DA SILVA");
    }

    #[test]
    fn test_name_next_line() {
        let caps = NAME_NEXT_LINE.captures("NOME\nMARIA DA SILVA\nFILIAÇÃO").unwrap();
        assert_eq!(&caps[1], "MARIA DA SILVA");
    }

    #[test]
    fn test_birth_date_labeled_crosses_line() {
        let text = "NATURALIDADE DATA DE NASCIMENTO\nSÃO PAULO-SP 02/03/1985";
        let caps = BIRTH_DATE_LABELED.captures(text).unwrap();
        assert_eq!(&caps[1], "02/03/1985");
    }

    #[test]
    fn test_issuer_card_layouts() {
        let caps = SULAMERICA_CARD_NUMBER.captures("CARTEIRINHA 555 12345 6789 0123 4567").unwrap();
        assert_eq!(&caps[1], "555 12345 6789 0123 4567");
        let caps = UNIMED_CARD_NUMBER.captures("0 032 123456789012 3").unwrap();
        assert_eq!(&caps[1], "0 032 123456789012 3");
    }

    #[test]
    fn test_card_standalone_skips_dotted_ids() {
        assert!(CARD_NUMBER_STANDALONE.find("529.982.247-25").is_none());
        assert!(CARD_NUMBER_STANDALONE.find("0887 6543 2100 17").is_some());
    }
}
