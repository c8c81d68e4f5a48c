//! Person-name cleanup and validation.

use crate::text::fold_accents;

/// Words that never appear in a person's name but do appear on the same
/// lines as names (document headings, field labels, issuer brands, state
/// abbreviations). Compared after accent folding.
const NAME_STOPWORDS: &[&str] = &[
    // Identity-document headings and labels
    "REPUBLICA", "FEDERATIVA", "BRASIL", "ESTADO", "SECRETARIA", "SEGURANCA",
    "PUBLICA", "INSTITUTO", "IDENTIFICACAO", "REGISTRO", "GERAL", "CARTEIRA",
    "IDENTIDADE", "NOME", "FILIACAO", "NATURALIDADE", "NASCIMENTO", "DATA",
    "EXPEDICAO", "ASSINATURA", "DIRETOR", "DIRETORA", "VALIDA", "TERRITORIO",
    "NACIONAL", "LEI", "DOC", "ORIGEM", "CPF", "RG", "SSP", "POLEGAR", "DIREITO",
    // Insurance-card labels
    "PLANO", "SAUDE", "CARTAO", "CARTEIRINHA", "BENEFICIARIO", "VALIDADE",
    "ACOMODACAO", "APARTAMENTO", "ENFERMARIA", "COPARTICIPACAO", "ABRANGENCIA",
    "SEGMENTACAO", "CONTRATANTE", "EMPRESA", "AMBULATORIAL", "HOSPITALAR",
    "OBSTETRICIA", "ANS", "REDE", "CNS", "SEGURADO", "SEGURADA", "SEGUROS",
    "EMPRESARIAL", "COLETIVO", "INDIVIDUAL", "ADESAO", "LTDA", "TITULAR",
    "DEPENDENTE", "MATRICULA", "PRODUTO", "CODIGO", "VIA", "EMISSAO",
    "ATENDIMENTO", "CENTRAL", "COOPERATIVA", "MEDICA", "ODONTO",
    // Issuer brands
    "AMIL", "SULAMERICA", "BRADESCO", "UNIMED", "HAPVIDA", "NOTREDAME",
    "INTERMEDICA", "GNDI",
    // State abbreviations
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG",
    "PA", "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE",
    "TO",
];

/// Shortest accepted name, in characters.
const MIN_NAME_CHARS: usize = 5;
/// Longest accepted name, in characters.
const MAX_NAME_CHARS: usize = 70;
/// Most words accepted in a name.
const MAX_NAME_WORDS: usize = 8;

/// Collapse whitespace, uppercase, and strip surrounding punctuation.
pub fn clean_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_uppercase()
}

/// Whether a line has the typographic shape of a person's name: 2 to 8
/// alphabetic words, at least two of them longer than one letter.
///
/// This does not look at stopwords or exclusions; see [`validate_person_name`].
pub fn is_name_shaped(name: &str) -> bool {
    let chars = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&chars) {
        return false;
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() < 2 || words.len() > MAX_NAME_WORDS {
        return false;
    }

    let all_alphabetic = words
        .iter()
        .all(|w| w.chars().all(|c| c.is_alphabetic() || c == '\''));
    let long_words = words.iter().filter(|w| w.chars().count() > 1).count();

    all_alphabetic && long_words >= 2
}

/// Clean and validate a person-name candidate.
///
/// Returns the cleaned name when it is name-shaped, contains no stopword,
/// and is not one of `excluded` (already cleaned names known to belong to
/// someone else on the document, such as parents).
pub fn validate_person_name(raw: &str, excluded: &[String]) -> Option<String> {
    let name = clean_name(raw);

    if !is_name_shaped(&name) {
        return None;
    }

    let folded = fold_accents(&name);
    if folded.split_whitespace().any(|w| NAME_STOPWORDS.contains(&w)) {
        return None;
    }

    if excluded.iter().any(|e| fold_accents(e) == folded) {
        return None;
    }

    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  maria   da silva. "), "MARIA DA SILVA");
        assert_eq!(clean_name(": JOÃO PEREIRA"), "JOÃO PEREIRA");
    }

    #[test]
    fn test_valid_names() {
        assert_eq!(
            validate_person_name("MARIA DA SILVA SANTOS", &[]),
            Some("MARIA DA SILVA SANTOS".to_string())
        );
        assert_eq!(
            validate_person_name("José D'Ávila", &[]),
            Some("JOSÉ D'ÁVILA".to_string())
        );
    }

    #[test]
    fn test_rejects_headings_and_labels() {
        assert_eq!(validate_person_name("REPÚBLICA FEDERATIVA DO BRASIL", &[]), None);
        assert_eq!(validate_person_name("PLANO AMIL S580", &[]), None);
        assert_eq!(validate_person_name("SÃO PAULO SP", &[]), None);
        assert_eq!(validate_person_name("AMIL", &[]), None);
        assert_eq!(validate_person_name("MARIA 123", &[]), None);
    }

    #[test]
    fn test_rejects_excluded_names() {
        let parents = vec!["JOSE CARLOS SANTOS".to_string()];
        assert_eq!(validate_person_name("JOSÉ CARLOS SANTOS", &parents), None);
        assert!(validate_person_name("MARIA DA SILVA SANTOS", &parents).is_some());
    }
}
