//! RG identity cards.
//!
//! Parents' names are printed under FILIAÇÃO in the same typography as the
//! holder's name, so they are collected first and excluded from the holder
//! name candidates. Birthplaces printed by the NATURALIDADE label are skipped
//! by the name-line scan.

use lazy_static::lazy_static;
use tracing::debug;

use super::engine::{FieldRule, FieldSpec, FieldValidator};
use crate::fields::patterns::{
    BIRTH_DATE_LABELED, CPF_LABELED, CPF_STANDALONE, FILIATION_LABEL, ISSUE_DATE_LABELED,
    NAME_LABELED, NAME_NEXT_LINE, PLACE_LABEL, RG_LABELED, RG_STANDALONE,
};
use crate::fields::{clean_name, is_name_shaped};
use crate::models::document::FieldName;
use crate::text::CardText;

/// Name-shaped lines read after the FILIAÇÃO label.
const FILIATION_LINES: usize = 2;

lazy_static! {
    static ref FIELDS: Vec<FieldSpec> = vec![
        FieldSpec::new(FieldName::HolderName, FieldValidator::PersonName)
            .required()
            .rule(FieldRule::labeled("name_next_line", &NAME_NEXT_LINE, 0.95))
            .rule(FieldRule::labeled("name_labeled", &NAME_LABELED, 0.9))
            .rule(FieldRule::name_line("name_line", 0.6)),
        FieldSpec::new(FieldName::IdentityNumber, FieldValidator::IdentityNumber)
            .rule(FieldRule::labeled("rg_labeled", &RG_LABELED, 0.95))
            .rule(FieldRule::standalone("rg_standalone", &RG_STANDALONE, 0.75)),
        FieldSpec::new(FieldName::TaxpayerId, FieldValidator::TaxpayerId)
            .rule(FieldRule::labeled("cpf_labeled", &CPF_LABELED, 0.95))
            .rule(FieldRule::standalone("cpf_standalone", &CPF_STANDALONE, 0.7)),
        FieldSpec::new(FieldName::BirthDate, FieldValidator::Date)
            .rule(FieldRule::labeled("birth_date_labeled", &BIRTH_DATE_LABELED, 0.9)),
        FieldSpec::new(FieldName::IssueDate, FieldValidator::Date)
            .rule(FieldRule::labeled("issue_date_labeled", &ISSUE_DATE_LABELED, 0.9)),
    ];
}

pub(super) fn fields() -> &'static [FieldSpec] {
    FIELDS.as_slice()
}

/// Names listed under FILIAÇÃO: any name on the label line itself, then
/// name-shaped lines after it until two parents are accounted for.
pub fn filiation_names(text: &CardText) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let Some(index) = lines.iter().position(|line| FILIATION_LABEL.is_match(line)) else {
        return Vec::new();
    };

    let mut names = Vec::new();

    if let Some(label) = FILIATION_LABEL.find(lines[index]) {
        names.extend(
            lines[index][label.end()..]
                .split('/')
                .map(clean_name)
                .filter(|name| is_name_shaped(name)),
        );
    }

    names.extend(
        lines[index + 1..]
            .iter()
            .take(FILIATION_LINES.saturating_sub(names.len()))
            .map(|line| clean_name(line))
            .filter(|name| is_name_shaped(name)),
    );

    debug!("Excluding {} filiation name(s)", names.len());
    names
}

/// Place names printed by a birthplace label: the rest of the label line and
/// the name-shaped lines right above and below it.
pub fn place_names(text: &CardText) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut places = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(label) = PLACE_LABEL.find(line) else {
            continue;
        };
        let neighbours = [index.checked_sub(1), Some(index + 1)]
            .into_iter()
            .flatten()
            .filter_map(|i| lines.get(i).copied());

        places.extend(
            std::iter::once(&line[label.end()..])
                .chain(neighbours)
                .filter(|candidate| !PLACE_LABEL.is_match(candidate))
                .map(clean_name)
                .filter(|name| is_name_shaped(name)),
        );
    }

    places
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;
    use crate::models::document::ExtractionIssue;
    use crate::registry::IssuerRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filiation_names_following_lines() {
        let text = CardText::new("FILIAÇÃO\nJOSÉ CARLOS SANTOS\nANA PAULA DA SILVA\nNATURALIDADE");
        assert_eq!(
            filiation_names(&text),
            vec!["JOSÉ CARLOS SANTOS".to_string(), "ANA PAULA DA SILVA".to_string()]
        );
    }

    #[test]
    fn test_filiation_names_on_label_line() {
        let text = CardText::new("Filiação: JOSE CARLOS SANTOS / ANA PAULA DA SILVA\n12/03/1980");
        assert_eq!(
            filiation_names(&text),
            vec!["JOSE CARLOS SANTOS".to_string(), "ANA PAULA DA SILVA".to_string()]
        );
    }

    #[test]
    fn test_filiation_label_line_plus_next_line() {
        let text = CardText::new(
            "FILIAÇÃO JOSE CARLOS SANTOS\nANA PAULA DA SILVA\nMARIA DA SILVA SANTOS",
        );
        assert_eq!(
            filiation_names(&text),
            vec!["JOSE CARLOS SANTOS".to_string(), "ANA PAULA DA SILVA".to_string()]
        );
    }

    #[test]
    fn test_holder_after_parent_on_label_line() {
        let text = CardText::new(
            "REGISTRO GERAL 12.345.678-9\nDATA DE EXPEDIÇÃO 01/02/2010\nFILIAÇÃO JOSE CARLOS SANTOS\nANA PAULA DA SILVA\nMARIA DA SILVA SANTOS",
        );
        let outcome = Extractor::Identity.extract(&text, &IssuerRegistry::builtin(), true);
        assert_eq!(outcome.fields[0].value.as_deref(), Some("MARIA DA SILVA SANTOS"));
    }

    #[test]
    fn test_place_names_around_label() {
        let text = CardText::new("RIO DE JANEIRO\nNATURALIDADE\nBELO HORIZONTE\nDATA DE NASCIMENTO 02/03/1985");
        assert_eq!(
            place_names(&text),
            vec!["RIO DE JANEIRO".to_string(), "BELO HORIZONTE".to_string()]
        );
        assert!(place_names(&CardText::new("NOME\nMARIA DA SILVA")).is_empty());
    }

    #[test]
    fn test_birthplace_never_becomes_holder() {
        let text = CardText::new(
            "REGISTRO GERAL 12.345.678-9\nFILIAÇÃO\nJOSE CARLOS SANTOS\nANA PAULA DA SILVA\nRIO DE JANEIRO\nNATURALIDADE",
        );
        let outcome = Extractor::Identity.extract(&text, &IssuerRegistry::builtin(), true);
        assert!(!outcome.fields[0].is_present());
        assert!(outcome
            .issues
            .contains(&ExtractionIssue::FieldAbsent(FieldName::HolderName)));
    }

    #[test]
    fn test_cpf_after_rg_label_is_not_an_rg() {
        let text = CardText::new(
            "REGISTRO GERAL - CPF 529.982.247-25\nNOME\nMARIA DA SILVA SANTOS",
        );
        let outcome = Extractor::Identity.extract(&text, &IssuerRegistry::builtin(), true);
        let value = |name| {
            outcome
                .fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.value.clone())
        };

        assert_eq!(value(FieldName::IdentityNumber), None);
        assert_eq!(value(FieldName::TaxpayerId).as_deref(), Some("529.982.247-25"));
        assert!(outcome
            .issues
            .contains(&ExtractionIssue::FieldInvalid(FieldName::IdentityNumber)));

        let text = CardText::new("RG: 111.444.777-35\nNOME\nMARIA DA SILVA SANTOS");
        let outcome = Extractor::Identity.extract(&text, &IssuerRegistry::builtin(), true);
        assert_eq!(outcome.fields[1].name, FieldName::IdentityNumber);
        assert_eq!(outcome.fields[1].value, None);
    }

    #[test]
    fn test_no_filiation_label() {
        assert!(filiation_names(&CardText::new("NOME\nMARIA DA SILVA")).is_empty());
    }

    #[test]
    fn test_parents_never_become_holder() {
        // Unlabelled name lines: the first is a parent.
        let text = CardText::new(
            "REGISTRO GERAL 12.345.678-9\nFILIAÇÃO\nJOSE CARLOS SANTOS\nANA PAULA DA SILVA\nMARIA DA SILVA SANTOS",
        );
        let outcome = Extractor::Identity.extract(&text, &IssuerRegistry::builtin(), true);
        let holder = &outcome.fields[0];
        assert_eq!(holder.value.as_deref(), Some("MARIA DA SILVA SANTOS"));
        assert_eq!(holder.rule.as_deref(), Some("name_line"));
    }
}
