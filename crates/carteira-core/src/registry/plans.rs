//! Per-issuer plan-name lexicon.
//!
//! OCR rarely reproduces a plan's marketing name. Cards print short plan
//! codes (`S580`, `SMART 400`) which are mapped here to one canonical display
//! name per plan.

use std::collections::HashMap;

use super::Issuer;
use crate::text::{contains_phrase, fold_accents, CardText};

/// One raw plan token and the canonical plan it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanEntry {
    /// Raw token as printed, uppercase and unaccented.
    pub raw: &'static str,
    /// Canonical display name.
    pub canonical: &'static str,
}

const fn plan(raw: &'static str, canonical: &'static str) -> PlanEntry {
    PlanEntry { raw, canonical }
}

const AMIL_PLANS: &[PlanEntry] = &[
    plan("S380", "Amil S380"),
    plan("S450", "Amil S450"),
    plan("S580", "Amil S580 Coparticipação"),
    plan("S580 QC", "Amil S580 Coparticipação"),
    plan("S 580", "Amil S580 Coparticipação"),
    plan("S750", "Amil S750"),
    plan("AMIL ONE S2500", "Amil One S2500"),
    plan("AMIL ONE S6500", "Amil One S6500 Black"),
    plan("AMIL FACIL S60", "Amil Fácil S60"),
    plan("BLUE I", "Amil Blue I"),
    plan("BLUE II", "Amil Blue II"),
];

const SULAMERICA_PLANS: &[PlanEntry] = &[
    plan("ESPECIAL 100", "SulAmérica Especial 100"),
    plan("EXECUTIVO", "SulAmérica Executivo"),
    plan("PRESTIGE", "SulAmérica Prestige"),
    plan("EXATO", "SulAmérica Exato"),
    plan("CLASSICO", "SulAmérica Clássico"),
    plan("BASICO", "SulAmérica Básico"),
];

const BRADESCO_PLANS: &[PlanEntry] = &[
    plan("NACIONAL FLEX", "Bradesco Saúde Nacional Flex"),
    plan("NAC FLEX", "Bradesco Saúde Nacional Flex"),
    plan("TOP NACIONAL", "Bradesco Saúde Top Nacional"),
    plan("NACIONAL PLUS", "Bradesco Saúde Nacional Plus"),
    plan("EFETIVO", "Bradesco Saúde Efetivo"),
    plan("PERFIL", "Bradesco Saúde Perfil"),
];

const UNIMED_PLANS: &[PlanEntry] = &[
    plan("UNIFACIL", "Unimed Unifácil"),
    plan("UNIPART", "Unimed Unipart"),
    plan("UNIPLAN", "Unimed Uniplan"),
    plan("ESTILO", "Unimed Estilo"),
    plan("PLENO", "Unimed Pleno"),
    plan("ALFA", "Unimed Alfa"),
    plan("BETA", "Unimed Beta"),
];

const HAPVIDA_PLANS: &[PlanEntry] = &[
    plan("NOSSO PLANO", "Hapvida Nosso Plano"),
    plan("MIX", "Hapvida Mix"),
    plan("PLENO", "Hapvida Pleno"),
];

const NOTREDAME_PLANS: &[PlanEntry] = &[
    plan("SMART 200", "NotreDame Smart 200"),
    plan("SMART 400", "NotreDame Smart 400"),
    plan("SMART 500", "NotreDame Smart 500"),
    plan("ADVANCE 600", "NotreDame Advance 600"),
    plan("PREMIUM 900", "NotreDame Premium 900"),
];

/// Read-only mapping from raw plan tokens to canonical plan names, per
/// issuer.
#[derive(Debug, Clone)]
pub struct PlanLexicon {
    entries: HashMap<Issuer, Vec<PlanEntry>>,
}

impl PlanLexicon {
    /// The built-in lexicon for every known issuer.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        for issuer in Issuer::ALL {
            let table = match issuer {
                Issuer::Amil => AMIL_PLANS,
                Issuer::SulAmerica => SULAMERICA_PLANS,
                Issuer::BradescoSaude => BRADESCO_PLANS,
                Issuer::Unimed => UNIMED_PLANS,
                Issuer::Hapvida => HAPVIDA_PLANS,
                Issuer::NotreDame => NOTREDAME_PLANS,
            };
            let mut table = table.to_vec();
            // Longest first so "S580 QC" is preferred over "S580".
            table.sort_by(|a, b| b.raw.len().cmp(&a.raw.len()));
            entries.insert(issuer, table);
        }
        Self { entries }
    }

    /// All entries of one issuer, longest raw token first.
    pub fn entries(&self, issuer: Issuer) -> &[PlanEntry] {
        self.entries.get(&issuer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical name for a raw token, if the issuer's lexicon knows it.
    ///
    /// Matching ignores case, accents, surrounding whitespace and repeated
    /// inner whitespace.
    pub fn lookup(&self, issuer: Issuer, raw: &str) -> Option<&'static str> {
        let key = lexicon_key(raw);
        self.entries(issuer)
            .iter()
            .find(|e| e.raw == key)
            .map(|e| e.canonical)
    }

    /// Canonical name for a raw token, or the trimmed token itself when it is
    /// not in the lexicon. Plan text is never dropped.
    pub fn canonicalize(&self, issuer: Option<Issuer>, raw: &str) -> String {
        issuer
            .and_then(|i| self.lookup(i, raw))
            .map(str::to_string)
            .unwrap_or_else(|| raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Raw tokens of `issuer` that appear as whole words in the text, in
    /// lexicon order (longest first).
    pub fn find_in_text(&self, issuer: Issuer, text: &CardText) -> Vec<&'static str> {
        self.entries(issuer)
            .iter()
            .filter(|e| text.contains(e.raw))
            .map(|e| e.raw)
            .collect()
    }

    /// Raw tokens that map to a canonical name.
    pub fn raw_tokens_for(&self, issuer: Issuer, canonical: &str) -> Vec<&'static str> {
        let key = lexicon_key(canonical);
        self.entries(issuer)
            .iter()
            .filter(|e| lexicon_key(e.canonical) == key)
            .map(|e| e.raw)
            .collect()
    }

    /// Canonical name of the longest lexicon token occurring inside `raw`.
    ///
    /// Used when a plan label captures more than the plan code, as in
    /// `S580 QC NACIONAL`.
    pub fn canonical_within(&self, issuer: Issuer, raw: &str) -> Option<&'static str> {
        let key = lexicon_key(raw);
        self.entries(issuer)
            .iter()
            .find(|e| contains_phrase(&key, e.raw))
            .map(|e| e.canonical)
    }
}

fn lexicon_key(raw: &str) -> String {
    fold_accents(&raw.split_whitespace().collect::<Vec<_>>().join(" ")).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        let lexicon = PlanLexicon::builtin();
        assert_eq!(lexicon.lookup(Issuer::Amil, "  s580 "), Some("Amil S580 Coparticipação"));
        assert_eq!(lexicon.lookup(Issuer::Amil, "s580   qc"), Some("Amil S580 Coparticipação"));
        assert_eq!(lexicon.lookup(Issuer::SulAmerica, "Clássico"), Some("SulAmérica Clássico"));
        assert_eq!(lexicon.lookup(Issuer::SulAmerica, "S580"), None);
    }

    #[test]
    fn test_unmapped_token_passes_through() {
        let lexicon = PlanLexicon::builtin();
        assert_eq!(lexicon.canonicalize(Some(Issuer::Amil), " PLANO  XYZ "), "PLANO XYZ");
        assert_eq!(lexicon.canonicalize(None, "S580"), "S580");
    }

    #[test]
    fn test_find_in_text_prefers_longest() {
        let lexicon = PlanLexicon::builtin();
        let text = CardText::new("Amil\nPlano: S580 QC Nacional");
        assert_eq!(lexicon.find_in_text(Issuer::Amil, &text), vec!["S580 QC", "S580"]);
    }

    #[test]
    fn test_canonical_within_longer_capture() {
        let lexicon = PlanLexicon::builtin();
        assert_eq!(
            lexicon.canonical_within(Issuer::NotreDame, "Smart 400 Enfermaria"),
            Some("NotreDame Smart 400")
        );
        assert_eq!(
            lexicon.canonical_within(Issuer::Amil, "S580 QC NACIONAL"),
            Some("Amil S580 Coparticipação")
        );
        assert_eq!(lexicon.canonical_within(Issuer::Amil, "S5800"), None);
    }

    #[test]
    fn test_reverse_lookup_ignores_case_and_accents() {
        let lexicon = PlanLexicon::builtin();
        let expected = vec!["S580 QC", "S 580", "S580"];
        let mut tokens = lexicon.raw_tokens_for(Issuer::Amil, "AMIL S580 COPARTICIPAÇÃO");
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        assert_eq!(tokens, expected);
        assert_eq!(
            lexicon.raw_tokens_for(Issuer::Amil, "amil s580 coparticipacao").len(),
            3
        );
        assert!(lexicon.raw_tokens_for(Issuer::Amil, "Amil S999").is_empty());
    }

    #[test]
    fn test_every_canonical_name_round_trips() {
        let lexicon = PlanLexicon::builtin();
        for issuer in Issuer::ALL {
            for entry in lexicon.entries(issuer) {
                let tokens = lexicon.raw_tokens_for(issuer, entry.canonical);
                assert!(!tokens.is_empty(), "{} has no raw token", entry.canonical);
                for token in tokens {
                    assert_eq!(lexicon.lookup(issuer, token), Some(entry.canonical));
                }
            }
        }
    }
}
