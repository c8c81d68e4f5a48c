//! Registry of known health-insurance issuers.
//!
//! Issuers are a closed set. An issuer is either one of the entries below or
//! absent; nothing here is ever built from document text.

mod plans;

pub use plans::{PlanEntry, PlanLexicon};

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::text::CardText;

/// A known health-insurance operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issuer {
    Amil,
    SulAmerica,
    BradescoSaude,
    Unimed,
    Hapvida,
    NotreDame,
}

impl Issuer {
    /// Every issuer, in text-signature priority order.
    pub const ALL: [Issuer; 6] = [
        Issuer::Amil,
        Issuer::SulAmerica,
        Issuer::BradescoSaude,
        Issuer::Unimed,
        Issuer::Hapvida,
        Issuer::NotreDame,
    ];
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(IssuerRegistry::global().identity(*self).name)
    }
}

/// Static description of an issuer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuerIdentity {
    /// Which issuer this is.
    pub issuer: Issuer,

    /// Canonical display name.
    pub name: &'static str,

    /// ANS registration code, six digits, zero padded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulator_code: Option<&'static str>,

    /// Phrases (uppercase, unaccented) that identify the issuer in free text.
    #[serde(skip)]
    pub signatures: &'static [&'static str],

    /// Hits needed before the issuer is selected from text signatures.
    #[serde(skip)]
    pub min_hits: usize,

    /// Hits counted as complete evidence when computing the hit ratio.
    #[serde(skip)]
    pub full_hits: usize,
}

/// Result of scoring one issuer's signatures against a document.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureScore {
    pub hits: usize,
    /// Signatures that matched, in declaration order.
    pub matched: Vec<&'static str>,
    /// `hits / full_hits`, capped at 1.0.
    pub ratio: f32,
    /// Whether `hits` reached the issuer's threshold.
    pub selected: bool,
}

const BUILTIN_ISSUERS: &[IssuerIdentity] = &[
    IssuerIdentity {
        issuer: Issuer::Amil,
        name: "AMIL",
        regulator_code: Some("326305"),
        signatures: &["AMIL", "AMIL ASSISTENCIA MEDICA", "AMIL ONE", "AMIL FACIL", "AMIL SAUDE"],
        min_hits: 1,
        full_hits: 2,
    },
    IssuerIdentity {
        issuer: Issuer::SulAmerica,
        name: "SUL AMERICA",
        regulator_code: Some("006246"),
        signatures: &[
            "SULAMERICA",
            "SUL AMERICA",
            "SULAMERICA SAUDE",
            "SUL AMERICA SAUDE",
            "SUL AMERICA COMPANHIA DE SEGURO SAUDE",
        ],
        min_hits: 1,
        full_hits: 2,
    },
    IssuerIdentity {
        issuer: Issuer::BradescoSaude,
        name: "BRADESCO SAUDE",
        regulator_code: Some("005711"),
        signatures: &["BRADESCO SAUDE", "BRADESCO SEGUROS", "BRADESCO SAUDE S.A", "SAUDE TOP"],
        min_hits: 1,
        full_hits: 2,
    },
    IssuerIdentity {
        issuer: Issuer::Unimed,
        name: "UNIMED",
        regulator_code: Some("339679"),
        signatures: &[
            "UNIMED",
            "CENTRAL NACIONAL UNIMED",
            "COOPERATIVA DE TRABALHO MEDICO",
            "UNIMED SEGUROS",
        ],
        min_hits: 1,
        full_hits: 2,
    },
    IssuerIdentity {
        issuer: Issuer::Hapvida,
        name: "HAPVIDA",
        regulator_code: Some("368253"),
        signatures: &["HAPVIDA", "HAPVIDA ASSISTENCIA MEDICA", "HAP VIDA"],
        min_hits: 1,
        full_hits: 2,
    },
    IssuerIdentity {
        issuer: Issuer::NotreDame,
        name: "NOTREDAME INTERMEDICA",
        regulator_code: Some("359017"),
        signatures: &["NOTREDAME", "NOTRE DAME", "INTERMEDICA", "GNDI"],
        min_hits: 1,
        full_hits: 2,
    },
];

lazy_static! {
    static ref GLOBAL_REGISTRY: IssuerRegistry = IssuerRegistry::builtin();
}

/// Read-only lookup tables for issuers: regulator codes, text signatures
/// and plan names.
#[derive(Debug, Clone)]
pub struct IssuerRegistry {
    issuers: Vec<IssuerIdentity>,
    by_code: HashMap<&'static str, Issuer>,
    plans: PlanLexicon,
}

impl IssuerRegistry {
    /// Build the registry of built-in issuers.
    pub fn builtin() -> Self {
        let issuers = BUILTIN_ISSUERS.to_vec();
        let by_code = issuers
            .iter()
            .filter_map(|i| i.regulator_code.map(|code| (code, i.issuer)))
            .collect();

        Self {
            issuers,
            by_code,
            plans: PlanLexicon::builtin(),
        }
    }

    /// The process-wide registry, initialized on first use.
    pub fn global() -> &'static IssuerRegistry {
        &GLOBAL_REGISTRY
    }

    /// Static description of an issuer.
    pub fn identity(&self, issuer: Issuer) -> &IssuerIdentity {
        self.issuers
            .iter()
            .find(|i| i.issuer == issuer)
            .unwrap_or_else(|| unreachable!("every Issuer variant is registered"))
    }

    /// Issuers in text-signature priority order.
    pub fn issuers(&self) -> impl Iterator<Item = &IssuerIdentity> {
        self.issuers.iter()
    }

    /// Look up an issuer by ANS code. The code may contain separators and may
    /// omit leading zeros.
    pub fn by_regulator_code(&self, code: &str) -> Option<&IssuerIdentity> {
        let code = normalize_regulator_code(code)?;
        self.by_code
            .get(code.as_str())
            .map(|issuer| self.identity(*issuer))
    }

    /// Score one issuer's text signatures against a document.
    pub fn score_signatures(&self, issuer: Issuer, text: &CardText) -> SignatureScore {
        let identity = self.identity(issuer);
        let matched: Vec<&'static str> = identity
            .signatures
            .iter()
            .copied()
            .filter(|sig| text.contains(sig))
            .collect();
        let hits = matched.len();

        SignatureScore {
            hits,
            ratio: (hits as f32 / identity.full_hits.max(1) as f32).min(1.0),
            selected: hits >= identity.min_hits,
            matched,
        }
    }

    /// Plan-name lexicon.
    pub fn plans(&self) -> &PlanLexicon {
        &self.plans
    }
}

impl Default for IssuerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalize a printed ANS code to six digits.
///
/// Separators are dropped and missing leading zeros restored. Returns `None`
/// when the code has no digits or more than six.
pub fn normalize_regulator_code(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || digits.len() > 6 {
        return None;
    }
    Some(format!("{digits:0>6}"))
}
