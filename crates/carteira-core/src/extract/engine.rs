//! Ordered rule evaluation shared by every extractor.
//!
//! A field table lists, per field, the rules to try in priority order and the
//! validator every candidate must pass. For each field the engine walks the
//! rules in order and each rule's candidates in document order; the first
//! candidate the validator accepts is the field's value and no later rule is
//! consulted.

use regex::Regex;
use tracing::trace;

use crate::fields::{
    classify_id_length, clean_name, digits_of, format_date_iso, format_health_system_number,
    format_taxpayer_id, is_name_shaped, normalize_identity_number, parse_local_date,
    validate_checksum_id, validate_health_system_number, validate_person_name, IdLengthClass,
};
use crate::models::document::{ExtractedField, ExtractionIssue, FieldName};
use crate::registry::{Issuer, IssuerRegistry};
use crate::text::CardText;

/// Where a rule looks for candidates.
#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    /// Capture group 1 of a pattern anchored on a printed label.
    Labeled(&'static Regex),
    /// Every match of an unlabelled pattern (group 1 when present).
    Standalone(&'static Regex),
    /// Plan-lexicon tokens of the selected issuer, longest first.
    LexiconToken,
    /// Lines with the shape of a person's name. A scan that only finds
    /// rejected lines leaves the field absent rather than invalid.
    NameLine,
}

/// One way of finding a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Provenance recorded on the extracted field.
    pub id: &'static str,
    pub kind: RuleKind,
    /// Confidence given to a value this rule produces.
    pub confidence: f32,
}

impl FieldRule {
    pub fn labeled(id: &'static str, pattern: &'static Regex, confidence: f32) -> Self {
        Self { id, kind: RuleKind::Labeled(pattern), confidence }
    }

    pub fn standalone(id: &'static str, pattern: &'static Regex, confidence: f32) -> Self {
        Self { id, kind: RuleKind::Standalone(pattern), confidence }
    }

    pub fn lexicon(id: &'static str, confidence: f32) -> Self {
        Self { id, kind: RuleKind::LexiconToken, confidence }
    }

    pub fn name_line(id: &'static str, confidence: f32) -> Self {
        Self { id, kind: RuleKind::NameLine, confidence }
    }
}

/// Acceptance test and normalization for a field's candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValidator {
    /// CPF: 11 digits passing the checksum, formatted `XXX.XXX.XXX-XX`.
    TaxpayerId,
    /// RG: a short id (7 to 9 characters), digits and optional `X`.
    IdentityNumber,
    /// Local date, normalized to ISO `YYYY-MM-DD`.
    Date,
    /// Person name, not a heading and not an excluded name.
    PersonName,
    /// Card number with a digit count in range, not a valid CPF or CNS.
    CardNumber { min_digits: usize, max_digits: usize },
    /// Plan name, canonicalized through the issuer lexicon.
    PlanName,
    /// CNS: 15 digits passing the checksum.
    HealthSystemNumber,
}

/// A field, whether the extractor requires it, and how to find it.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: FieldName,
    pub required: bool,
    pub validator: FieldValidator,
    /// Rules in priority order.
    pub rules: Vec<FieldRule>,
}

impl FieldSpec {
    pub fn new(field: FieldName, validator: FieldValidator) -> Self {
        Self {
            field,
            required: false,
            validator,
            rules: Vec::new(),
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a rule with lower priority than the ones already added.
    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Everything rules and validators may consult for one document.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub text: &'a CardText,
    /// Issuer whose lexicon canonicalizes plan names.
    pub issuer: Option<Issuer>,
    pub registry: &'a IssuerRegistry,
    /// Cleaned names that belong to someone other than the holder.
    pub excluded_names: Vec<String>,
    /// Cleaned lines the name-line scan skips.
    pub excluded_lines: Vec<String>,
    /// When false, CPF and CNS only need the right digit count.
    pub validate_checksums: bool,
}

impl<'a> RuleContext<'a> {
    pub fn new(text: &'a CardText, registry: &'a IssuerRegistry) -> Self {
        Self {
            text,
            issuer: None,
            registry,
            excluded_names: Vec::new(),
            excluded_lines: Vec::new(),
            validate_checksums: true,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<Issuer>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_excluded_names(mut self, names: Vec<String>) -> Self {
        self.excluded_names = names;
        self
    }

    pub fn with_excluded_lines(mut self, lines: Vec<String>) -> Self {
        self.excluded_lines = lines;
        self
    }

    pub fn with_checksums(mut self, validate: bool) -> Self {
        self.validate_checksums = validate;
        self
    }
}

/// Fields produced by a table, in table order, and the problems found.
#[derive(Debug, Clone, Default)]
pub struct TableOutcome {
    pub fields: Vec<ExtractedField>,
    pub issues: Vec<ExtractionIssue>,
}

/// Evaluate a field table against a document.
pub fn run_table(specs: &[FieldSpec], ctx: &RuleContext<'_>) -> TableOutcome {
    let mut outcome = TableOutcome::default();

    for spec in specs {
        let (field, saw_candidates) = run_spec(spec, ctx);
        if !field.is_present() {
            outcome.issues.push(if saw_candidates {
                ExtractionIssue::FieldInvalid(spec.field)
            } else {
                ExtractionIssue::FieldAbsent(spec.field)
            });
        }
        outcome.fields.push(field);
    }

    outcome
}

fn run_spec(spec: &FieldSpec, ctx: &RuleContext<'_>) -> (ExtractedField, bool) {
    let mut saw_candidates = false;

    for rule in &spec.rules {
        let scan = matches!(rule.kind, RuleKind::NameLine);
        for candidate in candidates(rule, ctx) {
            saw_candidates |= !scan;
            match spec.validator.validate(&candidate, ctx) {
                Some(value) => {
                    trace!("{} <- {:?} via {}", spec.field, value, rule.id);
                    return (
                        ExtractedField {
                            name: spec.field,
                            value: Some(value),
                            confidence: rule.confidence,
                            rule: Some(rule.id.to_string()),
                        },
                        true,
                    );
                }
                None => trace!("{}: rejected {:?} from {}", spec.field, candidate, rule.id),
            }
        }
    }

    (ExtractedField::absent(spec.field), saw_candidates)
}

fn candidates(rule: &FieldRule, ctx: &RuleContext<'_>) -> Vec<String> {
    match rule.kind {
        RuleKind::Labeled(pattern) | RuleKind::Standalone(pattern) => pattern
            .captures_iter(ctx.text.upper())
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().trim().to_string())
            .collect(),
        RuleKind::LexiconToken => ctx
            .issuer
            .map(|issuer| ctx.registry.plans().find_in_text(issuer, ctx.text))
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect(),
        RuleKind::NameLine => ctx
            .text
            .lines()
            .filter(|line| {
                let name = clean_name(line);
                is_name_shaped(&name) && !ctx.excluded_lines.contains(&name)
            })
            .map(str::to_string)
            .collect(),
    }
}

impl FieldValidator {
    /// Normalized value when the candidate is acceptable.
    pub fn validate(&self, raw: &str, ctx: &RuleContext<'_>) -> Option<String> {
        match *self {
            FieldValidator::TaxpayerId => {
                let digits = digits_of(raw);
                let valid = if ctx.validate_checksums {
                    validate_checksum_id(&digits)
                } else {
                    classify_id_length(&digits) == IdLengthClass::LongId
                };
                valid.then(|| format_taxpayer_id(&digits))
            }
            FieldValidator::IdentityNumber => normalize_identity_number(raw)
                .filter(|n| classify_id_length(n) == IdLengthClass::ShortId),
            FieldValidator::Date => parse_local_date(raw).map(format_date_iso),
            FieldValidator::PersonName => validate_person_name(raw, &ctx.excluded_names),
            FieldValidator::CardNumber { min_digits, max_digits } => {
                let digits = digits_of(raw);
                if !(min_digits..=max_digits).contains(&digits.len()) {
                    return None;
                }
                // Other identifiers printed on the card are not card numbers.
                if digits.len() == 11 && validate_checksum_id(&digits) {
                    return None;
                }
                if digits.len() == 15 && validate_health_system_number(&digits) {
                    return None;
                }
                Some(digits)
            }
            FieldValidator::PlanName => {
                let raw = raw.trim();
                if !raw.chars().any(char::is_alphanumeric) {
                    return None;
                }
                let plans = ctx.registry.plans();
                let canonical = ctx.issuer.and_then(|issuer| {
                    plans
                        .lookup(issuer, raw)
                        .or_else(|| plans.canonical_within(issuer, raw))
                });
                Some(match canonical {
                    Some(name) => name.to_string(),
                    None => plans.canonicalize(ctx.issuer, raw),
                })
            }
            FieldValidator::HealthSystemNumber => {
                let digits = digits_of(raw);
                let valid = if ctx.validate_checksums {
                    validate_health_system_number(&digits)
                } else {
                    digits.len() == 15
                };
                valid.then(|| format_health_system_number(&digits))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::patterns::{CPF_LABELED, CPF_STANDALONE};
    use pretty_assertions::assert_eq;

    fn cpf_spec() -> FieldSpec {
        FieldSpec::new(FieldName::TaxpayerId, FieldValidator::TaxpayerId)
            .rule(FieldRule::labeled("cpf_labeled", &CPF_LABELED, 0.95))
            .rule(FieldRule::standalone("cpf_standalone", &CPF_STANDALONE, 0.7))
    }

    #[test]
    fn test_first_valid_candidate_wins() {
        let text = CardText::new("CPF: 111.111.111-11\n529.982.247-25\n111.444.777-35");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry);

        let outcome = run_table(&[cpf_spec()], &ctx);
        let field = &outcome.fields[0];
        assert_eq!(field.value.as_deref(), Some("529.982.247-25"));
        assert_eq!(field.rule.as_deref(), Some("cpf_standalone"));
        assert_eq!(field.confidence, 0.7);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_invalid_candidates_null_the_field() {
        let text = CardText::new("CPF: 111.111.111-11");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry);

        let outcome = run_table(&[cpf_spec()], &ctx);
        assert_eq!(outcome.fields[0], ExtractedField::absent(FieldName::TaxpayerId));
        assert_eq!(outcome.issues, vec![ExtractionIssue::FieldInvalid(FieldName::TaxpayerId)]);
    }

    #[test]
    fn test_no_candidates_is_absent() {
        let text = CardText::new("NOTHING HERE");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry);

        let outcome = run_table(&[cpf_spec()], &ctx);
        assert_eq!(outcome.issues, vec![ExtractionIssue::FieldAbsent(FieldName::TaxpayerId)]);
    }

    #[test]
    fn test_rejected_name_lines_leave_field_absent() {
        let spec = FieldSpec::new(FieldName::HolderName, FieldValidator::PersonName)
            .rule(FieldRule::name_line("name_line", 0.5));
        let text = CardText::new("REPÚBLICA FEDERATIVA DO BRASIL\nCARTEIRA DE IDENTIDADE");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry);

        let outcome = run_table(&[spec], &ctx);
        assert!(!outcome.fields[0].is_present());
        assert_eq!(outcome.issues, vec![ExtractionIssue::FieldAbsent(FieldName::HolderName)]);
    }

    #[test]
    fn test_name_line_scan_skips_excluded_lines() {
        let spec = FieldSpec::new(FieldName::HolderName, FieldValidator::PersonName)
            .rule(FieldRule::name_line("name_line", 0.5));
        let text = CardText::new("RIO DE JANEIRO\nMARIA DA SILVA");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry)
            .with_excluded_lines(vec!["RIO DE JANEIRO".to_string()]);

        let outcome = run_table(&[spec], &ctx);
        assert_eq!(outcome.fields[0].value.as_deref(), Some("MARIA DA SILVA"));
    }

    #[test]
    fn test_checksums_can_be_disabled() {
        let text = CardText::new("CPF: 123.456.789-00");
        let registry = IssuerRegistry::builtin();
        let strict = RuleContext::new(&text, &registry);
        let lenient = RuleContext::new(&text, &registry).with_checksums(false);

        assert!(!run_table(&[cpf_spec()], &strict).fields[0].is_present());
        assert_eq!(
            run_table(&[cpf_spec()], &lenient).fields[0].value.as_deref(),
            Some("123.456.789-00")
        );
    }

    #[test]
    fn test_card_number_rejects_other_identifiers() {
        let text = CardText::new("");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry);
        let validator = FieldValidator::CardNumber { min_digits: 8, max_digits: 20 };

        assert_eq!(validator.validate("529.982.247-25", &ctx), None);
        assert_eq!(validator.validate("123 4567 8901 0000", &ctx), None);
        assert_eq!(validator.validate("1234567", &ctx), None);
        assert_eq!(validator.validate("0887 6543 2100 17", &ctx), Some("08876543210017".to_string()));
    }

    #[test]
    fn test_plan_name_uses_issuer_lexicon() {
        let text = CardText::new("");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry).with_issuer(Some(Issuer::Amil));

        assert_eq!(
            FieldValidator::PlanName.validate("S580 QC", &ctx),
            Some("Amil S580 Coparticipação".to_string())
        );
        assert_eq!(
            FieldValidator::PlanName.validate("S580 NACIONAL", &ctx),
            Some("Amil S580 Coparticipação".to_string())
        );
        assert_eq!(FieldValidator::PlanName.validate("EXECUTIVO", &ctx), Some("EXECUTIVO".to_string()));
        assert_eq!(FieldValidator::PlanName.validate(" - ", &ctx), None);
    }

    #[test]
    fn test_identity_number_must_be_short() {
        let text = CardText::new("");
        let registry = IssuerRegistry::builtin();
        let ctx = RuleContext::new(&text, &registry);

        assert!(FieldValidator::IdentityNumber.validate("12.345.678-9", &ctx).is_some());
        assert_eq!(FieldValidator::IdentityNumber.validate("529.982.247-25", &ctx), None);
    }
}
