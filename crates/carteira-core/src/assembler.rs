//! Maps an [`ExtractionResult`] onto the flat external schema consumed by
//! form-prefill callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::document::{
    DetectionMethod, DocumentCategory, ExtractionResult, FieldName,
};

/// Flat, serializable view of one processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub category: DocumentCategory,

    /// Canonical issuer name.
    pub issuer: Option<String>,

    /// Issuer ANS code.
    pub issuer_code: Option<String>,

    pub method: Option<DetectionMethod>,

    pub holder_name: Option<String>,
    pub identity_number: Option<String>,
    pub taxpayer_id: Option<String>,
    /// ISO `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    pub card_number: Option<String>,
    pub plan_name: Option<String>,
    pub health_system_number: Option<String>,
    /// ISO `YYYY-MM-DD`.
    pub issue_date: Option<String>,
    /// ISO `YYYY-MM-DD`.
    pub valid_until: Option<String>,

    /// Overall confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Confidence reached the accept threshold.
    pub accepted: bool,

    /// Always `!accepted`.
    pub needs_review: bool,

    /// Confidence of every populated field, keyed by field name.
    #[serde(default)]
    pub field_confidence: BTreeMap<String, f32>,

    /// Human-readable issue messages.
    #[serde(default)]
    pub issues: Vec<String>,
}

impl StructuredDocument {
    /// Column names of [`to_csv_record`](Self::to_csv_record), in order.
    pub const CSV_HEADERS: [&'static str; 17] = [
        "category",
        "issuer",
        "issuer_code",
        "method",
        "holder_name",
        "identity_number",
        "taxpayer_id",
        "birth_date",
        "card_number",
        "plan_name",
        "health_system_number",
        "issue_date",
        "valid_until",
        "confidence",
        "accepted",
        "needs_review",
        "issues",
    ];

    /// One flat CSV row. Issues are joined with `; `.
    pub fn to_csv_record(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.category.to_string(),
            opt(&self.issuer),
            opt(&self.issuer_code),
            self.method.map(|m| m.to_string()).unwrap_or_default(),
            opt(&self.holder_name),
            opt(&self.identity_number),
            opt(&self.taxpayer_id),
            opt(&self.birth_date),
            opt(&self.card_number),
            opt(&self.plan_name),
            opt(&self.health_system_number),
            opt(&self.issue_date),
            opt(&self.valid_until),
            format!("{:.2}", self.confidence),
            self.accepted.to_string(),
            self.needs_review.to_string(),
            self.issues.join("; "),
        ]
    }
}

/// Build the external view of a result.
///
/// `accept_threshold` decides `accepted`; an undetermined document is never
/// accepted.
pub fn assemble(result: &ExtractionResult, accept_threshold: f32) -> StructuredDocument {
    let value = |name: FieldName| result.value(name).map(str::to_string);
    let accepted = result.is_accepted(accept_threshold);

    let field_confidence = result
        .fields
        .iter()
        .filter(|f| f.is_present())
        .map(|f| (f.name.as_str().to_string(), f.confidence))
        .collect();

    StructuredDocument {
        category: result.category,
        issuer: result.issuer.as_ref().map(|i| i.name.to_string()),
        issuer_code: result
            .issuer
            .as_ref()
            .and_then(|i| i.regulator_code)
            .map(str::to_string),
        method: result.method,
        holder_name: value(FieldName::HolderName),
        identity_number: value(FieldName::IdentityNumber),
        taxpayer_id: value(FieldName::TaxpayerId),
        birth_date: value(FieldName::BirthDate),
        card_number: value(FieldName::CardNumber),
        plan_name: value(FieldName::PlanName),
        health_system_number: value(FieldName::HealthSystemNumber),
        issue_date: value(FieldName::IssueDate),
        valid_until: value(FieldName::ValidUntil),
        confidence: result.confidence,
        accepted,
        needs_review: !accepted,
        field_confidence,
        issues: result.issues.iter().map(ToString::to_string).collect(),
    }
}
