//! WASM bindings for Brazilian insurance-card and RG extraction.
//!
//! Form-prefill callers in the browser or a mobile web view pass the OCR text
//! of one document and receive the flat `StructuredDocument` as a JS object.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use carteira_core::fields::{
    digits_of, format_date_iso, format_health_system_number, format_taxpayer_id,
    parse_local_date, validate_checksum_id, validate_health_system_number,
};
use carteira_core::{assemble, CarteiraConfig, DocumentCategory, DocumentPipeline};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_hint(hint: Option<String>) -> Result<Option<DocumentCategory>, JsValue> {
    match hint.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => DocumentCategory::from_hint(raw)
            .map(Some)
            .ok_or_else(|| JsValue::from_str(&format!("unknown category hint: {raw}"))),
    }
}

/// Extract a structured document from OCR text.
///
/// `hint` is an optional category (`"rg"` or `"card"`); detection still has
/// the final word.
#[wasm_bindgen]
pub fn extract_document(text: &str, hint: Option<String>) -> Result<JsValue, JsValue> {
    let hint = parse_hint(hint)?;
    let pipeline = DocumentPipeline::new();
    let threshold = pipeline.config().accept_threshold;

    let result = pipeline.process(text, hint);
    to_js(&assemble(&result, threshold))
}

/// Extract with a caller-supplied configuration, given as JSON.
#[wasm_bindgen]
pub fn extract_document_with_config(
    text: &str,
    hint: Option<String>,
    config_json: &str,
) -> Result<JsValue, JsValue> {
    let config: CarteiraConfig =
        serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let hint = parse_hint(hint)?;
    let threshold = config.extraction.accept_threshold;
    let pipeline = DocumentPipeline::with_config(config);

    let result = pipeline.process(text, hint);
    to_js(&assemble(&result, threshold))
}

/// Detect the document category and return the detection report.
#[wasm_bindgen]
pub fn detect_category(text: &str) -> Result<JsValue, JsValue> {
    let pipeline = DocumentPipeline::new();
    to_js(&pipeline.detector().detect_str(text))
}

/// Validate a CPF. Separators are ignored.
#[wasm_bindgen]
pub fn validate_cpf(cpf: &str) -> bool {
    validate_checksum_id(&digits_of(cpf))
}

/// Format a valid CPF as `XXX.XXX.XXX-XX`.
#[wasm_bindgen]
pub fn format_cpf(cpf: &str) -> Option<String> {
    let digits = digits_of(cpf);
    validate_checksum_id(&digits).then(|| format_taxpayer_id(&digits))
}

/// Validate a CNS (national health-system card number).
#[wasm_bindgen]
pub fn validate_cns(cns: &str) -> bool {
    validate_health_system_number(cns)
}

/// Format a valid CNS as `XXX XXXX XXXX XXXX`.
#[wasm_bindgen]
pub fn format_cns(cns: &str) -> Option<String> {
    validate_health_system_number(cns).then(|| format_health_system_number(cns))
}

/// Parse a `DD/MM/YYYY` or `DD/MMM/YYYY` date into ISO `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn parse_date(date_str: &str) -> Option<String> {
    parse_local_date(date_str).map(format_date_iso)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_cpf() {
        assert!(validate_cpf("529.982.247-25"));
        assert!(!validate_cpf("111.111.111-11"));
        assert_eq!(format_cpf("52998224725").as_deref(), Some("529.982.247-25"));
    }

    #[wasm_bindgen_test]
    fn test_validate_cns() {
        assert!(validate_cns("700000000000005"));
        assert!(!validate_cns("700000000000006"));
    }

    #[wasm_bindgen_test]
    fn test_parse_date() {
        assert_eq!(parse_date("05/MAR/2020").as_deref(), Some("2020-03-05"));
        assert_eq!(parse_date("31/02/2020"), None);
    }

    #[wasm_bindgen_test]
    fn test_parse_hint() {
        assert_eq!(parse_hint(None).ok(), Some(None));
        assert_eq!(
            parse_hint(Some("card".into())).ok(),
            Some(Some(DocumentCategory::InsuranceCard))
        );
        assert!(parse_hint(Some("passport".into())).is_err());
    }
}
