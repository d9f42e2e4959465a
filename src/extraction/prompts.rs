//! Prompts sent to the vision model

use crate::types::{DocumentType, FieldName};
use crate::validation::config::default_required_fields;

pub const SYSTEM_PROMPT: &str = "You are a KYC document analysis assistant. \
Read identity and proof-of-address documents from images and answer with structured JSON only.";

pub const QUALITY_PROMPT: &str = r#"Analyze this image and check document positioning and quality.
Respond in JSON format with exactly these keys, each "yes" or "no":
{"centered": "yes|no", "clear": "yes|no", "fully_visible": "yes|no"}"#;

pub const CLASSIFY_PROMPT: &str = "What kind of document is in this image? \
Respond with only one of: passport, license, national_id, utility_bill, bank_statement, other.";

/// Fields the extraction prompt asks for, per document type
pub fn expected_fields(doc_type: DocumentType) -> Vec<FieldName> {
    let mut fields = default_required_fields(doc_type);
    match doc_type {
        DocumentType::Passport | DocumentType::NationalId => fields.push(FieldName::Nationality),
        DocumentType::DriverLicense => fields.push(FieldName::State),
        DocumentType::Other => {
            fields = vec![
                FieldName::FullName,
                FieldName::DateOfBirth,
                FieldName::DocumentNumber,
                FieldName::ExpiryDate,
            ]
        }
        DocumentType::UtilityBill | DocumentType::BankStatement => {}
    }
    fields
}

/// Extraction prompt for a document type
pub fn extraction_prompt(doc_type: DocumentType) -> String {
    let field_list = expected_fields(doc_type)
        .iter()
        .map(|f| format!("  - {}", f.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"This image is a {description}. Extract the following fields:
{field_list}

Write dates as DD-Mon-YYYY, for example 15-Mar-1996.
For every field also give your confidence between 0.0 and 1.0.
Leave out any field you cannot read.

Respond with JSON only, in this exact shape:
{{
  "fields": {{"<field name>": "<value>"}},
  "confidence_scores": {{"<field name>": 0.0}}
}}"#,
        description = doc_type.description(),
    )
}
