//! Parsing of vision model answers
//!
//! Models wrap JSON in prose or markdown fences often enough that answers
//! are scanned for the first balanced JSON object before parsing.

use crate::errors::{KycError, Result};
use crate::extraction::types::ImageQualityCheck;
use crate::types::{DocumentType, ExtractionResult};
use serde_json::{json, Map, Value};

/// First balanced `{...}` object in `text`, ignoring braces inside strings
pub fn first_json_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' if start.is_some() => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Some(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    None
}

fn answer_object(answer: &str) -> Result<Map<String, Value>> {
    let raw = first_json_object(answer).ok_or_else(|| {
        KycError::ExtractionApi(format!("model answer contained no JSON object: {}", answer))
    })?;

    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(KycError::ExtractionApi("model answer is not a JSON object".to_string())),
    }
}

/// Parse an extraction answer into an `ExtractionResult`.
///
/// Accepts `{"fields": {...}, "confidence_scores": {...}}` or a flat object
/// of field values. A flat object carries no confidences, so every field in
/// it fails the confidence check downstream.
pub fn parse_extraction(answer: &str, doc_type: DocumentType) -> Result<ExtractionResult> {
    let mut object = answer_object(answer)?;

    let (fields, confidence_scores) = match object.remove("fields") {
        Some(fields @ Value::Object(_)) => {
            let scores = object.remove("confidence_scores").unwrap_or(Value::Null);
            (fields, scores)
        }
        _ => {
            object.remove("document_type");
            let scores = object.remove("confidence_scores").unwrap_or(Value::Null);
            (Value::Object(object), scores)
        }
    };

    ExtractionResult::from_value(&json!({
        "document_type": doc_type.as_str(),
        "fields": fields,
        "confidence_scores": confidence_scores,
    }))
}

/// Parse an image quality answer; missing checks count as "no"
pub fn parse_quality_check(answer: &str) -> Result<ImageQualityCheck> {
    let object = answer_object(answer)?;

    let read = |key: &str| -> String {
        match object.get(key) {
            Some(Value::String(s)) => s.trim().to_lowercase(),
            Some(Value::Bool(true)) => "yes".to_string(),
            _ => "no".to_string(),
        }
    };

    Ok(ImageQualityCheck {
        centered: read("centered"),
        clear: read("clear"),
        fully_visible: read("fully_visible"),
    })
}

/// Parse a one-word classification answer
pub fn parse_document_type(answer: &str) -> DocumentType {
    let cleaned = answer
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
        .trim();

    match DocumentType::parse(cleaned) {
        DocumentType::Other => {
            let lower = cleaned.to_lowercase();
            if lower.contains("passport") {
                DocumentType::Passport
            } else if lower.contains("license") || lower.contains("licence") {
                DocumentType::DriverLicense
            } else {
                DocumentType::Other
            }
        }
        doc_type => doc_type,
    }
}
