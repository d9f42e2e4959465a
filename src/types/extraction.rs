//! Extraction result produced by a field-extraction backend
//!
//! An `ExtractionResult` is built once per document, either from the vision
//! model's answer or from a JSON file, and is read-only afterwards.

use crate::errors::{KycError, Result};
use crate::types::document::{compact_key, DocumentType};
use crate::types::fields::FieldName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields and confidences extracted from one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ExtractionResult {
    document_type: DocumentType,
    fields: BTreeMap<String, String>,
    confidence_scores: BTreeMap<String, f64>,
}

/// One extracted field as seen by validation rules
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry<'a> {
    /// Key exactly as the extractor returned it
    pub key: &'a str,
    pub name: FieldName,
    pub value: &'a str,
    pub confidence: Option<f64>,
}

impl ExtractionResult {
    /// Create a result, rejecting confidences outside [0, 1]
    pub fn new(
        document_type: DocumentType,
        fields: BTreeMap<String, String>,
        confidence_scores: BTreeMap<String, f64>,
    ) -> Result<Self> {
        for (key, score) in &confidence_scores {
            check_confidence(key, *score)?;
        }

        Ok(Self {
            document_type,
            fields,
            confidence_scores,
        })
    }

    /// Parse the `{document_type, fields, confidence_scores}` JSON shape.
    ///
    /// Null field values are treated as absent. `confidence_scores` may be
    /// omitted entirely.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| KycError::invalid_input("extraction result must be a JSON object"))?;

        let document_type = match object.get("document_type") {
            Some(Value::String(raw)) => DocumentType::parse(raw),
            Some(other) => {
                return Err(KycError::invalid_input(format!(
                    "document_type must be a string, got {}",
                    other
                )))
            }
            None => return Err(KycError::invalid_input("document_type is missing")),
        };

        let raw_fields = match object.get("fields") {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(KycError::invalid_input("fields must be a JSON object")),
            None => return Err(KycError::invalid_input("fields is missing")),
        };

        let mut fields = BTreeMap::new();
        for (key, raw) in raw_fields {
            let text = match raw {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Null => continue,
                other => {
                    return Err(KycError::invalid_input(format!(
                        "field '{}' has non-text value {}",
                        key, other
                    )))
                }
            };
            fields.insert(key.clone(), text);
        }

        let mut confidence_scores = BTreeMap::new();
        match object.get("confidence_scores") {
            Some(Value::Object(map)) => {
                for (key, raw) in map {
                    let score = raw.as_f64().ok_or_else(|| {
                        KycError::invalid_input(format!(
                            "confidence for '{}' is not a number: {}",
                            key, raw
                        ))
                    })?;
                    confidence_scores.insert(key.clone(), score);
                }
            }
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(KycError::invalid_input(
                    "confidence_scores must be a JSON object",
                ))
            }
        }

        Self::new(document_type, fields, confidence_scores)
    }

    /// Parse an extraction result from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| KycError::invalid_input(format!("not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn confidence_scores(&self) -> &BTreeMap<String, f64> {
        &self.confidence_scores
    }

    /// Extracted value for an exact key
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Confidence for an exact key
    pub fn confidence(&self, key: &str) -> Option<f64> {
        self.confidence_scores.get(key).copied()
    }

    /// Confidence for a field key, falling back to a score filed under
    /// another spelling of the same field (`date_of_birth` vs `Date of Birth`)
    pub fn confidence_for(&self, key: &str) -> Option<f64> {
        if let Some(score) = self.confidence(key) {
            return Some(score);
        }

        let name = FieldName::parse(key);
        let compact = compact_key(key);
        self.confidence_scores
            .iter()
            .find(|(other, _)| match &name {
                FieldName::Extra(_) => compact_key(other) == compact,
                recognized => &FieldName::parse(other) == recognized,
            })
            .map(|(_, score)| *score)
    }

    /// All extracted fields in key order
    pub fn entries(&self) -> impl Iterator<Item = FieldEntry<'_>> + '_ {
        self.fields.iter().map(move |(key, value)| FieldEntry {
            key,
            name: FieldName::parse(key),
            value,
            confidence: self.confidence_for(key),
        })
    }

    /// First field whose key resolves to `name`
    pub fn find(&self, name: &FieldName) -> Option<FieldEntry<'_>> {
        self.entries().find(|entry| &entry.name == name)
    }

    pub fn has_field(&self, name: &FieldName) -> bool {
        self.find(name).is_some()
    }

    /// Mean confidence over extracted fields (0.0 when nothing was extracted)
    pub fn mean_confidence(&self) -> f64 {
        if self.fields.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entries().map(|e| e.confidence.unwrap_or(0.0)).sum();
        total / self.fields.len() as f64
    }
}

impl TryFrom<Value> for ExtractionResult {
    type Error = KycError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

fn check_confidence(key: &str, score: f64) -> Result<()> {
    if score.is_nan() || !(0.0..=1.0).contains(&score) {
        return Err(KycError::invalid_input(format!(
            "confidence for '{}' must be within [0, 1], got {}",
            key, score
        )));
    }
    Ok(())
}
