//! Validation engine configuration

use crate::errors::{KycError, Result};
use crate::types::{DocumentType, FieldName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default minimum confidence for any extracted field
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.85;

/// Default lower age bound in whole years
pub const DEFAULT_MIN_AGE_YEARS: u32 = 18;

/// Default upper age bound in whole years
pub const DEFAULT_MAX_AGE_YEARS: u32 = 100;

/// Largest `max_age_years` a configuration may set
pub const AGE_LIMIT_YEARS: u32 = 150;

/// Thresholds and per-document rules for the validation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Confidences strictly below this fail; equal passes
    pub min_confidence: f64,

    pub min_age_years: u32,

    pub max_age_years: u32,

    /// chrono format strings tried in order when parsing dates
    pub date_formats: Vec<String>,

    /// Required field labels keyed by document type config key.
    /// Types missing from the table fall back to the built-in defaults.
    pub required_fields: BTreeMap<String, Vec<String>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_age_years: DEFAULT_MIN_AGE_YEARS,
            max_age_years: DEFAULT_MAX_AGE_YEARS,
            date_formats: vec!["%d-%b-%Y".to_string(), "%Y-%m-%d".to_string()],
            required_fields: DocumentType::ALL
                .iter()
                .map(|doc_type| {
                    let labels = default_required_fields(*doc_type)
                        .iter()
                        .map(|f| f.label().to_string())
                        .collect();
                    (doc_type.config_key().to_string(), labels)
                })
                .collect(),
        }
    }
}

impl ValidationConfig {
    /// Required fields for a document type
    pub fn required_for(&self, doc_type: DocumentType) -> Vec<FieldName> {
        let configured = self
            .required_fields
            .iter()
            .find(|(key, _)| DocumentType::parse(key) == doc_type);

        match configured {
            Some((_, labels)) => labels.iter().map(|l| FieldName::parse(l)).collect(),
            None => default_required_fields(doc_type),
        }
    }

    /// Replace the required fields for one document type
    pub fn set_required_fields(&mut self, doc_type: DocumentType, fields: &[FieldName]) {
        self.required_fields.retain(|key, _| DocumentType::parse(key) != doc_type);
        self.required_fields.insert(
            doc_type.config_key().to_string(),
            fields.iter().map(|f| f.label().to_string()).collect(),
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.min_confidence.is_nan() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(KycError::ConfigError(format!(
                "min_confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            )));
        }

        if self.max_age_years > AGE_LIMIT_YEARS {
            return Err(KycError::ConfigError(format!(
                "max_age_years must be at most {}, got {}",
                AGE_LIMIT_YEARS, self.max_age_years
            )));
        }

        if self.min_age_years > self.max_age_years {
            return Err(KycError::ConfigError(format!(
                "min_age_years ({}) must not exceed max_age_years ({})",
                self.min_age_years, self.max_age_years
            )));
        }

        if self.date_formats.is_empty() {
            return Err(KycError::ConfigError(
                "date_formats must list at least one format".to_string(),
            ));
        }

        Ok(())
    }
}

/// Built-in required fields per document type
pub fn default_required_fields(doc_type: DocumentType) -> Vec<FieldName> {
    use FieldName::*;

    match doc_type {
        DocumentType::Passport | DocumentType::DriverLicense => {
            vec![FullName, DateOfBirth, DocumentNumber, ExpiryDate]
        }
        DocumentType::NationalId => vec![FullName, DateOfBirth, DocumentNumber],
        DocumentType::UtilityBill => vec![ServiceProvider, FullName, Address, BillDate, Amount],
        DocumentType::BankStatement => {
            vec![BankName, AccountHolder, AccountNumber, StatementPeriod, Balance]
        }
        DocumentType::Other => Vec::new(),
    }
}
