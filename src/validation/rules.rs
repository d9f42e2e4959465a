//! Validation rules
//!
//! Each rule is a pure function of the extraction result and the context
//! (configuration plus the injected current date). A rule reports every
//! failure it finds rather than stopping at the first.

use crate::types::{DateKind, ExtractionResult};
use crate::validation::config::ValidationConfig;
use crate::validation::dates::{age_in_years, parse_date};
use crate::validation::types::{FailureKind, ValidationFailure};
use chrono::NaiveDate;

/// Inputs shared by all rules for one evaluation
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub config: &'a ValidationConfig,
    /// Date that "expired" and "in the future" are measured against
    pub today: NaiveDate,
}

/// A named check over an extraction result
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &str;

    /// Failures found, empty when the rule passes
    fn evaluate(&self, result: &ExtractionResult, ctx: &ValidationContext<'_>)
        -> Vec<ValidationFailure>;
}

/// Every required field for the document type must be present
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsRule;

impl ValidationRule for RequiredFieldsRule {
    fn name(&self) -> &str {
        "required_fields"
    }

    fn evaluate(
        &self,
        result: &ExtractionResult,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationFailure> {
        ctx.config
            .required_for(result.document_type())
            .into_iter()
            .filter(|field| !result.has_field(field))
            .map(|field| ValidationFailure::new(FailureKind::MissingField, field.label()))
            .collect()
    }
}

/// Every extracted field must meet the confidence threshold.
///
/// A field with no confidence score counts as confidence 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceRule;

impl ValidationRule for ConfidenceRule {
    fn name(&self) -> &str {
        "confidence"
    }

    fn evaluate(
        &self,
        result: &ExtractionResult,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationFailure> {
        result
            .entries()
            .filter(|entry| entry.confidence.unwrap_or(0.0) < ctx.config.min_confidence)
            .map(|entry| ValidationFailure::new(FailureKind::LowConfidence, entry.key))
            .collect()
    }
}

/// Dates must parse, expiry dates must not have passed, birth and issue
/// dates must not lie in the future, and age must be within bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct DateSanityRule;

impl ValidationRule for DateSanityRule {
    fn name(&self) -> &str {
        "date_sanity"
    }

    fn evaluate(
        &self,
        result: &ExtractionResult,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for entry in result.entries() {
            let kind = entry.name.date_kind();
            if kind == DateKind::NotADate {
                continue;
            }

            let Some(date) = parse_date(entry.value, &ctx.config.date_formats) else {
                failures.push(ValidationFailure::new(FailureKind::UnparsableDate, entry.key));
                continue;
            };

            match kind {
                DateKind::Expiry => {
                    if date < ctx.today {
                        failures.push(ValidationFailure::new(FailureKind::FutureDate, entry.key));
                    }
                }
                DateKind::Birth => {
                    if date > ctx.today {
                        failures.push(ValidationFailure::new(FailureKind::FutureDate, entry.key));
                        continue;
                    }
                    let age = i64::from(age_in_years(date, ctx.today));
                    if age < i64::from(ctx.config.min_age_years)
                        || age > i64::from(ctx.config.max_age_years)
                    {
                        failures
                            .push(ValidationFailure::new(FailureKind::AgeOutOfRange, entry.key));
                    }
                }
                DateKind::Past => {
                    if date > ctx.today {
                        failures.push(ValidationFailure::new(FailureKind::FutureDate, entry.key));
                    }
                }
                DateKind::NotADate => {}
            }
        }

        failures
    }
}

/// Rules run by a default engine, in reporting order
pub fn default_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(RequiredFieldsRule),
        Box::new(ConfidenceRule),
        Box::new(DateSanityRule),
    ]
}
