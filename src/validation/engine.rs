//! Validation engine
//!
//! Runs every rule against an extraction result and folds the failures into
//! a `ValidationReport`. No rule short-circuits the others, so a failed
//! report lists everything that is wrong with the document.

use crate::errors::Result;
use crate::types::ExtractionResult;
use crate::validation::config::ValidationConfig;
use crate::validation::rules::{default_rules, ValidationContext, ValidationRule};
use crate::validation::types::{RuleOutcome, ValidationReport};
use chrono::NaiveDate;
use std::fmt;

/// Stateless document validator
pub struct ValidationEngine {
    config: ValidationConfig,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create new engine with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create engine with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Append a rule; it runs after the built-in ones
    pub fn with_rule(mut self, rule: Box<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Run every rule, keeping per-rule outcomes
    pub fn evaluate(&self, result: &ExtractionResult, today: NaiveDate) -> Vec<RuleOutcome> {
        let ctx = ValidationContext {
            config: &self.config,
            today,
        };

        self.rules
            .iter()
            .map(|rule| {
                let failures = rule.evaluate(result, &ctx);
                for failure in &failures {
                    tracing::debug!(rule = rule.name(), %failure, "validation rule failed");
                }
                RuleOutcome::new(rule.name(), failures)
            })
            .collect()
    }

    /// Validate an extraction result against `today`
    pub fn validate(&self, result: &ExtractionResult, today: NaiveDate) -> ValidationReport {
        let failures = self
            .evaluate(result, today)
            .into_iter()
            .flat_map(|outcome| outcome.failures)
            .collect::<Vec<_>>();

        let report = ValidationReport::new(
            result.document_type(),
            result.fields().clone(),
            result.confidence_scores().clone(),
            failures,
        );

        tracing::info!(
            document_type = %report.document_type(),
            verdict = %report.verdict(),
            failures = report.failures().len(),
            "document validated"
        );

        report
    }

    /// Get engine configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Names of the rules in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Update confidence threshold, rejecting values outside [0, 1]
    pub fn set_min_confidence(&mut self, min_confidence: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.min_confidence = min_confidence;
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .field("rules", &self.rule_names())
            .finish()
    }
}
