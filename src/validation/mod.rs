//! Document validation and confidence scoring
//! Turns an `ExtractionResult` into a pass/fail `ValidationReport`

pub mod config;
pub mod dates;
pub mod engine;
pub mod rules;
pub mod types;

pub use config::ValidationConfig;
pub use engine::ValidationEngine;
pub use rules::{ConfidenceRule, DateSanityRule, RequiredFieldsRule, ValidationContext, ValidationRule};
pub use types::{FailureKind, RuleOutcome, ValidationFailure, ValidationReport, Verdict};
