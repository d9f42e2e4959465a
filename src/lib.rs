//! kyccheck - KYC document validation
//!
//! Reads identity documents with a hosted vision-language model and checks
//! the extracted fields before anyone relies on them.
//!
//! # Architecture
//!
//! - **types**: document types, field names, extraction results
//! - **validation**: the engine turning an extraction into a pass/fail report
//! - **extraction**: image loading and the vision model client
//! - **pipeline**: quality check → classify → extract → validate

pub mod errors;
pub mod types;
pub mod validation;
pub mod extraction;
pub mod pipeline;

// Re-export commonly used types
pub use errors::{KycError, Result};
pub use types::{DocumentType, ExtractionResult, FieldName};
pub use validation::{ValidationConfig, ValidationEngine, ValidationReport, Verdict};

// Configuration, CLI and run telemetry
pub mod cli;
pub mod config;
pub mod telemetry;
