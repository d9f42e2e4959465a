//! Type definitions module
//!
//! Document types, field names and extraction results shared by the
//! extraction client and the validation engine.

pub mod document;
pub mod extraction;
pub mod fields;

// Re-export commonly used types
pub use document::DocumentType;
pub use extraction::{ExtractionResult, FieldEntry};
pub use fields::{DateKind, FieldName};
