//! Field extraction from document images
//!
//! Loads images, asks a hosted vision model to check, classify and read them,
//! and turns the answers into `ExtractionResult`s.

pub mod client;
pub mod image;
pub mod prompts;
pub mod response;
pub mod types;

pub use client::VisionModelClient;
pub use image::{collect_images, DocumentImage, DEFAULT_MAX_IMAGE_BYTES};
pub use types::{FieldExtractor, ImageQualityCheck};
