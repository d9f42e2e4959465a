//! Extraction client type definitions

use crate::errors::Result;
use crate::extraction::image::DocumentImage;
use crate::types::{DocumentType, ExtractionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Image quality answers from the vision model, each "yes" or "no"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageQualityCheck {
    pub centered: String,
    pub clear: String,
    pub fully_visible: String,
}

impl ImageQualityCheck {
    /// All three checks answered "yes"
    pub fn passing() -> Self {
        Self {
            centered: "yes".to_string(),
            clear: "yes".to_string(),
            fully_visible: "yes".to_string(),
        }
    }

    /// All three checks answered "no"
    pub fn failing() -> Self {
        Self {
            centered: "no".to_string(),
            clear: "no".to_string(),
            fully_visible: "no".to_string(),
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.issues().is_empty()
    }

    /// Names of the checks not answered "yes"
    pub fn issues(&self) -> Vec<&'static str> {
        [
            ("centered", &self.centered),
            ("clear", &self.clear),
            ("fully_visible", &self.fully_visible),
        ]
        .into_iter()
        .filter(|(_, answer)| answer.as_str() != "yes")
        .map(|(name, _)| name)
        .collect()
    }
}

/// Backend that reads fields out of document images
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Ask whether the image is good enough to read
    async fn check_quality(&self, image: &DocumentImage) -> Result<ImageQualityCheck>;

    /// Decide what kind of document the image shows
    async fn classify(&self, image: &DocumentImage) -> Result<DocumentType>;

    /// Extract fields and confidences for a document of the given type
    async fn extract(
        &self,
        image: &DocumentImage,
        doc_type: DocumentType,
    ) -> Result<ExtractionResult>;
}
