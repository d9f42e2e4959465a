//! Vision model client for field extraction
//!
//! Talks to any OpenAI-compatible chat-completions endpoint (Fireworks by
//! default) with multimodal messages: a text prompt plus the document image
//! as a base64 `data:` URL.

use crate::config::ExtractionConfig;
use crate::errors::{KycError, Result};
use crate::extraction::image::DocumentImage;
use crate::extraction::prompts::{extraction_prompt, CLASSIFY_PROMPT, QUALITY_PROMPT, SYSTEM_PROMPT};
use crate::extraction::response::{parse_document_type, parse_extraction, parse_quality_check};
use crate::extraction::types::{FieldExtractor, ImageQualityCheck};
use crate::types::{DocumentType, ExtractionResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.fireworks.ai/inference/v1";

/// Default vision model
pub const DEFAULT_MODEL: &str = "accounts/fireworks/models/phi-3-vision-128k-instruct";

/// Maximum tokens requested for any answer
const MAX_TOKENS: usize = 1024;

/// Chat-completions client for a hosted vision model
#[derive(Debug, Clone)]
pub struct VisionModelClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Chat API request
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Response format request
#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat message (text or multimodal)
#[derive(Debug, Clone, Serialize)]
struct Message {
    role: String,
    #[serde(flatten)]
    content: MessageContent,
}

/// Content of a message (either text or multimodal)
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text { content: String },
    Multimodal { content: Vec<ContentPart> },
}

/// Content part for multimodal messages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
}

/// Chat API response
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl VisionModelClient {
    /// Create client with explicit settings
    pub fn with_config(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KycError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create client from configuration, reading the API key from the
    /// environment variable named in `api_key_env`
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            KycError::ConfigError(format!(
                "{} environment variable not set",
                config.api_key_env
            ))
        })?;

        Self::with_config(
            &config.base_url,
            &config.model,
            &api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, prompt: &str, image: &DocumentImage, json_mode: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: MessageContent::Text {
                        content: SYSTEM_PROMPT.to_string(),
                    },
                },
                Message {
                    role: "user".to_string(),
                    content: MessageContent::Multimodal {
                        content: vec![
                            ContentPart::Text {
                                text: prompt.to_string(),
                            },
                            ContentPart::ImageUrl {
                                image_url: ImageUrl {
                                    url: image.data_url(),
                                },
                            },
                        ],
                    },
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            response_format: json_mode.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    /// Send one prompt with the image and return the model's text answer
    pub async fn ask(&self, prompt: &str, image: &DocumentImage, json_mode: bool) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(prompt, image, json_mode);

        tracing::debug!(model = %self.model, image = %image.path().display(), json_mode, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KycError::ExtractionApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| KycError::ExtractionApi(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(%status, "chat completion failed");
            return Err(KycError::ExtractionApi(format!("HTTP {}: {}", status, body)));
        }

        let chat: ChatResponse = serde_json::from_str(&body)?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| KycError::ExtractionApi("No content in model response".to_string()))
    }
}

#[async_trait]
impl FieldExtractor for VisionModelClient {
    async fn check_quality(&self, image: &DocumentImage) -> Result<ImageQualityCheck> {
        let answer = match self.ask(QUALITY_PROMPT, image, true).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "image quality check failed; treating image as unusable");
                return Ok(ImageQualityCheck::failing());
            }
        };

        Ok(parse_quality_check(&answer).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable quality answer");
            ImageQualityCheck::failing()
        }))
    }

    async fn classify(&self, image: &DocumentImage) -> Result<DocumentType> {
        let answer = self.ask(CLASSIFY_PROMPT, image, false).await?;
        let doc_type = parse_document_type(&answer);
        tracing::debug!(answer = %answer.trim(), %doc_type, "classified document");
        Ok(doc_type)
    }

    async fn extract(&self, image: &DocumentImage, doc_type: DocumentType) -> Result<ExtractionResult> {
        let answer = self.ask(&extraction_prompt(doc_type), image, true).await?;
        parse_extraction(&answer, doc_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn client() -> VisionModelClient {
        VisionModelClient::with_config(
            "https://example.invalid/v1/",
            DEFAULT_MODEL,
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_client_with_config() {
        let client = client();
        assert_eq!(client.base_url(), "https://example.invalid/v1");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = ExtractionConfig {
            api_key_env: "KYCCHECK_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..ExtractionConfig::default()
        };
        let err = VisionModelClient::from_config(&config).unwrap_err();
        assert!(matches!(err, KycError::ConfigError(_)));
    }

    #[test]
    fn test_request_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.png");
        fs::write(&path, b"abc").unwrap();
        let image = DocumentImage::load(&path, 1024).unwrap();

        let request = client().build_request("Extract", &image, true);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"][0]["type"], "text");
        assert_eq!(json["messages"][1]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/png;base64,YWJj"
        );

        let plain = serde_json::to_value(client().build_request("Classify", &image, false)).unwrap();
        assert!(plain.get("response_format").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires FIREWORKS_API_KEY and network access
    async fn test_classify_integration() {
        let client = VisionModelClient::from_config(&ExtractionConfig::default()).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.png");
        fs::write(&path, b"not really a png").unwrap();
        let image = DocumentImage::load(&path, 1024).unwrap();
        assert!(client.classify(&image).await.is_ok());
    }
}
