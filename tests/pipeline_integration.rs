//! Pipeline integration tests
//!
//! A scripted extractor replays canned model answers through the same
//! response parsers the HTTP client uses, so everything except the
//! network round trip is exercised.

use async_trait::async_trait;
use chrono::NaiveDate;
use kyccheck::extraction::response::{parse_document_type, parse_extraction, parse_quality_check};
use kyccheck::extraction::{collect_images, DocumentImage, FieldExtractor, ImageQualityCheck};
use kyccheck::pipeline::{KycPipeline, ProcessingOutcome};
use kyccheck::telemetry::TelemetryCollector;
use kyccheck::{DocumentType, ExtractionResult, KycError, Result, ValidationEngine};
use std::path::Path;
use tempfile::TempDir;

const GOOD_QUALITY: &str = r#"{"centered": "yes", "clear": "Yes", "fully_visible": "yes"}"#;

const PASSPORT_ANSWER: &str = r#"Here is the data you asked for:
```json
{
  "fields": {
    "Full Name": "John Doe",
    "Date of Birth": "15-Mar-1996",
    "Document Number": "963545637",
    "Expiry Date": "14-Apr-2027"
  },
  "confidence_scores": {
    "Full Name": 0.98,
    "Date of Birth": 0.95,
    "Document Number": 0.97,
    "Expiry Date": 0.99
  }
}
```"#;

/// Replays fixed model answers
struct ScriptedModel {
    quality: &'static str,
    classification: &'static str,
    extraction: &'static str,
}

#[async_trait]
impl FieldExtractor for ScriptedModel {
    async fn check_quality(&self, _image: &DocumentImage) -> Result<ImageQualityCheck> {
        Ok(parse_quality_check(self.quality).unwrap_or_else(|_| ImageQualityCheck::failing()))
    }

    async fn classify(&self, _image: &DocumentImage) -> Result<DocumentType> {
        Ok(parse_document_type(self.classification))
    }

    async fn extract(
        &self,
        _image: &DocumentImage,
        doc_type: DocumentType,
    ) -> Result<ExtractionResult> {
        parse_extraction(self.extraction, doc_type)
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn write_image(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]).unwrap();
    path
}

fn pipeline(model: ScriptedModel) -> KycPipeline<ScriptedModel> {
    KycPipeline::new(model, ValidationEngine::new(), 1024)
        .with_telemetry(TelemetryCollector::new())
}

#[tokio::test]
async fn test_passport_image_passes() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, "passport.png");

    let pipeline = pipeline(ScriptedModel {
        quality: GOOD_QUALITY,
        classification: "Passport.",
        extraction: PASSPORT_ANSWER,
    });
    let outcome = pipeline.process(&image, today()).await;

    assert!(outcome.is_passed(), "unexpected outcome: {:?}", outcome);
    let report = outcome.report().unwrap();
    assert_eq!(report.document_type(), DocumentType::Passport);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["report"]["validation_result"], "Passed");
    assert_eq!(json["quality_check"]["clear"], "yes");
    assert!(json["processing_time_seconds"].as_f64().unwrap() >= 0.0);

    let stats = pipeline.telemetry().get_stats();
    assert_eq!(stats.documents_passed, 1);
    assert_eq!(stats.api_calls, 3);
}

#[tokio::test]
async fn test_low_confidence_answer_fails_validation() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, "license.jpg");

    let pipeline = pipeline(ScriptedModel {
        quality: GOOD_QUALITY,
        classification: "This looks like a driver's license",
        extraction: r#"{"Full Name": "Jane Roe", "Date of Birth": "04-Jul-1980",
            "Document Number": "D1234567", "Expiry Date": "04-Jul-2026"}"#,
    });
    let outcome = pipeline.process(&image, today()).await;

    // Flat answer carries no confidences, so every field scores zero
    let report = outcome.report().unwrap();
    assert_eq!(report.document_type(), DocumentType::DriverLicense);
    assert!(!report.is_passed());
    assert_eq!(report.failure_reasons().len(), 4);
    assert!(report
        .failure_reasons()
        .iter()
        .all(|r| r.starts_with("LowConfidenceError")));
}

#[tokio::test]
async fn test_blurry_image_rejected_before_extraction() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, "blurry.png");

    let pipeline = pipeline(ScriptedModel {
        quality: r#"{"centered": "yes", "clear": "no", "fully_visible": "no"}"#,
        classification: "passport",
        extraction: "not reached",
    });
    let outcome = pipeline.process(&image, today()).await;

    match &outcome {
        ProcessingOutcome::QualityRejected { quality_issues, .. } => {
            assert_eq!(quality_issues.len(), 2);
        }
        other => panic!("expected quality rejection, got {:?}", other),
    }
    assert!(!outcome.is_passed());
    assert_eq!(pipeline.telemetry().get_stats().api_calls, 1);
}

#[tokio::test]
async fn test_unreadable_answer_becomes_error_outcome() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir, "passport.png");

    let pipeline = pipeline(ScriptedModel {
        quality: GOOD_QUALITY,
        classification: "passport",
        extraction: "I cannot read this document.",
    });
    let outcome = pipeline.process(&image, today()).await;

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["error_message"].as_str().unwrap().len() > 0);
    assert_eq!(pipeline.telemetry().get_stats().documents_errored, 1);
}

#[tokio::test]
async fn test_oversized_and_unsupported_files_error() {
    let dir = TempDir::new().unwrap();
    let big = dir.path().join("big.png");
    std::fs::write(&big, vec![0u8; 4096]).unwrap();
    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "hello").unwrap();

    let pipeline = pipeline(ScriptedModel {
        quality: GOOD_QUALITY,
        classification: "passport",
        extraction: PASSPORT_ANSWER,
    });

    for path in [&big, &text] {
        let outcome = pipeline.process(path, today()).await;
        assert!(matches!(outcome, ProcessingOutcome::Error { .. }));
    }
    assert_eq!(pipeline.telemetry().get_stats().api_calls, 0);
}

#[tokio::test]
async fn test_batch_over_folder() {
    let dir = TempDir::new().unwrap();
    write_image(&dir, "b.png");
    write_image(&dir, "a.jpeg");
    std::fs::write(dir.path().join("readme.md"), "skip me").unwrap();

    let images = collect_images(dir.path()).unwrap();
    let names: Vec<_> = images
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.jpeg", "b.png"]);

    let pipeline = pipeline(ScriptedModel {
        quality: GOOD_QUALITY,
        classification: "passport",
        extraction: PASSPORT_ANSWER,
    });
    for image in &images {
        assert!(pipeline.process(image, today()).await.is_passed());
    }

    let telemetry = pipeline.telemetry();
    assert_eq!(telemetry.get_stats().documents_started, 2);
    assert_eq!(telemetry.pass_rate(), 1.0);
}

#[test]
fn test_missing_folder_is_io_error() {
    let result = collect_images(Path::new("/definitely/not/here"));
    assert!(matches!(result, Err(KycError::IoError(_))));
}
