//! Document processing pipeline
//!
//! Runs one image through quality check, classification, extraction and
//! validation. Any error along the way becomes an `Error` outcome so a
//! batch keeps going.

use crate::errors::Result;
use crate::extraction::{DocumentImage, FieldExtractor, ImageQualityCheck};
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::validation::{ValidationEngine, ValidationReport};
use chrono::NaiveDate;
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use std::time::Instant;

/// Result of processing one document image
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    /// Extraction and validation ran; the report carries the verdict
    Success {
        source: String,
        report: ValidationReport,
        quality_check: ImageQualityCheck,
        /// Mean confidence over the extracted fields
        confidence_score: f64,
        processing_time_seconds: f64,
    },

    /// The image failed the quality check and was not read
    QualityRejected {
        source: String,
        quality_issues: Vec<String>,
        quality_check: ImageQualityCheck,
        processing_time_seconds: f64,
    },

    /// Loading, the API or the model's answer failed
    Error {
        source: String,
        error_message: String,
        processing_time_seconds: f64,
    },
}

impl ProcessingOutcome {
    /// Document was read and its report passed
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Success { report, .. } if report.is_passed())
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Success { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn confidence_score(&self) -> Option<f64> {
        match self {
            Self::Success { confidence_score, .. } => Some(*confidence_score),
            _ => None,
        }
    }

    pub fn processing_time_seconds(&self) -> f64 {
        match self {
            Self::Success { processing_time_seconds, .. }
            | Self::QualityRejected { processing_time_seconds, .. }
            | Self::Error { processing_time_seconds, .. } => *processing_time_seconds,
        }
    }
}

/// Extraction + validation pipeline
pub struct KycPipeline<E: FieldExtractor> {
    extractor: E,
    engine: ValidationEngine,
    max_image_bytes: u64,
    telemetry: TelemetryCollector,
}

impl<E: FieldExtractor> KycPipeline<E> {
    pub fn new(extractor: E, engine: ValidationEngine, max_image_bytes: u64) -> Self {
        Self {
            extractor,
            engine,
            max_image_bytes,
            telemetry: TelemetryCollector::new(),
        }
    }

    /// Record events into a shared collector
    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }

    /// Process one image, validating dates against `today`
    pub async fn process(&self, path: &Path, today: NaiveDate) -> ProcessingOutcome {
        let start = Instant::now();
        let source = path.display().to_string();

        self.telemetry.record(TelemetryEvent::DocumentStarted {
            path: source.clone(),
            timestamp: Instant::now(),
        });

        match self.run(path, today).await {
            Ok(Stage::Validated {
                report,
                quality_check,
                confidence_score,
            }) => {
                self.telemetry.record(TelemetryEvent::DocumentValidated {
                    path: source.clone(),
                    passed: report.is_passed(),
                    timestamp: Instant::now(),
                });
                ProcessingOutcome::Success {
                    source,
                    report,
                    quality_check,
                    confidence_score,
                    processing_time_seconds: elapsed_seconds(start),
                }
            }
            Ok(Stage::Rejected { quality_check }) => {
                tracing::info!(path = %source, issues = ?quality_check.issues(), "image quality check failed");
                ProcessingOutcome::QualityRejected {
                    source,
                    quality_issues: quality_check.issues().iter().map(|s| s.to_string()).collect(),
                    quality_check,
                    processing_time_seconds: elapsed_seconds(start),
                }
            }
            Err(e) => {
                tracing::warn!(path = %source, error = %e, "document processing failed");
                self.telemetry.record(TelemetryEvent::DocumentErrored {
                    path: source.clone(),
                    error: e.to_string(),
                    timestamp: Instant::now(),
                });
                ProcessingOutcome::Error {
                    source,
                    error_message: e.to_string(),
                    processing_time_seconds: elapsed_seconds(start),
                }
            }
        }
    }

    async fn run(&self, path: &Path, today: NaiveDate) -> Result<Stage> {
        let image = DocumentImage::load(path, self.max_image_bytes)?;

        let quality_check = self
            .timed("check_quality", self.extractor.check_quality(&image))
            .await?;
        if !quality_check.is_acceptable() {
            return Ok(Stage::Rejected { quality_check });
        }

        let doc_type = self.timed("classify", self.extractor.classify(&image)).await?;
        let extraction = self
            .timed("extract", self.extractor.extract(&image, doc_type))
            .await?;

        let report = self.engine.validate(&extraction, today);
        Ok(Stage::Validated {
            report,
            quality_check,
            confidence_score: extraction.mean_confidence(),
        })
    }

    async fn timed<T>(&self, operation: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        let start = Instant::now();
        let result = call.await;
        self.telemetry.record(TelemetryEvent::ApiCall {
            operation: operation.to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            success: result.is_ok(),
            timestamp: Instant::now(),
        });
        result
    }
}

enum Stage {
    Validated {
        report: ValidationReport,
        quality_check: ImageQualityCheck,
        confidence_score: f64,
    },
    Rejected {
        quality_check: ImageQualityCheck,
    },
}

/// Elapsed seconds rounded to two decimals
fn elapsed_seconds(start: Instant) -> f64 {
    (start.elapsed().as_secs_f64() * 100.0).round() / 100.0
}
