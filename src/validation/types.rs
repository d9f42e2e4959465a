//! Validation system type definitions

use crate::types::DocumentType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Overall outcome of validating one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("Passed"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// Reported validation failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A required field is absent
    MissingField,

    /// A field's confidence is below the threshold
    LowConfidence,

    /// A date field matches none of the accepted formats
    UnparsableDate,

    /// An expiry date has passed, or a birth/issue date lies in the future
    FutureDate,

    /// Age from the birth date is outside the configured bounds
    AgeOutOfRange,
}

impl FailureKind {
    /// Name used in failure reasons
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "MissingFieldError",
            Self::LowConfidence => "LowConfidenceError",
            Self::UnparsableDate => "UnparsableDateError",
            Self::FutureDate => "FutureDateError",
            Self::AgeOutOfRange => "AgeOutOfRangeError",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingField => "Required field is missing",
            Self::LowConfidence => "Extraction confidence is below the threshold",
            Self::UnparsableDate => "Date is not in an accepted format",
            Self::FutureDate => "Date is expired or lies in the future",
            Self::AgeOutOfRange => "Age is outside the accepted range",
        }
    }
}

impl FromStr for FailureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MissingFieldError" => Ok(Self::MissingField),
            "LowConfidenceError" => Ok(Self::LowConfidence),
            "UnparsableDateError" => Ok(Self::UnparsableDate),
            "FutureDateError" => Ok(Self::FutureDate),
            "AgeOutOfRangeError" => Ok(Self::AgeOutOfRange),
            other => Err(format!("unknown failure kind: {}", other)),
        }
    }
}

/// A single reported failure, rendered as `"<Kind>: <field>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationFailure {
    pub kind: FailureKind,
    pub field: String,
}

impl ValidationFailure {
    pub fn new(kind: FailureKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.field)
    }
}

impl FromStr for ValidationFailure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, field) = s
            .split_once(": ")
            .ok_or_else(|| format!("malformed failure reason: {}", s))?;
        Ok(Self::new(kind.parse()?, field))
    }
}

impl Serialize for ValidationFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValidationFailure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Result of running one rule
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// Rule name
    pub name: String,

    /// Failures reported by the rule, empty when it passed
    pub failures: Vec<ValidationFailure>,
}

impl RuleOutcome {
    pub fn new(name: impl Into<String>, failures: Vec<ValidationFailure>) -> Self {
        Self {
            name: name.into(),
            failures,
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Complete validation result for one document.
///
/// Serializes to `document_type`, `fields`, `confidence_scores`,
/// `validation_result` and, only when failed, `failure_reasons`. A report
/// read back from JSON must carry the verdict its failure reasons imply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReportRecord")]
pub struct ValidationReport {
    document_type: DocumentType,
    fields: BTreeMap<String, String>,
    confidence_scores: BTreeMap<String, f64>,
    validation_result: Verdict,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    failure_reasons: Vec<ValidationFailure>,
}

/// Serialized report as read, before the verdict is checked
#[derive(Deserialize)]
struct ReportRecord {
    document_type: DocumentType,
    fields: BTreeMap<String, String>,
    confidence_scores: BTreeMap<String, f64>,
    validation_result: Verdict,
    #[serde(default)]
    failure_reasons: Vec<ValidationFailure>,
}

impl TryFrom<ReportRecord> for ValidationReport {
    type Error = String;

    fn try_from(record: ReportRecord) -> Result<Self, Self::Error> {
        let report = Self::new(
            record.document_type,
            record.fields,
            record.confidence_scores,
            record.failure_reasons,
        );

        if report.validation_result != record.validation_result {
            return Err(format!(
                "validation_result {:?} contradicts {} failure reason(s)",
                record.validation_result,
                report.failure_reasons.len()
            ));
        }

        Ok(report)
    }
}

impl ValidationReport {
    /// Build a report; the verdict follows from whether any failure was recorded
    pub fn new(
        document_type: DocumentType,
        fields: BTreeMap<String, String>,
        confidence_scores: BTreeMap<String, f64>,
        failure_reasons: Vec<ValidationFailure>,
    ) -> Self {
        let validation_result = if failure_reasons.is_empty() {
            Verdict::Passed
        } else {
            Verdict::Failed
        };

        Self {
            document_type,
            fields,
            confidence_scores,
            validation_result,
            failure_reasons,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn confidence_scores(&self) -> &BTreeMap<String, f64> {
        &self.confidence_scores
    }

    pub fn verdict(&self) -> Verdict {
        self.validation_result
    }

    pub fn is_passed(&self) -> bool {
        self.validation_result.is_passed()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failure_reasons
    }

    /// Get failure reasons as display strings
    pub fn failure_reasons(&self) -> Vec<String> {
        self.failure_reasons.iter().map(|f| f.to_string()).collect()
    }

    /// Failures of one kind
    pub fn failures_of(&self, kind: FailureKind) -> Vec<&ValidationFailure> {
        self.failure_reasons.iter().filter(|f| f.kind == kind).collect()
    }
}
