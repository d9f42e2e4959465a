//! Validation engine integration tests
//!
//! Exercises the public API end to end: JSON in, report JSON out.

use chrono::NaiveDate;
use kyccheck::types::ExtractionResult;
use kyccheck::validation::{FailureKind, ValidationConfig, ValidationEngine, Verdict};
use kyccheck::{DocumentType, FieldName, KycError};
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn passport_json() -> Value {
    json!({
        "document_type": "Passport",
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
    })
}

fn with_field(mut base: Value, key: &str, value: &str) -> Value {
    base["fields"][key] = json!(value);
    base
}

fn with_confidence(mut base: Value, key: &str, score: f64) -> Value {
    base["confidence_scores"][key] = json!(score);
    base
}

fn without_field(mut base: Value, key: &str) -> Value {
    base["fields"].as_object_mut().unwrap().remove(key);
    base["confidence_scores"].as_object_mut().unwrap().remove(key);
    base
}

fn validate(value: Value) -> kyccheck::ValidationReport {
    let extraction = ExtractionResult::from_value(&value).unwrap();
    ValidationEngine::new().validate(&extraction, today())
}

#[test]
fn test_example_passport_passes() {
    let report = validate(passport_json());

    assert_eq!(report.verdict(), Verdict::Passed);
    assert!(report.failure_reasons().is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["document_type"], "Passport");
    assert_eq!(json["validation_result"], "Passed");
    assert_eq!(json["fields"]["Full Name"], "John Doe");
    assert_eq!(json["confidence_scores"]["Expiry Date"], 0.99);
    assert!(json.get("failure_reasons").is_none());
}

#[test]
fn test_example_underage_passport_fails() {
    let report = validate(with_field(passport_json(), "Date of Birth", "15-Mar-2015"));

    assert_eq!(report.verdict(), Verdict::Failed);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["validation_result"], "Failed");
    assert_eq!(json["failure_reasons"], json!(["AgeOutOfRangeError: Date of Birth"]));
}

#[test]
fn test_each_missing_required_field_reported() {
    let value = without_field(without_field(passport_json(), "Document Number"), "Expiry Date");
    let report = validate(value);

    assert_eq!(report.verdict(), Verdict::Failed);
    assert_eq!(
        report.failure_reasons(),
        vec!["MissingFieldError: Document Number", "MissingFieldError: Expiry Date"]
    );
}

#[test]
fn test_confidence_boundary() {
    let at_threshold = validate(with_confidence(passport_json(), "Full Name", 0.85));
    assert_eq!(at_threshold.verdict(), Verdict::Passed);

    let below = validate(with_confidence(passport_json(), "Full Name", 0.8499999));
    assert_eq!(below.failure_reasons(), vec!["LowConfidenceError: Full Name"]);
}

#[test]
fn test_age_boundary() {
    let exactly_18 = validate(with_field(passport_json(), "Date of Birth", "01-Jan-2007"));
    assert_eq!(exactly_18.verdict(), Verdict::Passed);

    // 17 years and 364 days
    let almost_18 = validate(with_field(passport_json(), "Date of Birth", "02-Jan-2007"));
    assert_eq!(almost_18.failure_reasons(), vec!["AgeOutOfRangeError: Date of Birth"]);
}

#[test]
fn test_expiry_boundary() {
    let expires_today = validate(with_field(passport_json(), "Expiry Date", "01-Jan-2025"));
    assert_eq!(expires_today.verdict(), Verdict::Passed);

    let expired_yesterday = validate(with_field(passport_json(), "Expiry Date", "31-Dec-2024"));
    assert_eq!(expired_yesterday.failure_reasons(), vec!["FutureDateError: Expiry Date"]);
}

#[test]
fn test_unparsable_and_future_dates() {
    let value = with_field(
        with_field(passport_json(), "Date of Birth", "2030-02-01"),
        "Expiry Date",
        "14/04/2027",
    );
    let report = validate(value);

    assert_eq!(
        report.failure_reasons(),
        vec!["FutureDateError: Date of Birth", "UnparsableDateError: Expiry Date"]
    );
}

#[test]
fn test_snake_case_keys_satisfy_required_fields() {
    let report = validate(json!({
        "document_type": "license",
        "fields": {
            "full_name": "Jane Roe",
            "date_of_birth": "1980-07-04",
            "license_number": "D1234567",
            "expiry_date": "2026-07-04",
            "state": "CA"
        },
        "confidence_scores": {
            "full_name": 0.9,
            "date_of_birth": 0.9,
            "license_number": 0.9,
            "expiry_date": 0.9,
            "state": 0.9
        }
    }));

    assert_eq!(report.document_type(), DocumentType::DriverLicense);
    assert_eq!(report.verdict(), Verdict::Passed);
}

#[test]
fn test_verdict_failed_iff_reasons() {
    let cases = vec![
        passport_json(),
        with_field(passport_json(), "Date of Birth", "15-Mar-2015"),
        with_confidence(passport_json(), "Document Number", 0.1),
        without_field(passport_json(), "Full Name"),
        with_field(passport_json(), "Expiry Date", "garbage"),
    ];

    for case in cases {
        let report = validate(case);
        assert_eq!(report.is_passed(), report.failures().is_empty());
    }
}

#[test]
fn test_custom_config() {
    let mut config = ValidationConfig::default();
    config.min_age_years = 30;
    config.set_required_fields(
        DocumentType::Passport,
        &[FieldName::FullName, FieldName::Nationality],
    );

    let extraction = ExtractionResult::from_value(&passport_json()).unwrap();
    let report = ValidationEngine::with_config(config).validate(&extraction, today());

    assert_eq!(report.failures_of(FailureKind::MissingField).len(), 1);
    assert_eq!(report.failures_of(FailureKind::AgeOutOfRange).len(), 1);
}

#[test]
fn test_malformed_input_is_fatal() {
    let missing_type = json!({"fields": {"Full Name": "John Doe"}});
    assert!(matches!(
        ExtractionResult::from_value(&missing_type),
        Err(KycError::InvalidInput(_))
    ));

    let bad_score = with_confidence(passport_json(), "Full Name", f64::NAN);
    // NaN serializes to null in serde_json, which is not a number
    assert!(ExtractionResult::from_value(&bad_score).is_err());

    assert!(ExtractionResult::from_json_str("{not json").is_err());
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = std::sync::Arc::new(ValidationEngine::new());
    let handles: Vec<_> = ["15-Mar-1996", "15-Mar-2015"]
        .into_iter()
        .map(|dob| {
            let engine = engine.clone();
            let value = with_field(passport_json(), "Date of Birth", dob);
            std::thread::spawn(move || {
                let extraction = ExtractionResult::from_value(&value).unwrap();
                engine.validate(&extraction, today()).is_passed()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false]);
}

#[test]
fn test_two_digit_year_is_unparsable_not_expired() {
    let report = validate(with_field(passport_json(), "Expiry Date", "14-Apr-27"));
    assert_eq!(report.failure_reasons(), vec!["UnparsableDateError: Expiry Date"]);
}

#[test]
fn test_snake_case_fields_with_labelled_scores() {
    let report = validate(json!({
        "document_type": "Passport",
        "fields": {
            "full_name": "John Doe",
            "date_of_birth": "15-Mar-1996",
            "passport_number": "963545637",
            "expiry_date": "14-Apr-2027"
        },
        "confidence_scores": {
            "Full Name": 0.99,
            "Date of Birth": 0.99,
            "Document Number": 0.99,
            "Expiry Date": 0.99
        }
    }));

    assert_eq!(report.verdict(), Verdict::Passed);
}

#[test]
fn test_contradictory_report_json_rejected() {
    let report_json = json!({
        "document_type": "Passport",
        "fields": {},
        "confidence_scores": {},
        "validation_result": "Passed",
        "failure_reasons": ["MissingFieldError: Full Name"]
    });
    assert!(serde_json::from_value::<kyccheck::ValidationReport>(report_json).is_err());
}
