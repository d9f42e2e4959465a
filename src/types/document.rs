//! Document type classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of identity or proof-of-address document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentType {
    Passport,
    DriverLicense,
    NationalId,
    UtilityBill,
    BankStatement,
    /// Anything the classifier could not place
    Other,
}

impl DocumentType {
    /// Every document type, in display order
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Passport,
        DocumentType::DriverLicense,
        DocumentType::NationalId,
        DocumentType::UtilityBill,
        DocumentType::BankStatement,
        DocumentType::Other,
    ];

    /// Parse a document type from any common spelling.
    ///
    /// Matching ignores case, whitespace and punctuation, so `"Driver's License"`,
    /// `"driver_license"` and `"DriverLicense"` are the same type. Unrecognized
    /// names map to `Other`.
    pub fn parse(raw: &str) -> Self {
        match compact_key(raw).as_str() {
            "passport" => Self::Passport,
            "driverlicense" | "driverslicense" | "drivinglicense" | "license" | "licence"
            | "driverlicence" | "driverslicence" | "drivinglicence" => Self::DriverLicense,
            "nationalid" | "nationalidcard" | "idcard" => Self::NationalId,
            "utilitybill" => Self::UtilityBill,
            "bankstatement" => Self::BankStatement,
            _ => Self::Other,
        }
    }

    /// Name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passport => "Passport",
            Self::DriverLicense => "DriverLicense",
            Self::NationalId => "NationalId",
            Self::UtilityBill => "UtilityBill",
            Self::BankStatement => "BankStatement",
            Self::Other => "Other",
        }
    }

    /// Key used in configuration tables
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::DriverLicense => "driver_license",
            Self::NationalId => "national_id",
            Self::UtilityBill => "utility_bill",
            Self::BankStatement => "bank_statement",
            Self::Other => "other",
        }
    }

    /// Human-readable description for prompts and terminal output
    pub fn description(&self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::DriverLicense => "driver's license",
            Self::NationalId => "national identity card",
            Self::UtilityBill => "utility bill",
            Self::BankStatement => "bank statement",
            Self::Other => "unrecognized document",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for DocumentType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DocumentType> for String {
    fn from(doc_type: DocumentType) -> Self {
        doc_type.as_str().to_string()
    }
}

/// Lowercase a key and drop everything that is not alphanumeric
pub(crate) fn compact_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
