//! Recognized document field names

use super::document::compact_key;
use std::fmt;

/// How a field takes part in date-sanity checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Date of birth: not in the future, age within bounds
    Birth,
    /// Expiry date: not already past
    Expiry,
    /// Issue or billing date: not in the future
    Past,
    NotADate,
}

/// Strongly-typed field key.
///
/// Known fields get their own variant; anything else the extractor returns
/// lands in `Extra` with its key preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    FullName,
    DateOfBirth,
    DocumentNumber,
    ExpiryDate,
    IssueDate,
    Nationality,
    State,
    Address,
    ServiceProvider,
    BillDate,
    Amount,
    BankName,
    AccountHolder,
    AccountNumber,
    StatementPeriod,
    Balance,
    Extra(String),
}

impl FieldName {
    /// Parse a field key, tolerating case, separators and common aliases
    pub fn parse(raw: &str) -> Self {
        match compact_key(raw).as_str() {
            "fullname" | "name" | "customername" => Self::FullName,
            "dateofbirth" | "dob" | "birthdate" => Self::DateOfBirth,
            "documentnumber" | "documentno" | "passportnumber" | "passportno"
            | "licensenumber" | "licencenumber" | "licenseno" | "idnumber" => Self::DocumentNumber,
            "expirydate" | "expirationdate" | "dateofexpiry" | "expiry" | "expires" => {
                Self::ExpiryDate
            }
            "issuedate" | "dateofissue" | "issued" => Self::IssueDate,
            "nationality" => Self::Nationality,
            "state" => Self::State,
            "address" => Self::Address,
            "serviceprovider" => Self::ServiceProvider,
            "billdate" => Self::BillDate,
            "amount" | "amountdue" => Self::Amount,
            "bankname" => Self::BankName,
            "accountholder" => Self::AccountHolder,
            "accountnumber" => Self::AccountNumber,
            "statementperiod" => Self::StatementPeriod,
            "balance" => Self::Balance,
            _ => Self::Extra(raw.trim().to_string()),
        }
    }

    /// Canonical display label
    pub fn label(&self) -> &str {
        match self {
            Self::FullName => "Full Name",
            Self::DateOfBirth => "Date of Birth",
            Self::DocumentNumber => "Document Number",
            Self::ExpiryDate => "Expiry Date",
            Self::IssueDate => "Issue Date",
            Self::Nationality => "Nationality",
            Self::State => "State",
            Self::Address => "Address",
            Self::ServiceProvider => "Service Provider",
            Self::BillDate => "Bill Date",
            Self::Amount => "Amount",
            Self::BankName => "Bank Name",
            Self::AccountHolder => "Account Holder",
            Self::AccountNumber => "Account Number",
            Self::StatementPeriod => "Statement Period",
            Self::Balance => "Balance",
            Self::Extra(name) => name,
        }
    }

    pub fn date_kind(&self) -> DateKind {
        match self {
            Self::DateOfBirth => DateKind::Birth,
            Self::ExpiryDate => DateKind::Expiry,
            Self::IssueDate | Self::BillDate => DateKind::Past,
            _ => DateKind::NotADate,
        }
    }

    pub fn is_date(&self) -> bool {
        self.date_kind() != DateKind::NotADate
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Extra(_))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for FieldName {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_and_snake_case() {
        assert_eq!(FieldName::parse("Date of Birth"), FieldName::DateOfBirth);
        assert_eq!(FieldName::parse("date_of_birth"), FieldName::DateOfBirth);
        assert_eq!(FieldName::parse("DOB"), FieldName::DateOfBirth);
        assert_eq!(FieldName::parse("Expiry Date"), FieldName::ExpiryDate);
        assert_eq!(FieldName::parse("expiration-date"), FieldName::ExpiryDate);
    }

    #[test]
    fn test_document_number_aliases() {
        for alias in ["Document Number", "passport_number", "license_number", "id_number"] {
            assert_eq!(FieldName::parse(alias), FieldName::DocumentNumber, "{}", alias);
        }
    }

    #[test]
    fn test_extra_keeps_key() {
        let field = FieldName::parse("  Blood Type ");
        assert_eq!(field, FieldName::Extra("Blood Type".to_string()));
        assert_eq!(field.label(), "Blood Type");
        assert!(!field.is_recognized());
        assert!(!field.is_date());
    }

    #[test]
    fn test_date_kinds() {
        assert_eq!(FieldName::DateOfBirth.date_kind(), DateKind::Birth);
        assert_eq!(FieldName::ExpiryDate.date_kind(), DateKind::Expiry);
        assert_eq!(FieldName::IssueDate.date_kind(), DateKind::Past);
        assert_eq!(FieldName::BillDate.date_kind(), DateKind::Past);
        assert_eq!(FieldName::FullName.date_kind(), DateKind::NotADate);
    }

    #[test]
    fn test_label_parses_back() {
        let fields = [
            FieldName::FullName,
            FieldName::DocumentNumber,
            FieldName::StatementPeriod,
            FieldName::AccountHolder,
        ];
        for field in fields {
            assert_eq!(FieldName::parse(field.label()), field);
        }
    }
}
