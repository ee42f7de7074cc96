//! Record validation logic

use crate::ValidationConfig;
use chrono::NaiveDate;
use docfiler_domain::{DocumentRecord, FieldName};
use thiserror::Error;

/// Result of a full record review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the record passed validation
    pub status: ValidationStatus,

    /// Every rejection reason found, in check order
    pub reasons: Vec<RejectionReason>,
}

impl ValidationResult {
    /// Whether the record was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Record accepted
    Accepted,

    /// Record rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// `date` is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// `type` is outside the configured document types
    #[error("Invalid document type '{0}'")]
    InvalidType(String),

    /// A required field is absent from the record
    #[error("Missing critical field '{0}'")]
    MissingCriticalField(FieldName),
}

/// The Gatekeeper validates records before they leave the pipeline
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Rules in use
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a record, stopping at the first problem
    ///
    /// Checks run in a fixed order: required fields, then `date`, then
    /// `type`.
    pub fn validate(&self, record: &DocumentRecord) -> Result<(), RejectionReason> {
        match self.check(record).next() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Validate a record and collect every problem
    pub fn review(&self, record: &DocumentRecord) -> ValidationResult {
        let reasons: Vec<RejectionReason> = self.check(record).collect();
        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        ValidationResult { status, reasons }
    }

    fn check<'a>(
        &'a self,
        record: &'a DocumentRecord,
    ) -> impl Iterator<Item = RejectionReason> + 'a {
        let missing = self
            .config
            .required_fields
            .iter()
            .filter(move |field| !record.contains(**field))
            .map(|field| RejectionReason::MissingCriticalField(*field));

        let date = record
            .date()
            .filter(|date| !is_iso_date(date))
            .map(|date| RejectionReason::InvalidDate(date.to_string()));

        let document_type = record
            .document_type()
            .filter(|t| !self.config.document_types.iter().any(|known| known.as_str() == *t))
            .map(|t| RejectionReason::InvalidType(t.to_string()));

        missing.chain(date).chain(document_type)
    }
}

/// Whether `value` is a real calendar date written exactly as `YYYY-MM-DD`
///
/// ```
/// use docfiler_gatekeeper::is_iso_date;
///
/// assert!(is_iso_date("2024-02-29"));
/// assert!(!is_iso_date("2023-02-29"));
/// assert!(!is_iso_date("08/01/2024"));
/// assert!(!is_iso_date("2024-8-1"));
/// ```
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    shaped && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(date: &str, document_type: &str) -> DocumentRecord {
        DocumentRecord::new()
            .with(FieldName::Date, date)
            .with(FieldName::Type, document_type)
    }

    #[test]
    fn test_valid_record() {
        let gatekeeper = Gatekeeper::default_config();
        assert_eq!(gatekeeper.validate(&record("2024-08-01", "facture")), Ok(()));

        let result = gatekeeper.review(&record("2024-08-01", "facture"));
        assert!(result.is_accepted());
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_invalid_date_format() {
        let gatekeeper = Gatekeeper::default_config();
        assert_eq!(
            gatekeeper.validate(&record("08/01/2024", "facture")),
            Err(RejectionReason::InvalidDate("08/01/2024".to_string()))
        );
    }

    #[test]
    fn test_invalid_calendar_date() {
        let gatekeeper = Gatekeeper::default_config();
        for date in ["2024-13-01", "2024-02-30", "2023-02-29", "2024-00-10"] {
            assert!(
                matches!(
                    gatekeeper.validate(&record(date, "facture")),
                    Err(RejectionReason::InvalidDate(_))
                ),
                "{} should be rejected",
                date
            );
        }
    }

    #[test]
    fn test_invalid_type() {
        let gatekeeper = Gatekeeper::default_config();
        assert_eq!(
            gatekeeper.validate(&record("2024-08-01", "contrat")),
            Err(RejectionReason::InvalidType("contrat".to_string()))
        );
    }

    #[test]
    fn test_type_membership_is_exact() {
        let gatekeeper = Gatekeeper::default_config();
        assert!(gatekeeper.validate(&record("2024-08-01", "Facture")).is_err());
        assert!(gatekeeper.validate(&record("2024-08-01", "facture ")).is_err());
        assert!(gatekeeper
            .validate(&record("2024-08-01", "relevé de comptes"))
            .is_ok());
    }

    #[test]
    fn test_missing_optional_fields_are_fine() {
        let gatekeeper = Gatekeeper::default_config();
        let record = DocumentRecord::new().with(FieldName::Date, "2024-08-01");
        assert!(gatekeeper.validate(&record).is_ok());
    }

    #[test]
    fn test_missing_date() {
        let gatekeeper = Gatekeeper::default_config();
        let record = DocumentRecord::new().with(FieldName::Type, "devis");
        assert_eq!(
            gatekeeper.validate(&record),
            Err(RejectionReason::MissingCriticalField(FieldName::Date))
        );
    }

    #[test]
    fn test_strict_requires_type() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::strict());
        let record = DocumentRecord::new().with(FieldName::Date, "2024-08-01");
        assert_eq!(
            gatekeeper.validate(&record),
            Err(RejectionReason::MissingCriticalField(FieldName::Type))
        );
    }

    #[test]
    fn test_date_checked_before_type() {
        let gatekeeper = Gatekeeper::default_config();
        let bad = record("01-08-2024", "contrat");

        assert!(matches!(
            gatekeeper.validate(&bad),
            Err(RejectionReason::InvalidDate(_))
        ));

        let result = gatekeeper.review(&bad);
        assert_eq!(result.status, ValidationStatus::Rejected);
        assert_eq!(
            result.reasons,
            vec![
                RejectionReason::InvalidDate("01-08-2024".to_string()),
                RejectionReason::InvalidType("contrat".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_document_types() {
        let config = ValidationConfig {
            document_types: vec!["contrat".to_string()],
            ..ValidationConfig::default()
        };
        let gatekeeper = Gatekeeper::new(config);
        assert!(gatekeeper.validate(&record("2024-08-01", "contrat")).is_ok());
        assert!(gatekeeper.validate(&record("2024-08-01", "facture")).is_err());
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            RejectionReason::MissingCriticalField(FieldName::Date).to_string(),
            "Missing critical field 'date'"
        );
        assert!(RejectionReason::InvalidDate("x".to_string())
            .to_string()
            .contains("YYYY-MM-DD"));
    }

    proptest! {
        #[test]
        fn prop_real_dates_accepted(days in 0i64..80_000) {
            let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(days);
            let formatted = date.format("%Y-%m-%d").to_string();
            let gatekeeper = Gatekeeper::default_config();
            prop_assert!(gatekeeper.validate(&record(&formatted, "devis")).is_ok());
        }

        #[test]
        fn prop_unknown_types_rejected(value in "[a-z]{1,12}") {
            let gatekeeper = Gatekeeper::default_config();
            prop_assume!(!gatekeeper.config().document_types.contains(&value));
            prop_assert_eq!(
                gatekeeper.validate(&record("2024-08-01", &value)),
                Err(RejectionReason::InvalidType(value.clone()))
            );
        }

        #[test]
        fn prop_slash_dates_rejected(d in 1u32..29, m in 1u32..13, y in 1900u32..2100) {
            let value = format!("{:02}/{:02}/{}", d, m, y);
            prop_assert!(!is_iso_date(&value));
        }
    }
}
