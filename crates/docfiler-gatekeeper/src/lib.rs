//! Docfiler Gatekeeper
//!
//! Final cross-field validation of an aggregated document record.
//!
//! The Gatekeeper checks:
//! - The record carries every required field
//! - `date` is an ISO calendar date (`YYYY-MM-DD`)
//! - `type`, when present, belongs to the configured document types
//!
//! Missing optional fields never cause a rejection. Validation is pure: no
//! I/O, no backend, no state.
//!
//! # Examples
//!
//! ```
//! use docfiler_domain::{DocumentRecord, FieldName};
//! use docfiler_gatekeeper::{Gatekeeper, RejectionReason, ValidationConfig};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//!
//! let record = DocumentRecord::new()
//!     .with(FieldName::Date, "2024-08-01")
//!     .with(FieldName::Type, "facture");
//! assert!(gatekeeper.validate(&record).is_ok());
//!
//! let record = DocumentRecord::new()
//!     .with(FieldName::Date, "2024-08-01")
//!     .with(FieldName::Type, "contrat");
//! assert_eq!(
//!     gatekeeper.validate(&record),
//!     Err(RejectionReason::InvalidType("contrat".to_string()))
//! );
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{is_iso_date, Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
