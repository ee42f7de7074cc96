//! Docfiler Extractor
//!
//! Turns the text of one document into a validated metadata record by
//! asking a tool-calling language model for one field at a time.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator → RetrySupervisor → FieldExtractor → backend
//!      ↓
//! DocumentRecord → Gatekeeper → Accepted | Rejected
//! ```
//!
//! # Key Features
//!
//! - **One query per field**: subject, date, type, emitter, recipient, each
//!   with its own answer schema
//! - **Strict decoding**: replies are decoded into typed values at the
//!   extractor boundary; closed fields never get coerced
//! - **Bounded retries**: every field gets `max_attempts` tries, failures are
//!   reported to an `AttemptObserver`
//! - **Criticality**: `date` and `type` abort the run when missing; the
//!   other fields are optional unless the strict policy is selected
//!
//! # Example Usage
//!
//! ```
//! use docfiler_domain::{DocumentText, FieldName};
//! use docfiler_extractor::{ExtractorConfig, Orchestrator};
//! use docfiler_llm::MockBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MockBackend::new();
//! backend.push_answer("extract_date", r#"{"date": "2024-08-01"}"#);
//! backend.push_answer("extract_type", r#"{"type": "facture", "confidence": "high"}"#);
//!
//! let orchestrator = Orchestrator::new(backend, ExtractorConfig::minimal())?;
//! let text = DocumentText::new("FACTURE du 1er août 2024")?;
//!
//! let report = orchestrator.run(&text).await;
//! let record = report.record().expect("date and type were answered");
//! assert_eq!(record.date(), Some("2024-08-01"));
//! assert_eq!(record.document_type(), Some("facture"));
//! assert_eq!(record.emitter(), None);
//!
//! for line in report.diagnostics() {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod events;
mod extractor;
mod fields;
mod orchestrator;
mod parser;
mod prompt;
mod retry;
mod types;


pub use config::{CriticalityPolicy, ExtractorConfig, VocabularyConfig};
pub use error::{AttemptError, ExtractorError};
pub use events::{AttemptEvent, AttemptObserver, RecordingObserver, TracingObserver};
pub use extractor::FieldExtractor;
pub use fields::FieldCatalog;
pub use orchestrator::Orchestrator;
pub use parser::decode_reply;
pub use prompt::{PromptBuilder, CONFIDENCE_PROPERTY, REASONING_PROPERTY};
pub use retry::RetrySupervisor;
pub use types::{
    AttemptFailure, ExtractionAttempt, ExtractionReport, FieldReport, FieldResolution, Outcome,
    Supervised,
};
