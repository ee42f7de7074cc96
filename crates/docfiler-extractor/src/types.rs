//! Attempt and report types for extraction runs

use crate::error::AttemptError;
use docfiler_domain::{DocumentRecord, FieldName, FieldValue, RunId};
use docfiler_gatekeeper::RejectionReason;
use std::time::Duration;

/// Outcome of one backend call for one field
pub type ExtractionAttempt = Result<FieldValue, AttemptError>;

/// A failed attempt, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// Attempt number
    pub attempt: u32,

    /// Why it failed
    pub error: AttemptError,
}

/// Result of running one field through the retry supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supervised {
    /// The first successful value, if any attempt succeeded
    pub value: Option<FieldValue>,

    /// Number of attempts made
    pub attempts: u32,

    /// Every failed attempt, in order
    pub failures: Vec<AttemptFailure>,
}

impl Supervised {
    /// Whether an attempt succeeded
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }
}

/// How a field ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldResolution {
    /// A value was extracted and stored in the record
    Resolved,

    /// Every attempt failed
    Absent,
}

/// Per-field diagnostics of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    /// Field
    pub field: FieldName,

    /// Whether its failure aborts the run
    pub critical: bool,

    /// Attempts made
    pub attempts: u32,

    /// Failed attempts, in order
    pub failures: Vec<AttemptFailure>,

    /// Final state
    pub resolution: FieldResolution,
}

/// Final outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every critical field extracted and the record passed validation
    Accepted(DocumentRecord),

    /// A critical field could not be extracted; later fields were skipped
    Aborted {
        /// The field that exhausted its attempts
        field: FieldName,
    },

    /// The aggregated record failed validation
    Rejected {
        /// Every validation problem found
        reasons: Vec<RejectionReason>,
    },
}

/// Everything a run produced: the record (or its absence) and why
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Identifier of the run, for log correlation
    pub run_id: RunId,

    /// Final outcome
    pub outcome: Outcome,

    /// Attempted fields, in extraction order
    pub fields: Vec<FieldReport>,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl ExtractionReport {
    /// The validated record, or `None` for "no record"
    pub fn record(&self) -> Option<&DocumentRecord> {
        match &self.outcome {
            Outcome::Accepted(record) => Some(record),
            _ => None,
        }
    }

    /// Consume the report, keeping only the record
    pub fn into_record(self) -> Option<DocumentRecord> {
        match self.outcome {
            Outcome::Accepted(record) => Some(record),
            _ => None,
        }
    }

    /// Whether the run produced a record
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted(_))
    }

    /// Report for one field, if it was attempted
    pub fn field(&self, name: FieldName) -> Option<&FieldReport> {
        self.fields.iter().find(|report| report.field == name)
    }

    /// Human-readable lines: one per failed attempt, then the outcome
    pub fn diagnostics(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for report in &self.fields {
            for failure in &report.failures {
                lines.push(format!(
                    "{}: attempt {}/{} failed: {}",
                    report.field, failure.attempt, report.attempts, failure.error
                ));
            }
            if report.resolution == FieldResolution::Absent {
                let kind = if report.critical { "critical" } else { "optional" };
                lines.push(format!(
                    "{}: {} field absent after {} attempt(s)",
                    report.field, kind, report.attempts
                ));
            }
        }

        match &self.outcome {
            Outcome::Accepted(record) => {
                lines.push(format!("accepted with {} field(s)", record.len()));
            }
            Outcome::Aborted { field } => {
                lines.push(format!("aborted: critical field '{}' could not be extracted", field));
            }
            Outcome::Rejected { reasons } => {
                for reason in reasons {
                    lines.push(format!("rejected: {}", reason));
                }
            }
        }

        lines
    }
}
