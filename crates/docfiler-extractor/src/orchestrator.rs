//! Per-document extraction run

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::events::{AttemptObserver, TracingObserver};
use crate::extractor::FieldExtractor;
use crate::fields::FieldCatalog;
use crate::retry::RetrySupervisor;
use crate::types::{ExtractionReport, FieldReport, FieldResolution, Outcome};
use docfiler_domain::traits::ExtractionBackend;
use docfiler_domain::{DocumentRecord, DocumentText, FieldName, RunId};
use docfiler_gatekeeper::{Gatekeeper, ValidationConfig};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// Turns one document text into a validated record, or explains why not
///
/// Fields are extracted one at a time in the configured order, each through
/// the retry supervisor. A critical field that cannot be extracted ends the
/// run at once; an optional one is left out of the record. The record is
/// validated before it is handed out.
///
/// An orchestrator holds no per-document state: concurrent `run` calls are
/// independent.
pub struct Orchestrator<B>
where
    B: ExtractionBackend,
{
    extractor: FieldExtractor<B>,
    catalog: FieldCatalog,
    supervisor: RetrySupervisor,
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
    observer: Arc<dyn AttemptObserver>,
}

impl<B> Orchestrator<B>
where
    B: ExtractionBackend,
{
    /// Create a new Orchestrator
    ///
    /// # Errors
    /// Returns `ExtractorError::Config` if the configuration is invalid
    pub fn new(backend: B, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::with_shared_backend(Arc::new(backend), config)
    }

    /// Create an Orchestrator on a backend shared with other owners
    pub fn with_shared_backend(
        backend: Arc<B>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate()?;
        let vocabulary = config.vocabulary()?;

        let validation = config
            .field_order()
            .into_iter()
            .filter(|field| config.is_critical(*field))
            .fold(ValidationConfig::from_vocabulary(&vocabulary), |rules, field| {
                rules.require(field)
            });
        validation.validate()?;

        Ok(Self {
            extractor: FieldExtractor::new(backend, config.call_timeout()),
            catalog: FieldCatalog::new(&vocabulary),
            supervisor: RetrySupervisor::new(config.max_attempts),
            gatekeeper: Gatekeeper::new(validation),
            config,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the attempt observer
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the record validator
    ///
    /// # Errors
    /// Returns `ExtractorError::Config` if the validator's configuration is
    /// invalid or accepts other document types than the extractor asks for
    pub fn with_gatekeeper(mut self, gatekeeper: Gatekeeper) -> Result<Self, ExtractorError> {
        let rules = gatekeeper.config();
        rules.validate()?;

        let offered = self.catalog.get(FieldName::Type).domain().allowed_values();
        if offered != Some(rules.document_types.as_slice()) {
            return Err(ExtractorError::Config(format!(
                "validator document types ({}) differ from the extracted ones ({})",
                rules.document_types.join(", "),
                offered.map(|types| types.join(", ")).unwrap_or_default()
            )));
        }

        self.gatekeeper = gatekeeper;
        Ok(self)
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Whether a failure of `field` aborts the run
    pub fn is_critical(&self, field: FieldName) -> bool {
        self.config.is_critical(field)
    }

    /// Field specs in use
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Extract, aggregate and validate one document
    pub async fn run(&self, text: &DocumentText) -> ExtractionReport {
        let run_id = RunId::new();
        let span = info_span!("extraction_run", %run_id);

        async {
            let started = Instant::now();
            info!(
                "Starting extraction of {} chars with {}",
                text.len(),
                self.extractor.backend().model_name()
            );

            let (outcome, fields) = self.extract_fields(text).await;
            let elapsed = started.elapsed();

            match &outcome {
                Outcome::Accepted(record) => {
                    info!(fields = record.len(), ?elapsed, "Record accepted")
                }
                Outcome::Aborted { field } => {
                    warn!(%field, ?elapsed, "Extraction aborted on critical field")
                }
                Outcome::Rejected { reasons } => {
                    warn!(reasons = reasons.len(), ?elapsed, "Record rejected by validation")
                }
            }

            ExtractionReport {
                run_id,
                outcome,
                fields,
                elapsed,
            }
        }
        .instrument(span)
        .await
    }

    async fn extract_fields(&self, text: &DocumentText) -> (Outcome, Vec<FieldReport>) {
        let mut record = DocumentRecord::new();
        let mut reports = Vec::new();

        for field in self.config.field_order() {
            let critical = self.config.is_critical(field);
            let spec = self.catalog.get(field);
            let extractor = &self.extractor;

            let supervised = self
                .supervisor
                .run(field, self.observer.as_ref(), move |_| extractor.extract(spec, text))
                .await;

            let resolution = match supervised.value {
                Some(value) => {
                    debug!(%field, value = %value.value, "Field resolved");
                    record.insert(field, value);
                    FieldResolution::Resolved
                }
                None => FieldResolution::Absent,
            };

            reports.push(FieldReport {
                field,
                critical,
                attempts: supervised.attempts,
                failures: supervised.failures,
                resolution,
            });

            if resolution == FieldResolution::Absent {
                if critical {
                    return (Outcome::Aborted { field }, reports);
                }
                info!(%field, "Optional field left empty");
            }
        }

        (self.validate(record), reports)
    }

    fn validate(&self, record: DocumentRecord) -> Outcome {
        let review = self.gatekeeper.review(&record);
        if review.is_accepted() {
            Outcome::Accepted(record)
        } else {
            Outcome::Rejected {
                reasons: review.reasons,
            }
        }
    }
}
