//! Single-field extraction: one backend call, decoded

use crate::error::AttemptError;
use crate::parser::decode_reply;
use crate::prompt::PromptBuilder;
use crate::types::ExtractionAttempt;
use docfiler_domain::traits::ExtractionBackend;
use docfiler_domain::{DocumentText, FieldSpec};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Asks the backend for one field of one document
///
/// Each `extract` call issues exactly one query and never retries.
pub struct FieldExtractor<B>
where
    B: ExtractionBackend,
{
    backend: Arc<B>,
    call_timeout: Duration,
}

impl<B> FieldExtractor<B>
where
    B: ExtractionBackend,
{
    /// Create a new extractor
    pub fn new(backend: Arc<B>, call_timeout: Duration) -> Self {
        Self {
            backend,
            call_timeout,
        }
    }

    /// Backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Query the backend once and decode its reply for `spec`
    ///
    /// A backend error or a call exceeding the timeout is a `Transport`
    /// failure.
    pub async fn extract(&self, spec: &FieldSpec, text: &DocumentText) -> ExtractionAttempt {
        let query = PromptBuilder::new(spec, text).build();

        debug!(
            "Querying {} for '{}' (prompt {} chars)",
            self.backend.model_name(),
            spec.name(),
            query.prompt.len()
        );

        let reply = timeout(self.call_timeout, self.backend.query(&query))
            .await
            .map_err(|_| {
                AttemptError::Transport(format!(
                    "no reply within {}s",
                    self.call_timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        debug!(
            "Reply for '{}': {} tool call(s)",
            spec.name(),
            reply.tool_calls.len()
        );

        decode_reply(spec, &reply)
    }
}
