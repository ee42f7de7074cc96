//! Docfiler LLM Backend Layer
//!
//! Implementations of the `ExtractionBackend` trait from `docfiler-domain`.
//!
//! # Backends
//!
//! - `MockBackend`: Deterministic, scripted per tool, for testing
//! - `OllamaBackend`: Local Ollama chat API with tool calling
//!
//! # Examples
//!
//! ```
//! use docfiler_domain::{AnswerSchema, BackendQuery, ExtractionBackend};
//! use docfiler_llm::MockBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = MockBackend::new();
//! backend.push_answer("extract_date", r#"{"date": "2024-08-01"}"#);
//!
//! let query = BackendQuery {
//!     prompt: "When was this written?".to_string(),
//!     schema: AnswerSchema {
//!         tool_name: "extract_date".to_string(),
//!         description: "Date".to_string(),
//!         properties: vec![],
//!     },
//! };
//! let reply = backend.query(&query).await.unwrap();
//! assert!(reply.find_tool_call("extract_date").is_some());
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod tools;

use async_trait::async_trait;
use docfiler_domain::traits::ExtractionBackend;
use docfiler_domain::{BackendQuery, BackendReply};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use ollama::OllamaBackend;
pub use tools::tool_definition;

/// Errors that can occur while talking to a backend
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The backend did not answer in time
    #[error("Request timed out")]
    Timeout,

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(BackendReply),
    Fail(String),
}

/// Mock backend for deterministic testing
///
/// Replies are scripted per tool name. Each query pops the next scripted
/// entry for its tool; the last entry is sticky and answers every later
/// query. Tools without a script get the default reply, a free-text
/// non-answer unless overridden.
///
/// Clones share scripts and the call log.
///
/// # Examples
///
/// ```
/// use docfiler_llm::MockBackend;
///
/// let backend = MockBackend::new();
/// backend.push_error("extract_date", "connection reset");
/// backend.push_answer("extract_date", r#"{"date": "2024-08-01"}"#);
/// assert_eq!(backend.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    default_reply: BackendReply,
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Create a mock whose unscripted tools get a free-text reply
    pub fn new() -> Self {
        Self::with_default(BackendReply::text("I could not find that information."))
    }

    /// Create a mock with a specific default reply
    pub fn with_default(reply: BackendReply) -> Self {
        Self {
            default_reply: reply,
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a tool call answer for `tool` with raw JSON arguments
    pub fn push_answer(&self, tool: &str, arguments: impl Into<String>) {
        self.push_reply(tool, BackendReply::tool_call(tool, arguments));
    }

    /// Queue an arbitrary reply for `tool`
    pub fn push_reply(&self, tool: &str, reply: BackendReply) {
        self.push(tool, Scripted::Reply(reply));
    }

    /// Queue a transport failure for `tool`
    pub fn push_error(&self, tool: &str, message: impl Into<String>) {
        self.push(tool, Scripted::Fail(message.into()));
    }

    /// Tool names of every query received, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of queries received
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of queries received for one tool
    pub fn calls_for(&self, tool: &str) -> usize {
        lock(&self.calls).iter().filter(|name| *name == tool).count()
    }

    /// Forget the call log; scripts are kept
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }

    fn push(&self, tool: &str, entry: Scripted) {
        lock(&self.scripts)
            .entry(tool.to_string())
            .or_default()
            .push_back(entry);
    }

    fn next_for(&self, tool: &str) -> Option<Scripted> {
        let mut scripts = lock(&self.scripts);
        let queue = scripts.get_mut(tool)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionBackend for MockBackend {
    type Error = LlmError;

    async fn query(&self, query: &BackendQuery) -> Result<BackendReply, Self::Error> {
        let tool = query.schema.tool_name.as_str();
        lock(&self.calls).push(tool.to_string());

        match self.next_for(tool) {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(LlmError::Communication(message)),
            None => Ok(self.default_reply.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfiler_domain::AnswerSchema;

    fn query_for(tool: &str) -> BackendQuery {
        BackendQuery {
            prompt: "prompt".to_string(),
            schema: AnswerSchema {
                tool_name: tool.to_string(),
                description: String::new(),
                properties: vec![],
            },
        }
    }

    #[tokio::test]
    async fn test_unscripted_tool_gets_default_reply() {
        let backend = MockBackend::new();
        let reply = backend.query(&query_for("extract_date")).await.unwrap();
        assert!(reply.tool_calls.is_empty());
        assert!(reply.content.is_some());
    }

    #[tokio::test]
    async fn test_scripts_are_consumed_in_order_and_last_is_sticky() {
        let backend = MockBackend::new();
        backend.push_error("extract_date", "boom");
        backend.push_answer("extract_date", r#"{"date":"2024-08-01"}"#);

        assert!(matches!(
            backend.query(&query_for("extract_date")).await,
            Err(LlmError::Communication(_))
        ));
        for _ in 0..3 {
            let reply = backend.query(&query_for("extract_date")).await.unwrap();
            assert!(reply.find_tool_call("extract_date").is_some());
        }
    }

    #[tokio::test]
    async fn test_scripts_are_per_tool() {
        let backend = MockBackend::new();
        backend.push_answer("extract_type", r#"{"type":"facture"}"#);

        let reply = backend.query(&query_for("extract_date")).await.unwrap();
        assert!(reply.tool_calls.is_empty());
        let reply = backend.query(&query_for("extract_type")).await.unwrap();
        assert_eq!(reply.tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn test_call_log() {
        let backend = MockBackend::new();
        backend.query(&query_for("extract_subject")).await.unwrap();
        backend.query(&query_for("extract_date")).await.unwrap();
        backend.query(&query_for("extract_date")).await.unwrap();

        assert_eq!(
            backend.calls(),
            vec!["extract_subject", "extract_date", "extract_date"]
        );
        assert_eq!(backend.calls_for("extract_date"), 2);

        backend.reset_calls();
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let backend1 = MockBackend::new();
        let backend2 = backend1.clone();
        backend2.push_answer("extract_type", r#"{"type":"devis"}"#);

        let reply = backend1.query(&query_for("extract_type")).await.unwrap();
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(backend2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_custom_default_reply() {
        let backend = MockBackend::with_default(BackendReply::default());
        let reply = backend.query(&query_for("extract_emitter")).await.unwrap();
        assert_eq!(reply, BackendReply::default());
        assert_eq!(backend.model_name(), "mock");
    }
}
