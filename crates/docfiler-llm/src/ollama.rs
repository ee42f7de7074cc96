//! Ollama Backend Implementation
//!
//! Talks to a local Ollama instance through its chat API with tool calling.
//!
//! # Features
//!
//! - One HTTP round-trip per query (`POST /api/chat`, `stream: false`)
//! - The answer schema is sent as a single function tool
//! - Tool call arguments are handed back verbatim for strict decoding
//! - No internal retry: retry policy belongs to the caller
//!
//! # Examples
//!
//! ```no_run
//! use docfiler_llm::OllamaBackend;
//!
//! let backend = OllamaBackend::new("http://localhost:11434", "llama3.1")?;
//! # Ok::<(), docfiler_llm::LlmError>(())
//! ```

use crate::tools::tool_definition;
use crate::LlmError;
use async_trait::async_trait;
use docfiler_domain::traits::ExtractionBackend;
use docfiler_domain::{BackendQuery, BackendReply, ToolCall};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3.1";

/// Default timeout for one chat request (2 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama chat backend with tool calling
pub struct OllamaBackend {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for the Ollama chat API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    tools: Vec<Value>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response from the Ollama chat API
#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Deserialize)]
struct ResponseToolCall {
    function: ResponseFunction,
}

#[derive(Deserialize)]
struct ResponseFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1")
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Create a backend on the default endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// API endpoint in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn chat(&self, query: &BackendQuery) -> Result<BackendReply, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &query.prompt,
            }],
            tools: vec![tool_definition(&query.schema)],
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };

        debug!(
            tool = %query.schema.tool_name,
            model = %self.model,
            prompt_chars = query.prompt.len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let reply = into_reply(chat_response.message);
        debug!(
            tool_calls = reply.tool_calls.len(),
            has_content = reply.content.is_some(),
            "Chat response received"
        );
        Ok(reply)
    }
}

#[async_trait]
impl ExtractionBackend for OllamaBackend {
    type Error = LlmError;

    async fn query(&self, query: &BackendQuery) -> Result<BackendReply, Self::Error> {
        self.chat(query).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

/// Keep arguments as raw JSON text; a stringified payload stays a string
fn into_reply(message: ResponseMessage) -> BackendReply {
    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall {
            name: call.function.name,
            arguments: match call.function.arguments {
                Value::String(raw) => raw,
                other => other.to_string(),
            },
        })
        .collect();

    let content = Some(message.content).filter(|c| !c.trim().is_empty());

    BackendReply {
        content,
        tool_calls,
    }
}
