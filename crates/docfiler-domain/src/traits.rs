//! Trait definitions for external interactions
//!
//! These types define the boundary between the extraction pipeline and a
//! tool-calling language model. Backend implementations live in other crates.

use async_trait::async_trait;

/// One named argument of an answer schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperty {
    /// Argument name
    pub name: String,

    /// What the argument should contain
    pub description: String,

    /// Closed set of allowed string values, if any
    pub allowed_values: Option<Vec<String>>,

    /// Whether the argument must be present
    pub required: bool,
}

/// Declared shape of the structured answer (a single tool with string arguments)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSchema {
    /// Name of the tool the backend must call
    pub tool_name: String,

    /// Tool description shown to the model
    pub description: String,

    /// Tool arguments; every argument is a string
    pub properties: Vec<SchemaProperty>,
}

impl AnswerSchema {
    /// Look up an argument by name
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Names of the required arguments
    pub fn required_names(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// A single request to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendQuery {
    /// Natural-language instruction, document included
    pub prompt: String,

    /// The answer the backend is asked to produce
    pub schema: AnswerSchema,
}

/// A tool invocation returned by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Tool name
    pub name: String,

    /// Raw JSON arguments, exactly as received
    pub arguments: String,
}

/// Raw backend reply: free text, tool calls, or both
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendReply {
    /// Free-text content, if any
    pub content: Option<String>,

    /// Tool calls, in the order the backend emitted them
    pub tool_calls: Vec<ToolCall>,
}

impl BackendReply {
    /// A free-text reply without tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A reply holding exactly one tool call
    pub fn tool_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall {
                name: name.into(),
                arguments: arguments.into(),
            }],
        }
    }

    /// First call of the named tool
    pub fn find_tool_call(&self, name: &str) -> Option<&ToolCall> {
        self.tool_calls.iter().find(|call| call.name == name)
    }
}

/// Trait for a tool-calling language model
///
/// Implemented by the infrastructure layer (docfiler-llm). Each call is one
/// round-trip that the caller awaits to completion; implementations must not
/// retry internally, and report failures through `Err` rather than panicking.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Error type for transport-level failures
    type Error: std::fmt::Display + Send;

    /// Send one query and return the raw reply
    async fn query(&self, query: &BackendQuery) -> Result<BackendReply, Self::Error>;

    /// Name of the model behind the backend
    fn model_name(&self) -> &str {
        "llm"
    }
}
