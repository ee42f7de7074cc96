//! Error types for the Extractor

use docfiler_gatekeeper::GatekeeperError;
use thiserror::Error;

/// Errors that can occur while setting up extraction
///
/// Document-level failures are not errors: a run always yields an
/// `ExtractionReport`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    /// TOML serialization error
    #[error("Failed to serialize to TOML: {0}")]
    TomlSerialize(String),
}

impl From<GatekeeperError> for ExtractorError {
    fn from(e: GatekeeperError) -> Self {
        match e {
            GatekeeperError::Config(msg) => ExtractorError::Config(msg),
        }
    }
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::TomlParse(e.to_string())
    }
}

impl From<toml::ser::Error> for ExtractorError {
    fn from(e: toml::ser::Error) -> Self {
        ExtractorError::TomlSerialize(e.to_string())
    }
}

/// Why a single extraction attempt failed
///
/// Every variant counts as one failed attempt for the retry supervisor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// The backend call failed or timed out
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered without calling the requested tool
    #[error("No structured answer: {0}")]
    NoStructuredAnswer(String),

    /// The tool call arguments do not match the answer schema
    #[error("Schema violation: {0}")]
    SchemaViolation(String),
}

impl AttemptError {
    /// Short, stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Transport(_) => "transport",
            AttemptError::NoStructuredAnswer(_) => "no_structured_answer",
            AttemptError::SchemaViolation(_) => "schema_violation",
        }
    }
}
