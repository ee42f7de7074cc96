//! Gatekeeper configuration

use crate::GatekeeperError;
use docfiler_domain::{FieldName, Vocabulary};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Closed set of accepted document types
    pub document_types: Vec<String>,

    /// Fields a record must carry to be accepted
    pub required_fields: Vec<FieldName>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::from_vocabulary(&Vocabulary::default())
    }
}

impl ValidationConfig {
    /// Validation against a vocabulary; only `date` is required
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        Self {
            document_types: vocabulary.document_types().to_vec(),
            required_fields: vec![FieldName::Date],
        }
    }

    /// Create a strict configuration (both `date` and `type` required)
    pub fn strict() -> Self {
        Self {
            required_fields: vec![FieldName::Date, FieldName::Type],
            ..Self::default()
        }
    }

    /// Require an additional field
    pub fn require(mut self, field: FieldName) -> Self {
        if !self.required_fields.contains(&field) {
            self.required_fields.push(field);
        }
        self
    }

    /// Check the configuration itself
    ///
    /// # Errors
    /// Returns error if no document type is configured, or one is blank or
    /// padded with whitespace
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.document_types.is_empty() {
            return Err(GatekeeperError::Config(
                "At least one document type is required".to_string(),
            ));
        }
        if self.document_types.iter().any(|t| t.trim().is_empty()) {
            return Err(GatekeeperError::Config(
                "Document types must not be blank".to_string(),
            ));
        }
        if let Some(padded) = self.document_types.iter().find(|t| t.trim() != t.as_str()) {
            return Err(GatekeeperError::Config(format!(
                "Document type '{}' has leading or trailing whitespace",
                padded
            )));
        }
        Ok(())
    }
}
