//! Configuration for the Extractor

use crate::error::ExtractorError;
use docfiler_domain::{FieldName, Vocabulary};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which fields abort the run when they cannot be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticalityPolicy {
    /// Only `date` and `type` are critical
    #[default]
    Standard,

    /// Every attempted field is critical
    Strict,
}

impl CriticalityPolicy {
    /// Whether a failure of `field` aborts the run
    pub fn is_critical(&self, field: FieldName) -> bool {
        match self {
            CriticalityPolicy::Standard => field.is_critical(),
            CriticalityPolicy::Strict => true,
        }
    }
}

/// Closed value sets as they appear in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Allowed document types
    pub document_types: Vec<String>,

    /// Known recipients; empty means recipients are free text
    pub recipients: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        let vocabulary = Vocabulary::default();
        Self {
            document_types: vocabulary.document_types().to_vec(),
            recipients: vocabulary.recipients().to_vec(),
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Attempts per field before giving up on it
    pub max_attempts: u32,

    /// Maximum time for a single backend call (seconds)
    pub call_timeout_secs: u64,

    /// Whether `subject` is extracted before the other fields
    pub extract_subject: bool,

    /// Which failed fields abort the run
    pub criticality: CriticalityPolicy,

    /// Closed value sets
    pub vocabulary: VocabularyConfig,
}

impl ExtractorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Fields in the order they are attempted
    pub fn field_order(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|field| self.extract_subject || *field != FieldName::Subject)
            .collect()
    }

    /// Whether a failure of `field` aborts the run
    pub fn is_critical(&self, field: FieldName) -> bool {
        self.criticality.is_critical(field)
    }

    /// Build the immutable vocabulary
    pub fn vocabulary(&self) -> Result<Vocabulary, ExtractorError> {
        Vocabulary::new(
            self.vocabulary.document_types.clone(),
            self.vocabulary.recipients.clone(),
        )
        .map_err(ExtractorError::Config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_attempts == 0 {
            return Err(ExtractorError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "call_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.vocabulary().map(|_| ())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration: all five fields, 3 attempts each
    fn default() -> Self {
        Self {
            max_attempts: 3,
            call_timeout_secs: 120,
            extract_subject: true,
            criticality: CriticalityPolicy::Standard,
            vocabulary: VocabularyConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Strict preset: every field must be extracted
    pub fn strict() -> Self {
        Self {
            criticality: CriticalityPolicy::Strict,
            ..Self::default()
        }
    }

    /// Minimal preset: skip `subject` (date, type, emitter, recipient)
    pub fn minimal() -> Self {
        Self {
            extract_subject: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.call_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::strict().validate().is_ok());
        assert!(ExtractorConfig::minimal().validate().is_ok());
    }

    #[test]
    fn test_field_order() {
        assert_eq!(
            ExtractorConfig::default().field_order(),
            vec![
                FieldName::Subject,
                FieldName::Date,
                FieldName::Type,
                FieldName::Emitter,
                FieldName::Recipient,
            ]
        );
        assert_eq!(
            ExtractorConfig::minimal().field_order(),
            vec![
                FieldName::Date,
                FieldName::Type,
                FieldName::Emitter,
                FieldName::Recipient,
            ]
        );
    }

    #[test]
    fn test_criticality_policies() {
        let standard = ExtractorConfig::default();
        assert!(standard.is_critical(FieldName::Date));
        assert!(standard.is_critical(FieldName::Type));
        assert!(!standard.is_critical(FieldName::Emitter));
        assert!(!standard.is_critical(FieldName::Subject));

        let strict = ExtractorConfig::strict();
        assert!(FieldName::ALL.iter().all(|f| strict.is_critical(*f)));
    }

    #[test]
    fn test_invalid_max_attempts() {
        let mut config = ExtractorConfig::default();
        config.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExtractorConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_vocabulary() {
        let mut config = ExtractorConfig::default();
        config.vocabulary.document_types.clear();
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.vocabulary.recipients = vec!["Jean Dupont".into(), "Jean Dupont".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_padded_document_type_is_refused() {
        let config = ExtractorConfig::from_toml(
            r#"
            [vocabulary]
            document_types = ["facture ", "devis"]
            "#,
        )
        .unwrap();

        match config.validate() {
            Err(ExtractorError::Config(msg)) => assert!(msg.contains("'facture '"), "{}", msg),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::strict();
        config.vocabulary.recipients = vec!["Jean Dupont".to_string()];
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
        assert!(toml_str.contains("criticality = \"strict\""));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
            max_attempts = 5

            [vocabulary]
            recipients = ["Jean Dupont", "Marie Curie"]
            "#,
        )
        .unwrap();

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.call_timeout_secs, 120);
        assert_eq!(config.vocabulary.document_types.len(), 5);
        assert_eq!(config.vocabulary().unwrap().recipients().len(), 2);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ExtractorConfig::from_toml("max_attempts = \"three\""),
            Err(ExtractorError::TomlParse(_))
        ));
    }
}
