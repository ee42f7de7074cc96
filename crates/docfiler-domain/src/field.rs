//! Field module - what can be extracted from a document

use std::fmt;

/// One of the five extractable fields
///
/// Declaration order is extraction order, so the derived `Ord` sorts a
/// record's fields the way the orchestrator visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    /// Short description of what the document is about
    Subject,

    /// Production date of the document (ISO calendar date)
    Date,

    /// Kind of document, from a closed set
    Type,

    /// Person or organization that produced the document
    Emitter,

    /// Person or organization the document is addressed to
    Recipient,
}

impl FieldName {
    /// Every field, in extraction order
    pub const ALL: [FieldName; 5] = [
        FieldName::Subject,
        FieldName::Date,
        FieldName::Type,
        FieldName::Emitter,
        FieldName::Recipient,
    ];

    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Subject => "subject",
            FieldName::Date => "date",
            FieldName::Type => "type",
            FieldName::Emitter => "emitter",
            FieldName::Recipient => "recipient",
        }
    }

    /// Parse a field name from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "subject" => Some(FieldName::Subject),
            "date" => Some(FieldName::Date),
            "type" => Some(FieldName::Type),
            "emitter" => Some(FieldName::Emitter),
            "recipient" => Some(FieldName::Recipient),
            _ => None,
        }
    }

    /// Whether a record without this field is useless
    ///
    /// Only `date` and `type` are critical; stricter policies are layered on
    /// top by the orchestrator configuration.
    pub fn is_critical(&self) -> bool {
        matches!(self, FieldName::Date | FieldName::Type)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid field name: {}", s))
    }
}

/// Set of values a field may take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueDomain {
    /// Any non-blank string
    FreeText,

    /// A calendar date; shape is checked by record validation, not here
    IsoDate,

    /// Exactly one of the listed values
    Enumeration(Vec<String>),
}

impl ValueDomain {
    /// Allowed values for a closed domain
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            ValueDomain::Enumeration(values) => Some(values),
            _ => None,
        }
    }

    /// Whether `value` belongs to the domain
    pub fn admits(&self, value: &str) -> bool {
        match self {
            ValueDomain::FreeText | ValueDomain::IsoDate => !value.trim().is_empty(),
            ValueDomain::Enumeration(values) => values.iter().any(|v| v == value),
        }
    }
}

/// Static descriptor of one extractable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: FieldName,
    domain: ValueDomain,
    instruction: String,
}

impl FieldSpec {
    /// Create a field spec
    pub fn new(name: FieldName, domain: ValueDomain, instruction: impl Into<String>) -> Self {
        Self {
            name,
            domain,
            instruction: instruction.into(),
        }
    }

    /// Field this spec describes
    pub fn name(&self) -> FieldName {
        self.name
    }

    /// Admissible values
    pub fn domain(&self) -> &ValueDomain {
        &self.domain
    }

    /// Human-readable extraction instruction
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Name of the tool the backend must call to answer for this field
    pub fn tool_name(&self) -> String {
        format!("extract_{}", self.name.as_str())
    }
}

/// Closed sets of values known at process start
///
/// Built once from configuration and passed into field construction; it is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    document_types: Vec<String>,
    recipients: Vec<String>,
}

impl Vocabulary {
    /// Document types used when configuration does not override them
    pub const DEFAULT_DOCUMENT_TYPES: [&'static str; 5] =
        ["relevé de comptes", "facture", "devis", "mail", "arrêt maladie"];

    /// Create a vocabulary
    ///
    /// # Errors
    /// Returns error if there is no document type, or if any entry is blank,
    /// padded with whitespace or duplicated
    pub fn new(document_types: Vec<String>, recipients: Vec<String>) -> Result<Self, String> {
        if document_types.is_empty() {
            return Err("At least one document type is required".to_string());
        }
        check_entries("document type", &document_types)?;
        check_entries("recipient", &recipients)?;

        Ok(Self {
            document_types,
            recipients,
        })
    }

    /// Allowed document types
    pub fn document_types(&self) -> &[String] {
        &self.document_types
    }

    /// Known recipients; empty means recipients are free text
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Whether `value` is one of the allowed document types
    pub fn is_document_type(&self, value: &str) -> bool {
        self.document_types.iter().any(|t| t == value)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            document_types: Self::DEFAULT_DOCUMENT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            recipients: Vec::new(),
        }
    }
}

fn check_entries(kind: &str, entries: &[String]) -> Result<(), String> {
    for (idx, entry) in entries.iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(format!("{} #{} is blank", kind, idx + 1));
        }
        if entry.trim() != entry.as_str() {
            return Err(format!(
                "{} '{}' has leading or trailing whitespace",
                kind, entry
            ));
        }
        if entries[..idx].contains(entry) {
            return Err(format!("{} '{}' is listed twice", kind, entry));
        }
    }
    Ok(())
}
