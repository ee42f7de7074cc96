//! Document record - the aggregated result of one extraction run

use crate::{Confidence, FieldName};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of one orchestrator run, based on UUIDv7
///
/// Only used to correlate log lines and reports; it never enters a
/// [`DocumentRecord`], so identical inputs still yield identical records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use docfiler_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A resolved field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// The extracted value, already checked against the field's domain
    pub value: String,

    /// Why the model picked this value, if it said
    pub reasoning: Option<String>,

    /// How sure the model claimed to be, if it said
    pub confidence: Option<Confidence>,
}

impl FieldValue {
    /// A bare value without reasoning or confidence
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reasoning: None,
            confidence: None,
        }
    }
}

/// Field name to extracted value
///
/// Missing entries are fields that were not attempted or could not be
/// extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRecord {
    fields: BTreeMap<FieldName, FieldValue>,
}

impl DocumentRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value if any
    pub fn insert(&mut self, name: FieldName, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name, value)
    }

    /// Builder-style variant of [`insert`](Self::insert) taking a bare value
    ///
    /// # Examples
    ///
    /// ```
    /// use docfiler_domain::{DocumentRecord, FieldName};
    ///
    /// let record = DocumentRecord::new()
    ///     .with(FieldName::Date, "2024-08-01")
    ///     .with(FieldName::Type, "facture");
    /// assert_eq!(record.date(), Some("2024-08-01"));
    /// assert_eq!(record.emitter(), None);
    /// ```
    pub fn with(mut self, name: FieldName, value: impl Into<String>) -> Self {
        self.fields.insert(name, FieldValue::new(value));
        self
    }

    /// Full entry for a field
    pub fn get(&self, name: FieldName) -> Option<&FieldValue> {
        self.fields.get(&name)
    }

    /// Value of a field
    pub fn value(&self, name: FieldName) -> Option<&str> {
        self.fields.get(&name).map(|f| f.value.as_str())
    }

    /// Whether a field is present
    pub fn contains(&self, name: FieldName) -> bool {
        self.fields.contains_key(&name)
    }

    /// Production date, as extracted
    pub fn date(&self) -> Option<&str> {
        self.value(FieldName::Date)
    }

    /// Document type, as extracted
    pub fn document_type(&self) -> Option<&str> {
        self.value(FieldName::Type)
    }

    /// Emitter, if extracted
    pub fn emitter(&self) -> Option<&str> {
        self.value(FieldName::Emitter)
    }

    /// Recipient, if extracted
    pub fn recipient(&self) -> Option<&str> {
        self.value(FieldName::Recipient)
    }

    /// Subject, if extracted
    pub fn subject(&self) -> Option<&str> {
        self.value(FieldName::Subject)
    }

    /// Present fields in extraction order
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Number of present fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_display_is_uuid() {
        let id = RunId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_ne!(id, RunId::new());
    }

    #[test]
    fn test_record_accessors() {
        let mut record = DocumentRecord::new();
        assert!(record.is_empty());

        record.insert(
            FieldName::Emitter,
            FieldValue {
                value: "EDF".to_string(),
                reasoning: Some("Logo in the header".to_string()),
                confidence: Some(Confidence::High),
            },
        );
        record.insert(FieldName::Date, FieldValue::new("2024-08-01"));

        assert_eq!(record.len(), 2);
        assert_eq!(record.emitter(), Some("EDF"));
        assert_eq!(record.date(), Some("2024-08-01"));
        assert!(record.document_type().is_none());
        assert_eq!(
            record.get(FieldName::Emitter).and_then(|f| f.confidence),
            Some(Confidence::High)
        );
    }

    #[test]
    fn test_iteration_follows_extraction_order() {
        let record = DocumentRecord::new()
            .with(FieldName::Recipient, "Jean Dupont")
            .with(FieldName::Date, "2024-08-01")
            .with(FieldName::Subject, "Electricity bill");

        let names: Vec<FieldName> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![FieldName::Subject, FieldName::Date, FieldName::Recipient]
        );
    }

    #[test]
    fn test_insert_replaces() {
        let mut record = DocumentRecord::new().with(FieldName::Type, "devis");
        let previous = record.insert(FieldName::Type, FieldValue::new("facture"));
        assert_eq!(previous.map(|f| f.value), Some("devis".to_string()));
        assert_eq!(record.document_type(), Some("facture"));
    }
}
