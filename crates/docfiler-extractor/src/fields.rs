//! The five field specs, built once from the vocabulary

use docfiler_domain::{FieldName, FieldSpec, ValueDomain, Vocabulary};

/// Immutable set of field specs, one per `FieldName`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    specs: [FieldSpec; 5],
}

impl FieldCatalog {
    /// Build the field specs from a vocabulary
    ///
    /// `recipient` is a closed enumeration when the vocabulary lists known
    /// recipients and free text otherwise.
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let document_types = vocabulary.document_types().to_vec();
        let recipients = vocabulary.recipients().to_vec();

        let recipient = if recipients.is_empty() {
            FieldSpec::new(
                FieldName::Recipient,
                ValueDomain::FreeText,
                "The name of the person or organization who received the document. \
                 Example: Jean Dupont",
            )
        } else {
            FieldSpec::new(
                FieldName::Recipient,
                ValueDomain::Enumeration(recipients.clone()),
                format!(
                    "The person or organization who received the document. Must be one of: {}",
                    recipients.join(", ")
                ),
            )
        };

        // Order must match FieldName declaration order; `get` indexes by it.
        let specs = [
            FieldSpec::new(
                FieldName::Subject,
                ValueDomain::FreeText,
                "A short description of what the document is about, in a few words. \
                 Example: Facture électricité",
            ),
            FieldSpec::new(
                FieldName::Date,
                ValueDomain::IsoDate,
                "The date of the document in YYYY-MM-DD format. Example: 2024-08-01",
            ),
            FieldSpec::new(
                FieldName::Type,
                ValueDomain::Enumeration(document_types.clone()),
                format!(
                    "The type of document. Must be one of: {}",
                    document_types.join(", ")
                ),
            ),
            FieldSpec::new(
                FieldName::Emitter,
                ValueDomain::FreeText,
                "The name of the person or organization who sent or created the document. \
                 Example: Société XYZ",
            ),
            recipient,
        ];

        Self { specs }
    }

    /// Spec for one field
    pub fn get(&self, name: FieldName) -> &FieldSpec {
        &self.specs[name as usize]
    }

    /// Every spec, in extraction order
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}
