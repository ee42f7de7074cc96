//! Document text - the input of every extraction run

use std::fmt;

/// Decoded natural-language content of one document
///
/// Produced by an external text-extraction collaborator (PDF parsing with an
/// OCR fallback). The only structural guarantee is that it is not blank.
/// No length limit is imposed here; truncation is left to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentText(String);

impl DocumentText {
    /// Wrap extracted text
    ///
    /// # Errors
    /// Returns error if the text is empty or whitespace only
    ///
    /// # Examples
    ///
    /// ```
    /// use docfiler_domain::DocumentText;
    ///
    /// let text = DocumentText::new("Facture n°42 du 1er août 2024").unwrap();
    /// assert!(text.len() > 0);
    /// assert!(DocumentText::new("   \n").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Document text cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Get the text as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the text is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocumentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentText {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DocumentText {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
