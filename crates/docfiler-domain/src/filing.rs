//! Filing layout for organized documents
//!
//! A validated record is filed as
//! `<type>/<YYYY-MM>/<emitter> - <recipient> - <original file name>`.
//! Absent optional parts are skipped. Computing the path performs no I/O;
//! moving the file is the organizer's job.

use crate::DocumentRecord;
use std::path::PathBuf;

const PART_SEPARATOR: &str = " - ";

impl DocumentRecord {
    /// Relative destination of the source file
    ///
    /// Returns `None` when `date` or `type` is missing, or when the date does
    /// not start with a `YYYY-MM` prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use docfiler_domain::{DocumentRecord, FieldName};
    /// use std::path::PathBuf;
    ///
    /// let record = DocumentRecord::new()
    ///     .with(FieldName::Date, "2024-08-01")
    ///     .with(FieldName::Type, "facture")
    ///     .with(FieldName::Emitter, "EDF");
    ///
    /// assert_eq!(
    ///     record.filing_path("scan_001.pdf"),
    ///     Some(PathBuf::from("facture/2024-08/EDF - scan_001.pdf"))
    /// );
    /// ```
    pub fn filing_path(&self, file_name: &str) -> Option<PathBuf> {
        let document_type = sanitize_component(self.document_type()?)?;
        let month = year_month(self.date()?)?;

        let mut parts: Vec<String> = [self.emitter(), self.recipient()]
            .into_iter()
            .flatten()
            .filter_map(sanitize_component)
            .collect();
        parts.push(sanitize_component(file_name).unwrap_or_else(|| "document".to_string()));

        let mut path = PathBuf::from(document_type);
        path.push(month);
        path.push(parts.join(PART_SEPARATOR));
        Some(path)
    }
}

/// `YYYY-MM` prefix of an ISO date
fn year_month(date: &str) -> Option<&str> {
    let prefix = date.get(..7)?;
    let bytes = prefix.as_bytes();
    let digits_ok = bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit);
    (digits_ok && bytes[4] == b'-').then_some(prefix)
}

/// Make a value safe to use as a single path component
fn sanitize_component(value: &str) -> Option<String> {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" => None,
        "." | ".." => Some("_".to_string()),
        other => Some(other.to_string()),
    }
}
