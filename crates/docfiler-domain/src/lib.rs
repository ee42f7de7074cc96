//! Docfiler Domain Layer
//!
//! Value objects and trait seams for turning unstructured document text into
//! a validated metadata record. This crate keeps external dependencies to a
//! minimum and holds no I/O: backends, validation and orchestration live in
//! the other workspace crates.
//!
//! ## Key Concepts
//!
//! - **DocumentText**: the sole, non-empty input of an extraction run
//! - **FieldSpec**: what to extract for one field and which values are admissible
//! - **Vocabulary**: the closed sets (document types, known recipients) loaded once
//! - **DocumentRecord**: field name to extracted value, built per document
//! - **ExtractionBackend**: the boundary to a tool-calling language model
//!
//! ## Field order
//!
//! Fields are always attempted in the order of [`FieldName::ALL`]:
//! subject, date, type, emitter, recipient.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod field;
pub mod filing;
pub mod record;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use confidence::Confidence;
pub use field::{FieldName, FieldSpec, ValueDomain, Vocabulary};
pub use record::{DocumentRecord, FieldValue, RunId};
pub use text::DocumentText;
pub use traits::{
    AnswerSchema, BackendQuery, BackendReply, ExtractionBackend, SchemaProperty, ToolCall,
};
