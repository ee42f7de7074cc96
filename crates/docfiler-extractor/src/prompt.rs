//! Backend queries for single-field extraction

use docfiler_domain::{
    AnswerSchema, BackendQuery, Confidence, DocumentText, FieldSpec, SchemaProperty,
};

/// Argument carrying the model's justification
pub const REASONING_PROPERTY: &str = "reasoning";

/// Argument carrying the model's self-assessed confidence
pub const CONFIDENCE_PROPERTY: &str = "confidence";

/// Builds the query asking for one field of one document
pub struct PromptBuilder<'a> {
    spec: &'a FieldSpec,
    text: &'a DocumentText,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(spec: &'a FieldSpec, text: &'a DocumentText) -> Self {
        Self { spec, text }
    }

    /// Build the complete query: instruction, document and answer schema
    pub fn build(&self) -> BackendQuery {
        BackendQuery {
            prompt: self.prompt(),
            schema: self.schema(),
        }
    }

    fn prompt(&self) -> String {
        let field = self.spec.name();
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Extract the {} of this document. Think step by step to achieve the goal.\n",
            field
        ));
        prompt.push_str(&format!("{}: {}\n", field, self.spec.instruction()));
        prompt.push_str(&format!(
            "Answer by calling the `{}` tool.\n\n",
            self.spec.tool_name()
        ));

        prompt.push_str("### Document Content ###\n");
        prompt.push_str(self.text.as_str());
        prompt.push('\n');

        prompt
    }

    fn schema(&self) -> AnswerSchema {
        let field = self.spec.name();
        let confidence_values = Confidence::ALL
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        AnswerSchema {
            tool_name: self.spec.tool_name(),
            description: format!("Extract the {} of the document", field),
            properties: vec![
                SchemaProperty {
                    name: field.as_str().to_string(),
                    description: self.spec.instruction().to_string(),
                    allowed_values: self.spec.domain().allowed_values().map(<[String]>::to_vec),
                    required: true,
                },
                SchemaProperty {
                    name: REASONING_PROPERTY.to_string(),
                    description: format!("Why this {} was chosen, in one sentence", field),
                    allowed_values: None,
                    required: false,
                },
                SchemaProperty {
                    name: CONFIDENCE_PROPERTY.to_string(),
                    description: "How sure you are of the answer".to_string(),
                    allowed_values: Some(confidence_values),
                    required: false,
                },
            ],
        }
    }
}
