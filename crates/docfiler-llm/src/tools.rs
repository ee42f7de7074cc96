//! JSON rendering of answer schemas as function-calling tool definitions

use docfiler_domain::AnswerSchema;
use serde_json::{json, Map, Value};

/// Render an answer schema as an OpenAI/Ollama style tool definition
///
/// Every property is a string; closed properties carry an `enum` listing
/// exactly the allowed values.
///
/// # Examples
///
/// ```
/// use docfiler_domain::{AnswerSchema, SchemaProperty};
/// use docfiler_llm::tool_definition;
///
/// let schema = AnswerSchema {
///     tool_name: "extract_type".to_string(),
///     description: "Classify the document".to_string(),
///     properties: vec![SchemaProperty {
///         name: "type".to_string(),
///         description: "Document type".to_string(),
///         allowed_values: Some(vec!["facture".to_string(), "devis".to_string()]),
///         required: true,
///     }],
/// };
///
/// let tool = tool_definition(&schema);
/// assert_eq!(tool["function"]["name"], "extract_type");
/// assert_eq!(tool["function"]["parameters"]["properties"]["type"]["enum"][1], "devis");
/// ```
pub fn tool_definition(schema: &AnswerSchema) -> Value {
    let mut properties = Map::new();
    for property in &schema.properties {
        let mut definition = json!({
            "type": "string",
            "description": property.description,
        });
        if let Some(values) = &property.allowed_values {
            definition["enum"] = json!(values);
        }
        properties.insert(property.name.clone(), definition);
    }

    json!({
        "type": "function",
        "function": {
            "name": schema.tool_name,
            "description": schema.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": schema.required_names(),
            },
        },
    })
}
