//! Strict decoding of backend replies into field values

use crate::error::AttemptError;
use crate::prompt::{CONFIDENCE_PROPERTY, REASONING_PROPERTY};
use crate::types::ExtractionAttempt;
use docfiler_domain::{BackendReply, Confidence, FieldSpec, FieldValue};
use serde_json::{Map, Value};

/// Longest excerpt of a non-answer kept in diagnostics
const EXCERPT_CHARS: usize = 120;

/// Decode a reply for `spec` into a typed attempt
///
/// The reply must call the field's tool with a JSON object holding exactly
/// the field, and optionally `reasoning` and `confidence`, all as strings.
/// Closed fields must name one of the allowed values verbatim.
pub fn decode_reply(spec: &FieldSpec, reply: &BackendReply) -> ExtractionAttempt {
    let tool_name = spec.tool_name();
    let call = reply
        .find_tool_call(&tool_name)
        .ok_or_else(|| no_structured_answer(&tool_name, reply))?;

    let arguments = parse_arguments(&call.arguments)?;
    decode_arguments(spec, &arguments)
}

fn no_structured_answer(tool_name: &str, reply: &BackendReply) -> AttemptError {
    if let Some(other) = reply.tool_calls.first() {
        return AttemptError::NoStructuredAnswer(format!(
            "expected a call to '{}', got '{}'",
            tool_name, other.name
        ));
    }
    match reply.content.as_deref() {
        Some(text) => AttemptError::NoStructuredAnswer(format!(
            "model replied in free text: {}",
            excerpt(text)
        )),
        None => AttemptError::NoStructuredAnswer("empty reply".to_string()),
    }
}

/// Parse raw arguments into a JSON object
///
/// Some backends send the object as a JSON-encoded string; that one extra
/// level is unwrapped. Nothing else is coerced.
fn parse_arguments(raw: &str) -> Result<Map<String, Value>, AttemptError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| AttemptError::SchemaViolation(format!("arguments are not JSON: {}", e)))?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(inner.trim()).map_err(|e| {
            AttemptError::SchemaViolation(format!("arguments string is not JSON: {}", e))
        })?,
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(AttemptError::SchemaViolation(format!(
            "arguments must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn decode_arguments(spec: &FieldSpec, arguments: &Map<String, Value>) -> ExtractionAttempt {
    let field = spec.name().as_str();

    let known = [field, REASONING_PROPERTY, CONFIDENCE_PROPERTY];
    if let Some(unknown) = arguments.keys().find(|key| !known.contains(&key.as_str())) {
        return Err(AttemptError::SchemaViolation(format!(
            "unexpected argument '{}'",
            unknown
        )));
    }

    let value = match arguments.get(field) {
        Some(Value::String(value)) => value.trim(),
        Some(other) => {
            return Err(AttemptError::SchemaViolation(format!(
                "'{}' must be a string, got {}",
                field,
                json_kind(other)
            )))
        }
        None => {
            return Err(AttemptError::SchemaViolation(format!(
                "missing required argument '{}'",
                field
            )))
        }
    };

    if value.is_empty() {
        return Err(AttemptError::SchemaViolation(format!("'{}' is empty", field)));
    }
    if !spec.domain().admits(value) {
        let allowed = spec
            .domain()
            .allowed_values()
            .map(|values| values.join(", "))
            .unwrap_or_default();
        return Err(AttemptError::SchemaViolation(format!(
            "'{}' is not an allowed {} (one of: {})",
            value, field, allowed
        )));
    }

    let reasoning = optional_string(arguments, REASONING_PROPERTY)?;
    let confidence = match optional_string(arguments, CONFIDENCE_PROPERTY)? {
        Some(raw) => Some(Confidence::parse(&raw).ok_or_else(|| {
            AttemptError::SchemaViolation(format!(
                "'{}' is not a confidence level (high, medium, low)",
                raw
            ))
        })?),
        None => None,
    };

    Ok(FieldValue {
        value: value.to_string(),
        reasoning,
        confidence,
    })
}

/// An optional string argument; `null` counts as absent, blank as absent
fn optional_string(
    arguments: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, AttemptError> {
    match arguments.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(other) => Err(AttemptError::SchemaViolation(format!(
            "'{}' must be a string, got {}",
            name,
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(EXCERPT_CHARS).collect();
    cut.push('…');
    cut
}
