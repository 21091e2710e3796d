//! Completion request bundle and the one-field output schema.

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::ProviderError;
use super::safety::SafetySetting;

/// Everything a provider needs for one structured completion.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Prompt name, used for logging and as the JSON-schema name.
    pub name: String,
    /// Fully rendered instruction text.
    pub prompt: String,
    /// Structured input the prompt was rendered from.
    pub input: Value,
    pub output: OutputSchema,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety: Vec<SafetySetting>,
}

impl CompletionRequest {
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        input: Value,
        output: OutputSchema,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            input,
            output,
            safety: Vec::new(),
        }
    }

    pub fn with_safety(mut self, safety: Vec<SafetySetting>) -> Self {
        self.safety = safety;
        self
    }
}

/// An object schema with exactly one required string field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSchema {
    pub field: String,
    pub description: String,
}

impl OutputSchema {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self { field: field.into(), description: description.into() }
    }

    /// JSON Schema for `response_format`.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            self.field.clone(),
            json!({ "type": "string", "description": self.description }),
        );
        json!({
            "type": "object",
            "properties": properties,
            "required": [self.field],
            "additionalProperties": false,
        })
    }

    /// Wrap `text` in an object conforming to this schema.
    pub fn wrap(&self, text: impl Into<String>) -> Value {
        let mut obj = Map::new();
        obj.insert(self.field.clone(), Value::String(text.into()));
        Value::Object(obj)
    }

    /// Parse a raw model reply and pull out the required field.
    ///
    /// Markdown code fences around the JSON are tolerated. A blank value is an
    /// `Output` error, so an empty reply takes the caller's fallback path.
    pub fn extract(&self, raw: &str) -> Result<String, ProviderError> {
        let body = strip_fences(raw.trim());
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::Output(format!("reply is not a JSON object: {e}")))?;

        let field = value
            .get(&self.field)
            .ok_or_else(|| ProviderError::Output(format!("missing field '{}'", self.field)))?;
        let text = field
            .as_str()
            .ok_or_else(|| ProviderError::Output(format!("field '{}' is not a string", self.field)))?
            .trim();

        if text.is_empty() {
            return Err(ProviderError::Output(format!("field '{}' is empty", self.field)));
        }
        Ok(text.to_string())
    }
}

fn strip_fences(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
