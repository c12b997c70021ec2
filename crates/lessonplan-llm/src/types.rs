use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A single-turn structured generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    /// Empty means "use the provider's default model".
    pub model: String,
    pub prompt: String,
    pub response_mime_type: Option<String>,
    pub response_schema: Option<serde_json::Value>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Request {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Ask for `application/json` output conforming to `schema`.
    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_mime_type = Some("application/json".into());
        self.response_schema = Some(schema);
        self
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Generated text, concatenated across parts. May be empty.
    pub text: String,
    pub model: String,
    pub usage: Usage,
    pub finish_reason: FinishReason,
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

// ---------------------------------------------------------------------------
// FinishReason
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    EndTurn,
    MaxTokens,
    Blocked,
    Unspecified,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_new_has_no_output_constraints() {
        let req = Request::new("gemini-1.5-pro", "hello");
        assert_eq!(req.model, "gemini-1.5-pro");
        assert_eq!(req.prompt, "hello");
        assert!(req.response_mime_type.is_none());
        assert!(req.response_schema.is_none());
        assert!(req.temperature.is_none());
    }

    #[test]
    fn with_json_schema_sets_mime_type() {
        let req = Request::new("m", "p").with_json_schema(serde_json::json!({"type": "ARRAY"}));
        assert_eq!(req.response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(req.response_schema.unwrap()["type"], "ARRAY");
    }

    #[test]
    fn finish_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&FinishReason::MaxTokens).unwrap(),
            "\"max_tokens\""
        );
        let back: FinishReason = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(back, FinishReason::Blocked);
    }
}
