use async_trait::async_trait;
use serde_json::json;

use crate::{FinishReason, ProviderAdapter, Request, Response, Usage};
use lessonplan_types::GenerationError;

const PROVIDER: &str = "google";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Finish reasons that mean the candidate was withheld rather than completed.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "OTHER",
];

// ---------------------------------------------------------------------------
// GeminiAdapter
// ---------------------------------------------------------------------------

pub struct GeminiAdapter {
    /// `None` is accepted at construction; the first call reports it.
    api_key: Option<String>,
    client: reqwest::Client,
    base_url: String,
    default_model: String,
}

impl GeminiAdapter {
    pub fn new(api_key: String) -> Self {
        Self::with_optional_key(Some(api_key))
    }

    pub fn with_optional_key(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    fn build_request_body(&self, request: &Request) -> serde_json::Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
        });

        let mut gen_config = json!({});
        if let Some(mime) = &request.response_mime_type {
            gen_config["responseMimeType"] = json!(mime);
        }
        if let Some(schema) = &request.response_schema {
            gen_config["responseSchema"] = schema.clone();
        }
        if let Some(max_tokens) = request.max_tokens {
            gen_config["maxOutputTokens"] = json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            gen_config["temperature"] = json!(temp);
        }
        if gen_config.as_object().is_some_and(|o| !o.is_empty()) {
            body["generationConfig"] = gen_config;
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Response, GenerationError> {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(GenerationError::service(
                PROVIDER,
                format!("Response was blocked due to {reason}"),
            ));
        }

        // No candidates is not an error here: it yields empty text, which the
        // generator reports as an empty response.
        let candidate = json["candidates"].as_array().and_then(|c| c.first());

        let mut text = String::new();
        let mut finish_reason = FinishReason::Unspecified;

        if let Some(candidate) = candidate {
            if let Some(parts) = candidate["content"]["parts"].as_array() {
                for part in parts {
                    if let Some(t) = part["text"].as_str() {
                        text.push_str(t);
                    }
                }
            }

            finish_reason = match candidate["finishReason"].as_str() {
                Some("STOP") => FinishReason::EndTurn,
                Some("MAX_TOKENS") => FinishReason::MaxTokens,
                Some(r) if BLOCKING_FINISH_REASONS.contains(&r) => FinishReason::Blocked,
                _ => FinishReason::Unspecified,
            };

            if finish_reason == FinishReason::Blocked && text.is_empty() {
                let reason = candidate["finishReason"].as_str().unwrap_or("OTHER");
                return Err(GenerationError::service(
                    PROVIDER,
                    format!("Candidate was blocked due to {reason}"),
                ));
            }
        }

        let usage_meta = &json["usageMetadata"];
        let input_tokens = usage_meta["promptTokenCount"].as_u64().unwrap_or(0);
        let output_tokens = usage_meta["candidatesTokenCount"].as_u64().unwrap_or(0);
        let total_tokens = usage_meta["totalTokenCount"]
            .as_u64()
            .unwrap_or(input_tokens + output_tokens);

        Ok(Response {
            text,
            model: String::new(),
            usage: Usage {
                input_tokens,
                output_tokens,
                total_tokens,
            },
            finish_reason,
        })
    }
}

impl std::fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn map_error(status: reqwest::StatusCode, body: &str) -> GenerationError {
    let detail = extract_error_message(body);
    let message = match status.as_u16() {
        401 | 403 => format!("authentication failed (HTTP {}): {detail}", status.as_u16()),
        429 => format!("quota exceeded (HTTP 429): {detail}"),
        code => format!("HTTP {code}: {detail}"),
    };
    GenerationError::Service {
        provider: PROVIDER.into(),
        status: Some(status.as_u16()),
        message,
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// The request URL is dropped so the message is safe to show to the user.
fn transport_error(e: reqwest::Error) -> GenerationError {
    GenerationError::Service {
        provider: PROVIDER.into(),
        status: e.status().map(|s| s.as_u16()),
        message: e.without_url().to_string(),
    }
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    async fn complete(&self, request: &Request) -> Result<Response, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GenerationError::service(
                PROVIDER,
                "API key not configured; set GEMINI_API_KEY or GOOGLE_API_KEY",
            )
        })?;

        let body = self.build_request_body(request);
        let model = if request.model.is_empty() {
            &self.default_model
        } else {
            &request.model
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let response_body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %response_body, "Gemini request failed");
            return Err(map_error(status, &response_body));
        }

        let json: serde_json::Value = serde_json::from_str(&response_body).map_err(|e| {
            GenerationError::Service {
                provider: PROVIDER.into(),
                status: Some(status.as_u16()),
                message: format!("malformed generateContent envelope: {e}"),
            }
        })?;

        let mut response = self.parse_response(json)?;
        response.model = model.to_string();
        Ok(response)
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DynProvider, LESSON_PLAN_SCHEMA};

    fn make_schema_request() -> Request {
        Request::new("gemini-1.5-pro", "Generate a lesson plan table")
            .with_json_schema(LESSON_PLAN_SCHEMA.to_response_schema())
    }

    #[test]
    fn new_sets_defaults() {
        let adapter = GeminiAdapter::new("test-google-key".into());
        assert_eq!(adapter.api_key.as_deref(), Some("test-google-key"));
        assert_eq!(adapter.default_model, "gemini-1.5-pro");
        assert!(adapter.base_url.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn empty_key_is_treated_as_missing() {
        let adapter = GeminiAdapter::with_optional_key(Some(String::new()));
        assert!(adapter.api_key.is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_on_first_call() {
        let adapter = GeminiAdapter::with_optional_key(None);
        let err = adapter.complete(&make_schema_request()).await.unwrap_err();
        match err {
            GenerationError::Service { provider, message, .. } => {
                assert_eq!(provider, "google");
                assert!(message.contains("GEMINI_API_KEY"));
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[test]
    fn build_request_body_declares_json_schema() {
        let adapter = GeminiAdapter::new("test-key".into());
        let body = adapter.build_request_body(&make_schema_request());

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Generate a lesson plan table");

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "ARRAY");
        assert_eq!(
            config["responseSchema"]["items"]["required"],
            json!(["Duration", "Guide"])
        );
    }

    #[test]
    fn build_request_body_omits_empty_generation_config() {
        let adapter = GeminiAdapter::new("test-key".into());
        let body = adapter.build_request_body(&Request::new("m", "plain"));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn build_request_body_includes_sampling_options() {
        let adapter = GeminiAdapter::new("test-key".into());
        let mut req = make_schema_request();
        req.max_tokens = Some(2048);
        req.temperature = Some(0.5);

        let body = adapter.build_request_body(&req);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn parse_response_concatenates_parts() {
        let adapter = GeminiAdapter::new("test-key".into());
        let json = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "[{\"Duration\":" }, { "text": "\"5 min\"}]" }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 10,
                "candidatesTokenCount": 20,
                "totalTokenCount": 30
            }
        });

        let resp = adapter.parse_response(json).unwrap();
        assert_eq!(resp.text, "[{\"Duration\":\"5 min\"}]");
        assert_eq!(resp.finish_reason, FinishReason::EndTurn);
        assert_eq!(resp.usage.input_tokens, 10);
        assert_eq!(resp.usage.output_tokens, 20);
        assert_eq!(resp.usage.total_tokens, 30);
    }

    #[test]
    fn parse_response_without_candidates_is_empty_text() {
        let adapter = GeminiAdapter::new("test-key".into());
        let resp = adapter.parse_response(json!({ "candidates": [] })).unwrap();
        assert!(resp.text.is_empty());
        assert_eq!(resp.finish_reason, FinishReason::Unspecified);

        let resp = adapter.parse_response(json!({})).unwrap();
        assert!(resp.text.is_empty());
    }

    #[test]
    fn parse_response_blocked_prompt_is_service_error() {
        let adapter = GeminiAdapter::new("test-key".into());
        let err = adapter
            .parse_response(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error generating content: Response was blocked due to SAFETY"
        );
    }

    #[test]
    fn parse_response_blocked_candidate_is_service_error() {
        let adapter = GeminiAdapter::new("test-key".into());
        let err = adapter
            .parse_response(json!({
                "candidates": [{ "finishReason": "RECITATION" }]
            }))
            .unwrap_err();
        assert!(matches!(err, GenerationError::Service { .. }));
        assert!(err.to_string().contains("RECITATION"));
    }

    #[test]
    fn parse_response_max_tokens_keeps_partial_text() {
        let adapter = GeminiAdapter::new("test-key".into());
        let resp = adapter
            .parse_response(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "[{\"Dur" }] },
                    "finishReason": "MAX_TOKENS"
                }]
            }))
            .unwrap();
        assert_eq!(resp.finish_reason, FinishReason::MaxTokens);
        assert_eq!(resp.text, "[{\"Dur");
    }

    #[test]
    fn error_mapping_429_quota() {
        let err = map_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Resource has been exhausted"}}"#,
        );
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("Resource has been exhausted"));
    }

    #[test]
    fn error_mapping_403_auth() {
        let err = map_error(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"error": {"message": "API key not valid"}}"#,
        );
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("authentication failed"));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn error_mapping_falls_back_to_raw_body() {
        let err = map_error(reqwest::StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(
            err.to_string(),
            "Error generating content: HTTP 502: upstream unavailable"
        );
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let adapter =
            GeminiAdapter::new("key".into()).with_base_url("https://custom.example.com/".into());
        assert_eq!(adapter.base_url, "https://custom.example.com");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let adapter = GeminiAdapter::new("SUPERSECRETKEY123".into());
        let shown = format!("{adapter:?}");
        assert!(!shown.contains("SUPERSECRETKEY123"));
        assert!(shown.contains("<redacted>"));
        assert!(shown.contains("gemini-1.5-pro"));

        let keyless = format!("{:?}", GeminiAdapter::with_optional_key(None));
        assert!(keyless.contains("api_key: None"));
    }

    #[test]
    fn dyn_provider_wrapping_works() {
        let adapter = GeminiAdapter::new("test-key".into())
            .with_default_model("gemini-1.5-flash".into());
        let provider = DynProvider::new(adapter);
        assert_eq!(provider.name(), "google");
        assert_eq!(provider.default_model(), "gemini-1.5-flash");
    }
}
