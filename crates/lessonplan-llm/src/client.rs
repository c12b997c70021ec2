use tracing::Instrument;

use crate::{
    json_kind, DynProvider, GeminiAdapter, GeneratorConfig, ProviderAdapter, Request, Response,
    LESSON_PLAN_SCHEMA,
};
use lessonplan_types::{GenerationError, LessonPlanRequest, LessonPlanRow, LessonPlanTable};

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

pub trait Middleware: Send + Sync {
    fn before(&self, _request: &mut Request) {}
    fn after(&self, _request: &Request, _response: &mut Response) {}
}

// ---------------------------------------------------------------------------
// Built-in middleware: LoggingMiddleware
// ---------------------------------------------------------------------------

pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before(&self, request: &mut Request) {
        tracing::info!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            structured = request.response_schema.is_some(),
            "LLM request"
        );
    }

    fn after(&self, _request: &Request, response: &mut Response) {
        tracing::info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            text_len = response.text.len(),
            finish = ?response.finish_reason,
            "LLM response"
        );
    }
}

// ---------------------------------------------------------------------------
// Prompt / response shaping
// ---------------------------------------------------------------------------

/// The single instruction sent to the model. Fields are embedded verbatim.
pub fn build_prompt(request: &LessonPlanRequest) -> String {
    format!(
        "Generate a lesson plan table for the following: Topic: {}, Grade: {}, Subject: {}, Sub-units: {}. Provide Duration, Guide, and Remarks.",
        request.topic, request.grade, request.subject, request.sub_units
    )
}

/// Turn the model's raw text into a table.
///
/// Empty text, invalid JSON and non-array JSON are distinct errors. Array
/// elements never fail: missing fields become empty cells.
pub fn parse_table(text: &str) -> Result<LessonPlanTable, GenerationError> {
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        tracing::error!(raw = %text, error = %e, "Failed to parse JSON response");
        GenerationError::Parse {
            message: e.to_string(),
        }
    })?;

    let elements = value.as_array().ok_or_else(|| {
        tracing::warn!(found = json_kind(&value), "Response is not a JSON array");
        GenerationError::Shape {
            found: json_kind(&value).to_string(),
        }
    })?;

    let rows = elements
        .iter()
        .map(|element| {
            let mut cells = LESSON_PLAN_SCHEMA.extract_cells(element).into_iter();
            LessonPlanRow {
                duration: cells.next().unwrap_or_default(),
                guide: cells.next().unwrap_or_default(),
                remarks: cells.next().unwrap_or_default(),
            }
        })
        .collect();

    Ok(LessonPlanTable::new(rows))
}

// ---------------------------------------------------------------------------
// LessonPlanGenerator
// ---------------------------------------------------------------------------

pub struct LessonPlanGenerator {
    provider: DynProvider,
    model: String,
    temperature: Option<f32>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl LessonPlanGenerator {
    pub fn new(provider: impl ProviderAdapter + 'static) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider: DynProvider::new(provider),
            model,
            temperature: None,
            middleware: Vec::new(),
        }
    }

    /// Gemini-backed generator with request logging.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut adapter = GeminiAdapter::with_optional_key(config.api_key.clone())
            .with_default_model(config.model.clone());
        if let Some(url) = &config.base_url {
            adapter = adapter.with_base_url(url.clone());
        }

        let mut generator = Self::new(adapter).with_middleware(LoggingMiddleware);
        generator.temperature = config.temperature;
        generator
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_middleware(mut self, m: impl Middleware + 'static) -> Self {
        self.middleware.push(Box::new(m));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// One prompt, one call, no retries.
    pub async fn generate(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlanTable, GenerationError> {
        let span = tracing::info_span!(
            "generate_lesson_plan",
            request_id = %uuid::Uuid::new_v4(),
            provider = self.provider.name(),
        );

        self.generate_inner(request).instrument(span).await
    }

    async fn generate_inner(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlanTable, GenerationError> {
        let mut req = Request::new(self.model.clone(), build_prompt(request))
            .with_json_schema(LESSON_PLAN_SCHEMA.to_response_schema());
        req.temperature = self.temperature;

        for m in &self.middleware {
            m.before(&mut req);
        }

        let mut resp = self.provider.complete(&req).await.map_err(|e| {
            tracing::warn!(error = %e, "generation call failed");
            e
        })?;

        for m in &self.middleware {
            m.after(&req, &mut resp);
        }

        let table = parse_table(&resp.text)?;
        tracing::info!(rows = table.len(), "lesson plan generated");
        Ok(table)
    }
}

impl std::fmt::Debug for LessonPlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonPlanGenerator")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
