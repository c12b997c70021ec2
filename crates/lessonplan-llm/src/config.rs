use crate::gemini::DEFAULT_MODEL;

/// Environment-driven settings for the lesson plan generator.
///
/// | variable | meaning |
/// |----------|---------|
/// | `GEMINI_API_KEY` / `GOOGLE_API_KEY` | API credential (first non-empty wins) |
/// | `LESSONPLAN_MODEL` | model id, default `gemini-1.5-pro` |
/// | `LESSONPLAN_GEMINI_BASE_URL` | API base URL override |
/// | `LESSONPLAN_TEMPERATURE` | sampling temperature |
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            temperature: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let temperature = get("LESSONPLAN_TEMPERATURE").and_then(|raw| match raw.parse::<f32>() {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "ignoring unparsable LESSONPLAN_TEMPERATURE");
                None
            }
        });

        Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
            model: get("LESSONPLAN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("LESSONPLAN_GEMINI_BASE_URL"),
            temperature,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
