//! # lumen-adapter-openai
//!
//! Reasoning adapter speaking the OpenAI chat completions API. The conflict
//! analyzer feeds it a prompt and expects JSON text back; model and endpoint
//! are configurable so any OpenAI-compatible server works.
//!
//! Without an API key the adapter reports itself unconfigured and the
//! analyzer never calls it.
//!
//! ## Dependency rule
//!
//! Depends on `lumen-app` (port traits) and `lumen-domain` only.

use std::future::Future;

use lumen_app::ports::ReasoningService;
use lumen_domain::error::{LumenError, ReasoningError};

/// Default model for conflict-analysis prompts.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API base, including the version segment.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Reasoning service backed by an OpenAI-compatible chat completions API.
pub struct OpenAiReasoning {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiReasoning {
    /// Create an adapter with the default model and endpoint. A `None` or
    /// blank key yields an unconfigured adapter.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the adapter at a different OpenAI-compatible server. The URL
    /// must include the version segment (e.g. `https://host/v1`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ReasoningService for OpenAiReasoning {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LumenError>> + Send {
        let request = self.api_key.as_ref().map(|key| {
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(key)
                .json(&request_body(&self.model, prompt))
        });

        async move {
            let Some(request) = request else {
                return Err(ReasoningError::NotConfigured.into());
            };

            let response = request
                .send()
                .await
                .map_err(|err| ReasoningError::Request(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(
                    ReasoningError::Request(format!("unexpected status {status}")).into(),
                );
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|err| ReasoningError::MalformedResponse(err.to_string()))?;
            let content = extract_content(&body)?;
            tracing::debug!(length = content.len(), "received reasoning response");
            Ok(content)
        }
    }
}

/// The chat completions request body for one conflict-analysis prompt.
///
/// Low temperature and forced JSON output keep responses parseable by the
/// analyzer's enhancement step.
fn request_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": "You are a smart home assistant specializing in schedule optimization.",
            },
            {
                "role": "user",
                "content": prompt,
            },
        ],
        "temperature": 0.3,
        "response_format": {"type": "json_object"},
    })
}

/// Pull `choices[0].message.content` out of a chat completions response.
fn extract_content(body: &serde_json::Value) -> Result<String, ReasoningError> {
    body.pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            ReasoningError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}
