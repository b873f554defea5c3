//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `{base_url}/models/{model}:generateContent` with the
//! API key in the `x-goog-api-key` header. Failures are classified from the
//! HTTP status and the structured Google error envelope, never from the
//! free-text message.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use visabot_core::llm::provider::LlmProvider;
use visabot_types::llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, Usage,
};

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleErrorEnvelope,
};

/// Google Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Default API root for the generative-language service.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new Gemini provider.
    ///
    /// Fails only if the HTTP client cannot be constructed (e.g. no TLS backend).
    pub fn new(api_key: SecretString, model: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full `generateContent` URL for `model`.
    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Convert a generic [`CompletionRequest`] into a [`GenerateContentRequest`].
    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| Content::text(Some(m.role.to_string()), m.content.clone()))
            .collect();

        let generation_config =
            if request.temperature.is_some() || request.max_output_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_output_tokens,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents,
            system_instruction: request
                .system
                .as_ref()
                .map(|s| Content::text(None, s.clone())),
            generation_config,
        }
    }

    /// Turn a successful response body into a [`CompletionResponse`].
    fn to_completion_response(
        resp: GenerateContentResponse,
        requested_model: &str,
    ) -> Result<CompletionResponse, LlmError> {
        let candidate = resp.candidates.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| p.thought != Some(true))
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(|r| r.parse().unwrap_or(FinishReason::Other))
            .unwrap_or(FinishReason::Stop);

        let usage = resp
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: resp.response_id,
            content,
            model: resp
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            finish_reason,
            usage,
        })
    }
}

/// Classify a non-success HTTP response.
///
/// Authentication is recognized by status (401/403), by canonical status
/// name, or by an `ErrorInfo` reason starting with `API_KEY` (Gemini reports
/// a bad key as 400 `API_KEY_INVALID`).
pub fn classify_error(status: StatusCode, retry_after_secs: Option<u64>, body: &str) -> LlmError {
    let envelope = serde_json::from_str::<GoogleErrorEnvelope>(body).ok();

    let api_key_reason = envelope
        .as_ref()
        .is_some_and(|e| e.error.reasons().any(|r| r.starts_with("API_KEY")));
    let canonical = envelope
        .as_ref()
        .map(|e| e.error.status.as_str())
        .unwrap_or_default();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || matches!(canonical, "UNAUTHENTICATED" | "PERMISSION_DENIED")
        || api_key_reason
    {
        return LlmError::AuthenticationFailed(format!("HTTP {status}: {message}"));
    }

    if status == StatusCode::TOO_MANY_REQUESTS || canonical == "RESOURCE_EXHAUSTED" {
        return LlmError::QuotaExceeded {
            retry_after_ms: retry_after_secs.map(|s| s.saturating_mul(1000)),
        };
    }

    LlmError::Provider {
        status: Some(status.as_u16()),
        message,
    }
}

/// Classify a transport-level failure (no HTTP response received).
fn classify_transport_error(e: &reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout {
            after_ms: GeminiProvider::CONNECT_TIMEOUT.as_millis() as u64,
        }
    } else {
        LlmError::Network(format!("HTTP request failed: {e}"))
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = self.to_gemini_request(request);
        let url = self.url(model);

        debug!(model, turns = body.contents.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, retry_after, &error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Self::to_completion_response(gemini_resp, model)
    }
}
