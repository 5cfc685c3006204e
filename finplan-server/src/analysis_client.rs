//! Analysis collaborator client
//!
//! The normalized request is POSTed as JSON to an external language-model
//! endpoint. The raw response is returned untouched apart from unwrapping
//! common chat-completion envelopes; coercion into a strict report happens
//! once, in `AnalysisReport::from_value`.

use async_trait::async_trait;
use finplan_common::NormalizedAnalysisRequest;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("finplan/", env!("CARGO_PKG_VERSION"));

/// Analysis client errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network communication error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Endpoint returned error response
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Failed to parse response JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Produces an analysis document for a normalized request
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: &NormalizedAnalysisRequest) -> Result<Value, AnalysisError>;
}

/// HTTP implementation talking to the configured endpoint
pub struct HttpAnalysisProvider {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAnalysisProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    async fn analyze(&self, request: &NormalizedAnalysisRequest) -> Result<Value, AnalysisError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            plan_type = %request.analysis_requirements.plan_type,
            "Requesting analysis"
        );

        let mut builder = self.http_client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ApiError(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::ParseError(e.to_string()))?;

        tracing::info!(endpoint = %self.endpoint, "Analysis response received");

        Ok(unwrap_envelope(body))
    }
}

/// Strip chat-completion envelopes down to the model's content
///
/// Handles `{"choices": [{"message": {"content": ...}}]}` and
/// `{"content": [{"type": "text", "text": ...}]}`; anything else is
/// returned as-is.
pub fn unwrap_envelope(body: Value) -> Value {
    if let Some(content) = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return Value::String(content.to_string());
    }

    if let Some(blocks) = body.get("content").and_then(Value::as_array) {
        let text: Vec<&str> = blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect();
        if !text.is_empty() {
            return Value::String(text.join("\n"));
        }
    }

    body
}
