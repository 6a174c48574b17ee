use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Fallback returned when the service answers 2xx but the completion field
/// is missing. A soft failure: downstream steps always receive some string.
pub const NO_RESULT_FALLBACK: &str = "no result generated";

/// Configuration for the text-generation client.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// API base (e.g. "https://generativelanguage.googleapis.com/v1beta")
    pub endpoint: String,
    /// Service API key, sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model name (e.g. "gemini-2.0-flash")
    pub model: String,
    /// Request timeout (default: 120s)
    pub timeout: Duration,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl TextConfig {
    /// Create a config with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the API base endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Seam for single-turn text generation, so the pipeline can run against
/// the HTTP client or a test double.
pub trait TextService: Send + Sync {
    /// Send one free-form prompt and return the completion text.
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// HTTP client for a Gemini-style `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct TextClient {
    http: Client,
    config: TextConfig,
}

impl TextClient {
    pub fn new(config: TextConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl TextService for TextClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let url = self.url();
        let resp = self
            .http
            .post(&url)
            .timeout(self.config.timeout)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Connection {
                endpoint: url.clone(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status,
                body: body_text,
            });
        }

        let json: Value = resp.json().await.map_err(|e| Error::Connection {
            endpoint: url,
            message: format!("failed to parse response: {}", e),
        })?;

        Ok(first_candidate_text(&json)
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESULT_FALLBACK.to_string()))
    }
}

/// Extract the first candidate's completion text, if present.
fn first_candidate_text(json: &Value) -> Option<&str> {
    json.pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
}
