//! Image generation orchestration: one image per finalized scene, driven
//! sequentially with bounded retry, per-failure-class backoff, and
//! inter-scene pacing to stay under the image service's rate limit.

use crate::error::{Error, Result};
use crate::types::{Scene, SceneImage};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::{error, info, warn};

/// Configuration for the image-generation client.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Images API endpoint.
    pub endpoint: String,
    /// Service API key, sent as a bearer token.
    pub api_key: String,
    /// Image model name.
    pub model: String,
    /// Request timeout (default: 120s)
    pub timeout: Duration,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.together.xyz/v1/images/generations".to_string(),
            api_key: String::new(),
            model: "black-forest-labs/FLUX.1-schnell".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ImageConfig {
    /// Create a config with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the images API endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the image model name.
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

/// Retry and pacing policy for the orchestrator.
///
/// Defaults match the service limits this pipeline was tuned against:
/// 3 attempts per scene, 2s backoff on rate-limit/server statuses, 1.5s
/// backoff on transport failures, 3s between scenes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per scene (transient failures consume these).
    pub max_attempts: u32,
    /// Wait after HTTP 429 or 5xx before the next attempt.
    pub status_backoff: Duration,
    /// Wait after a transport-level failure before the next attempt.
    pub transport_backoff: Duration,
    /// Wait between consecutive scenes.
    pub pacing: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            status_backoff: Duration::from_millis(2000),
            transport_backoff: Duration::from_millis(1500),
            pacing: Duration::from_millis(3000),
        }
    }
}

impl RetryPolicy {
    /// Set the total attempts per scene.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the backoff after rate-limit/server statuses.
    pub fn with_status_backoff(mut self, backoff: Duration) -> Self {
        self.status_backoff = backoff;
        self
    }

    /// Set the backoff after transport failures.
    pub fn with_transport_backoff(mut self, backoff: Duration) -> Self {
        self.transport_backoff = backoff;
        self
    }

    /// Set the pause between consecutive scenes.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

/// Seam for single-image generation, so the orchestrator can run against
/// the HTTP client or a test double.
///
/// `Ok(Some(url))` is a generated image; `Ok(None)` is a success status
/// whose body carried no URL.
pub trait ImageService: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}

/// HTTP client for an OpenAI-style images API.
#[derive(Debug, Clone)]
pub struct ImageClient {
    http: Client,
    config: ImageConfig,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl ImageClient {
    pub fn new(config: ImageConfig) -> Self {
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
}

impl ImageService for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let body = json!({
            "model": self.config.model,
            "prompt": prompt,
            "n": 1,
        });

        let resp = self
            .http
            .post(&self.config.endpoint)
            .timeout(self.config.timeout)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Connection {
                endpoint: self.config.endpoint.clone(),
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

        let parsed: ImagesResponse = resp.json().await.map_err(|e| Error::Connection {
            endpoint: self.config.endpoint.clone(),
            message: format!("failed to parse response: {}", e),
        })?;

        Ok(parsed.data.into_iter().next().and_then(|d| d.url))
    }
}

/// Whether a status warrants a retry: rate limiting or a server error.
fn is_transient(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Default style directive prefixed to every scene prompt.
pub const DEFAULT_STYLE_PREFIX: &str = "3d image of ";

/// Sequential image-generation orchestrator.
///
/// Scenes are processed strictly one at a time — pacing correctness
/// depends on it. A scene that exhausts its retry budget is recorded with
/// `url: None` and the batch moves on; partial results are the expected
/// terminal state when the service misbehaves, not an error.
#[derive(Debug, Clone)]
pub struct ImageGenerator<S> {
    service: S,
    retry: RetryPolicy,
    style_prefix: String,
    cancellation: Option<Arc<AtomicBool>>,
}

impl<S: ImageService> ImageGenerator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            retry: RetryPolicy::default(),
            style_prefix: DEFAULT_STYLE_PREFIX.to_string(),
            cancellation: None,
        }
    }

    /// Override the retry/pacing policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the style directive prefixed to every scene prompt.
    pub fn with_style_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.style_prefix = prefix.into();
        self
    }

    /// Set a cancellation flag checked between scenes.
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(cancel);
        self
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    fn check_cancelled(&self) -> Result<()> {
        if let Some(ref cancel) = self.cancellation {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }
        Ok(())
    }

    /// Generate one image per scene, in order.
    ///
    /// The only error is [`Error::Cancelled`]; individual scene failures
    /// surface as `url: None` entries in the (still index-aligned) output.
    pub async fn generate_batch(&self, scenes: &[Scene]) -> Result<Vec<SceneImage>> {
        self.generate_batch_with_progress(scenes, |_, _| {}).await
    }

    /// Like [`generate_batch`](Self::generate_batch), invoking the callback
    /// with `(scene_index, total)` as each scene starts.
    pub async fn generate_batch_with_progress<F>(
        &self,
        scenes: &[Scene],
        mut on_progress: F,
    ) -> Result<Vec<SceneImage>>
    where
        F: FnMut(usize, usize),
    {
        let total = scenes.len();
        let mut results = Vec::with_capacity(total);

        for (i, scene) in scenes.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.retry.pacing).await;
            }
            self.check_cancelled()?;
            on_progress(scene.index, total);
            results.push(self.generate_scene(scene).await);
        }

        Ok(results)
    }

    /// Drive the retry loop for a single scene.
    async fn generate_scene(&self, scene: &Scene) -> SceneImage {
        let prompt = format!("{}{}", self.style_prefix, scene.prompt);
        let mut attempts = 0;
        let mut url = None;

        while attempts < self.retry.max_attempts && url.is_none() {
            attempts += 1;
            match self.service.generate(&prompt).await {
                Ok(Some(u)) => {
                    info!("scene {} image generated on attempt {}", scene.index, attempts);
                    url = Some(u);
                }
                Ok(None) => {
                    // success status, no URL in the body — burn the attempt
                    warn!("scene {} response carried no image URL", scene.index);
                }
                Err(Error::Upstream { status, .. }) if is_transient(status) => {
                    warn!(
                        "scene {} got HTTP {}, retrying after backoff",
                        scene.index, status
                    );
                    tokio::time::sleep(self.retry.status_backoff).await;
                }
                Err(Error::Connection { message, .. }) => {
                    warn!(
                        "scene {} transport failure ({}), retrying after backoff",
                        scene.index, message
                    );
                    tokio::time::sleep(self.retry.transport_backoff).await;
                }
                Err(e) => {
                    // request rejected outright — retrying cannot fix it
                    error!("scene {} failed permanently: {}", scene.index, e);
                    break;
                }
            }
        }

        if url.is_none() {
            error!(
                "scene {} exhausted {} attempt(s) without an image",
                scene.index, attempts
            );
        }

        SceneImage {
            scene: scene.clone(),
            url,
            attempts,
        }
    }
}
