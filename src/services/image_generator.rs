//! Image generation collaborator.
//!
//! The service only needs one capability from an image backend: turn a prompt
//! into a locator (URL or path) for the rendered image. Backends are chosen
//! at startup from `IMAGE_PROVIDER`.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ImageProvider};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("image API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Request(e.to_string())
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync + fmt::Debug {
    /// Render `prompt` and return a locator for the stored image.
    async fn generate(&self, prompt: &str, diary_id: i64) -> Result<String, GenerationError>;

    fn provider_name(&self) -> &'static str;
}

pub fn create_generator(config: &Config) -> Result<Box<dyn ImageGenerator>, GenerationError> {
    match config.image_provider {
        ImageProvider::Fake => Ok(Box::new(FakeImageGenerator::default())),
        ImageProvider::Http => {
            if config.image_api_key.is_empty() {
                return Err(GenerationError::NotConfigured(
                    "IMAGE_API_KEY not set".to_string(),
                ));
            }
            HttpImageGenerator::new(
                config.image_api_url.clone(),
                config.image_api_key.clone(),
                config.image_model.clone(),
                config.image_timeout(),
            )
            .map(|g| Box::new(g) as Box<dyn ImageGenerator>)
        }
    }
}

// ============================================================================
// HTTP backend (OpenAI-compatible images endpoint)
// ============================================================================

pub struct HttpImageGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for HttpImageGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpImageGenerator")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HttpImageGenerator {
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(&self, prompt: &str, diary_id: i64) -> Result<String, GenerationError> {
        tracing::debug!(diary_id, model = %self.model, "Requesting flower image");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": prompt,
                "n": 1,
                "size": "1024x1024",
                "user": format!("diary-{}", diary_id),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, message });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        extract_image_url(&body)
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}

/// Pull `data[0].url` out of an images API response.
fn extract_image_url(body: &serde_json::Value) -> Result<String, GenerationError> {
    body["data"][0]["url"]
        .as_str()
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GenerationError::MalformedResponse("missing data[0].url".to_string()))
}

// ============================================================================
// Fake backend
// ============================================================================

#[derive(Debug, Clone)]
pub enum FakeBehavior {
    Succeed,
    #[cfg(test)]
    Fail(String),
    /// Never completes; exercises the caller's timeout.
    #[cfg(test)]
    Hang,
}

/// Deterministic generator for local development and tests.
#[derive(Debug)]
pub struct FakeImageGenerator {
    behavior: FakeBehavior,
    calls: AtomicUsize,
}

impl Default for FakeImageGenerator {
    fn default() -> Self {
        Self::new(FakeBehavior::Succeed)
    }
}

impl FakeImageGenerator {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
impl FakeImageGenerator {
    pub fn failing(message: &str) -> Self {
        Self::new(FakeBehavior::Fail(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(&self, _prompt: &str, diary_id: i64) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            FakeBehavior::Succeed => Ok(format!(
                "fake://flowers/diary_{}_{}.png",
                diary_id,
                uuid::Uuid::new_v4().simple()
            )),
            #[cfg(test)]
            FakeBehavior::Fail(message) => Err(GenerationError::Request(message.clone())),
            #[cfg(test)]
            FakeBehavior::Hang => std::future::pending().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_url() {
        let body = serde_json::json!({ "data": [{ "url": "https://cdn.example/flower.png" }] });
        assert_eq!(extract_image_url(&body).unwrap(), "https://cdn.example/flower.png");
    }

    #[test]
    fn test_extract_image_url_rejects_malformed() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({ "data": [] }),
            serde_json::json!({ "data": [{ "b64_json": "..." }] }),
            serde_json::json!({ "data": [{ "url": "" }] }),
        ] {
            assert!(matches!(
                extract_image_url(&body),
                Err(GenerationError::MalformedResponse(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_fake_generator_locator_mentions_diary() {
        let generator = FakeImageGenerator::default();
        let url = generator.generate("prompt", 42).await.unwrap();
        assert!(url.starts_with("fake://flowers/diary_42_"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_fake_generator_can_fail() {
        let generator = FakeImageGenerator::failing("quota exceeded");
        let err = generator.generate("prompt", 1).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    /// Serve `app` on an ephemeral port and point an HTTP generator at it.
    async fn http_generator_for(app: axum::Router) -> HttpImageGenerator {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        HttpImageGenerator::new(
            format!("http://{addr}/v1/images/generations"),
            "test-key".into(),
            "test-model".into(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_http_generator_returns_image_url() {
        let app = axum::Router::new().route(
            "/v1/images/generations",
            axum::routing::post(
                |headers: axum::http::HeaderMap, axum::Json(body): axum::Json<serde_json::Value>| async move {
                    assert_eq!(headers["authorization"], "Bearer test-key");
                    assert_eq!(body["prompt"], "a calm lotus");
                    assert_eq!(body["user"], "diary-7");
                    axum::Json(serde_json::json!({
                        "data": [{ "url": "https://cdn.example/flower.png?sig=abc" }]
                    }))
                },
            ),
        );
        let generator = http_generator_for(app).await;

        let url = generator.generate("a calm lotus", 7).await.unwrap();
        assert_eq!(url, "https://cdn.example/flower.png?sig=abc");
    }

    #[tokio::test]
    async fn test_http_generator_maps_error_status() {
        let app = axum::Router::new().route(
            "/v1/images/generations",
            axum::routing::post(|| async {
                (axum::http::StatusCode::TOO_MANY_REQUESTS, "rate limited")
            }),
        );
        let generator = http_generator_for(app).await;

        match generator.generate("prompt", 1).await {
            Err(GenerationError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_generator_rejects_non_json_body() {
        let app = axum::Router::new().route(
            "/v1/images/generations",
            axum::routing::post(|| async { "not json" }),
        );
        let generator = http_generator_for(app).await;

        assert!(matches!(
            generator.generate("prompt", 1).await,
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = GenerationError::Timeout(Duration::from_millis(50));
        assert_eq!(err.to_string(), "timed out after 50ms");
    }

    #[test]
    fn test_http_provider_requires_api_key() {
        let mut config = Config::for_tests();
        config.image_provider = ImageProvider::Http;
        assert!(matches!(
            create_generator(&config),
            Err(GenerationError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_fake_provider_from_config() {
        let generator = create_generator(&Config::for_tests()).unwrap();
        assert_eq!(generator.provider_name(), "fake");
    }
}
