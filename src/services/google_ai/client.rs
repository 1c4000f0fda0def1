use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::errors::{GoogleAiError, RetryError};
use super::models::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, Content, EmbedContentRequest,
    GenerateContentRequest, GenerateContentResponse, GeneratedText,
};
use super::retry::{with_retry, RetryConfig};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash-lite";

/// The batch embedding endpoint accepts at most this many texts per call
const MAX_EMBED_BATCH: usize = 100;

#[derive(Debug, Clone)]
pub struct GoogleAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for GoogleAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_GENERATION_MODEL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }
}

impl GoogleAiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn validate(&self) -> Result<(), GoogleAiError> {
        if self.api_key.is_empty() {
            return Err(GoogleAiError::ConfigurationError {
                message: "Google AI API key is required".to_string(),
            });
        }

        if self.base_url.is_empty() {
            return Err(GoogleAiError::ConfigurationError {
                message: "Base URL cannot be empty".to_string(),
            });
        }

        if self.model.is_empty() {
            return Err(GoogleAiError::ConfigurationError {
                message: "Model name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP client for the Generative Language API
///
/// Covers `generateContent` for explanations and `batchEmbedContents` for
/// embeddings. Every call goes through the retry handler.
#[derive(Clone)]
pub struct GoogleAiClient {
    config: GoogleAiConfig,
    client: Client,
}

impl GoogleAiClient {
    pub fn new(config: GoogleAiConfig) -> Result<Self, GoogleAiError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GoogleAiError::ConfigurationError {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GoogleAiConfig {
        &self.config
    }

    fn retry_config(&self) -> RetryConfig {
        let attempts = u32::try_from(self.config.max_retries.saturating_add(1)).unwrap_or(u32::MAX);
        RetryConfig::with_retries(self.config.max_retries)
            .with_total_timeout(self.config.timeout.saturating_mul(attempts))
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout.as_millis() as u64
    }

    fn unwrap_retry(&self, retry_error: RetryError) -> GoogleAiError {
        match retry_error {
            RetryError::NonRetryable { source } => source,
            RetryError::MaxAttemptsExceeded { source, .. } => source,
            RetryError::TimeoutExceeded => GoogleAiError::Timeout {
                timeout_ms: self.timeout_ms(),
            },
        }
    }

    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GoogleAiError> {
        with_retry(self.retry_config(), || {
            self.generate_content_once(request.clone())
        })
        .await
        .map_err(|retry_error| self.unwrap_retry(retry_error))
    }

    async fn generate_content_once(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GoogleAiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response: GenerateContentResponse = self.post_json(&url, &request).await?;

        response.validate().map_err(|message| {
            if message.contains("safety") {
                GoogleAiError::ContentBlocked
            } else {
                GoogleAiError::InvalidResponse { message }
            }
        })?;

        Ok(response)
    }

    /// Embed every text with `model`, preserving input order
    pub async fn embed_contents(
        &self,
        model: &str,
        texts: &[String],
        task_type: Option<&str>,
    ) -> Result<Vec<Vec<f32>>, GoogleAiError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(MAX_EMBED_BATCH) {
            let request = BatchEmbedContentsRequest {
                requests: chunk
                    .iter()
                    .map(|text| EmbedContentRequest {
                        model: format!("models/{model}"),
                        content: Content::text(text.clone()),
                        task_type: task_type.map(str::to_string),
                    })
                    .collect(),
            };

            let response = with_retry(self.retry_config(), || {
                self.batch_embed_once(model, &request)
            })
            .await
            .map_err(|retry_error| self.unwrap_retry(retry_error))?;

            if response.embeddings.len() != chunk.len() {
                return Err(GoogleAiError::InvalidResponse {
                    message: format!(
                        "Expected {} embeddings, received {}",
                        chunk.len(),
                        response.embeddings.len()
                    ),
                });
            }

            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(embeddings)
    }

    async fn batch_embed_once(
        &self,
        model: &str,
        request: &BatchEmbedContentsRequest,
    ) -> Result<BatchEmbedContentsResponse, GoogleAiError> {
        let url = format!(
            "{}/models/{}:batchEmbedContents",
            self.config.base_url, model
        );
        self.post_json(&url, request).await
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, GoogleAiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(url = url, "POST Google AI");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GoogleAiError::from_reqwest_error(e, self.timeout_ms()))?;

        self.handle_response(response).await
    }

    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<R, GoogleAiError> {
        let status = response.status();

        if status.is_success() {
            let response_text = response
                .text()
                .await
                .map_err(|e| GoogleAiError::from_reqwest_error(e, self.timeout_ms()))?;

            serde_json::from_str(&response_text).map_err(|e| GoogleAiError::ParseError {
                message: format!("Failed to parse response: {e}"),
            })
        } else {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            Err(GoogleAiError::from_response_parts(
                status,
                retry_after.as_deref(),
                &error_body,
            ))
        }
    }

    /// One prompt in, the first candidate's text out
    pub async fn generate_text(&self, prompt: String) -> Result<GeneratedText, GoogleAiError> {
        let response = self
            .generate_content(GenerateContentRequest::new(prompt))
            .await?;

        let text = response
            .extract_text()
            .ok_or_else(|| GoogleAiError::InvalidResponse {
                message: "No text content in response".to_string(),
            })?;

        Ok(GeneratedText {
            text,
            usage: response.usage_metadata.clone(),
            model_used: Some(self.config.model.clone()),
            finish_reason: response.get_finish_reason(),
        })
    }

    /// Single unretried request, used to reject bad credentials before a run
    pub async fn test_connection(&self) -> Result<(), GoogleAiError> {
        let mut ping = GenerateContentRequest::new("ping".to_string());
        if let Some(config) = ping.generation_config.as_mut() {
            config.max_output_tokens = Some(1);
        }
        self.generate_content_once(ping).await?;
        Ok(())
    }
}
