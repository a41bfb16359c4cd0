//! Text embedding clients.

use crate::config::EmbeddingConfig;
use crate::error::EmbedError;
use crate::utils::exponential_backoff;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maps a batch of texts to fixed-dimensional vectors.
///
/// Implementations must return one vector per input, in input order, and use
/// the same model for every call so scores stay comparable.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Embeddings client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
    max_retries: usize,
    backoff: Duration,
}

impl OpenAiEmbedder {
    /// Builds a client from configuration.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbedError> {
        if config.model.trim().is_empty() {
            return Err(EmbedError::Config("missing embedding model name".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key() {
            let auth = HeaderValue::from_str(&format!("Bearer {}", key.trim()))
                .map_err(|_| EmbedError::Config("invalid API key".to_string()))?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            dimensions: config.dimensions,
            max_retries: config.max_retries.max(1),
            backoff: Duration::from_millis(500),
        })
    }

    /// Override the base retry delay.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn is_retryable_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_body() || err.is_request()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
            dimensions: self.dimensions,
        };

        let mut attempt = 0usize;
        loop {
            attempt += 1;
            let retries_left = attempt < self.max_retries;

            match self.client.post(&self.endpoint).json(&request).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let mut parsed: EmbeddingResponse = resp.json().await?;
                        parsed.data.sort_by_key(|entry| entry.index);
                        if parsed.data.len() != inputs.len() {
                            return Err(EmbedError::Count {
                                expected: inputs.len(),
                                got: parsed.data.len(),
                            });
                        }
                        return Ok(parsed.data.into_iter().map(|e| e.embedding).collect());
                    }

                    let body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if Self::should_retry(status) && retries_left {
                        ::log::warn!("Embedding request returned {}, retrying", status);
                        tokio::time::sleep(exponential_backoff(self.backoff, attempt)).await;
                        continue;
                    }
                    return Err(EmbedError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(err) => {
                    if Self::is_retryable_error(&err) && retries_left {
                        ::log::warn!("Embedding request failed: {}, retrying", err);
                        tokio::time::sleep(exponential_backoff(self.backoff, attempt)).await;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> EmbeddingConfig {
        EmbeddingConfig {
            base_url: format!("{}/v1/", server.uri()),
            model: "test-model".to_string(),
            max_retries: 2,
            ..EmbeddingConfig::default()
        }
    }

    fn inputs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_embed_orders_by_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({ "model": "test-model", "input": ["a", "b"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0] },
                    { "index": 0, "embedding": [1.0, 0.0] }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&config(&server)).unwrap();
        let vectors = embedder.embed(&inputs(&["a", "b"])).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&config(&server)).unwrap();
        assert!(embedder.embed(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "index": 0, "embedding": [0.5, 0.5] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&config(&server))
            .unwrap()
            .with_backoff(Duration::from_millis(1));
        let vectors = embedder.embed(&inputs(&["a"])).await.unwrap();
        assert_eq!(vectors.len(), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad model"))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&config(&server)).unwrap();
        match embedder.embed(&inputs(&["a"])).await {
            Err(EmbedError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad model");
            }
            other => panic!("expected status error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[tokio::test]
    async fn test_count_mismatch_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "index": 0, "embedding": [1.0] }]
            })))
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&config(&server)).unwrap();
        assert!(matches!(
            embedder.embed(&inputs(&["a", "b"])).await,
            Err(EmbedError::Count {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_missing_model_is_rejected() {
        let config = EmbeddingConfig {
            model: " ".to_string(),
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            OpenAiEmbedder::new(&config),
            Err(EmbedError::Config(_))
        ));
    }
}
