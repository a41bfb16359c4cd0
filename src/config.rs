use crate::error::ConfigError;
use crate::filter::LinkFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for talking to the encyclopedia
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// MediaWiki action API endpoint used for metadata lookups
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Sent as `User-Agent` on every request; unidentified clients may be rejected
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per fetch before giving up
    #[serde(default = "default_retries")]
    pub retries: usize,

    /// Base backoff in milliseconds, multiplied by the attempt number
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Article prefix, disambiguation marker and extra exclude patterns
    #[serde(default)]
    pub links: LinkFilterConfig,
}

/// Configuration for the embedding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API (`/embeddings` is appended)
    #[serde(default = "default_embedding_url")]
    pub base_url: String,

    /// Model name passed through to the service
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key, if the service needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_embedding_retries")]
    pub max_retries: usize,
}

/// Top-level configuration for a navigation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopConfig {
    #[serde(default)]
    pub wiki: WikiConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Maximum number of greedy steps
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Stop as soon as the greedy choice lands on an already visited title.
    /// Off by default; enabling it changes the reported path.
    #[serde(default)]
    pub stop_on_revisit: bool,
}

impl HopConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

impl Default for HopConfig {
    fn default() -> Self {
        Self {
            wiki: WikiConfig::default(),
            embedding: EmbeddingConfig::default(),
            max_steps: default_max_steps(),
            stop_on_revisit: false,
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
            links: LinkFilterConfig::default(),
        }
    }
}

impl WikiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_url(),
            model: default_model(),
            api_key_env: None,
            dimensions: None,
            timeout_secs: default_embedding_timeout_secs(),
            max_retries: default_embedding_retries(),
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_api_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_user_agent() -> String {
    format!(
        "wiki-hop/{} (https://github.com/wiki-hop/wiki-hop)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_retries() -> usize {
    3
}

fn default_backoff_ms() -> u64 {
    1500
}

fn default_embedding_url() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_embedding_timeout_secs() -> u64 {
    60
}

fn default_embedding_retries() -> usize {
    3
}

fn default_max_steps() -> usize {
    10
}
