use thiserror::Error;

/// Why a page could not be retrieved.
///
/// The navigator treats both variants the same way (the run stops), but they
/// are kept apart so callers can tell a bad title from a flaky network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The title does not resolve to an existing article
    #[error("no article named {title:?}")]
    NotFound { title: String },

    /// Every attempt failed with a transient error
    #[error("{title:?} unavailable after {attempts} attempt(s): {reason}")]
    Unavailable {
        title: String,
        attempts: usize,
        reason: String,
    },
}

impl FetchError {
    /// Title the failed fetch was issued for
    pub fn title(&self) -> &str {
        match self {
            FetchError::NotFound { title } | FetchError::Unavailable { title, .. } => title,
        }
    }
}

/// Errors raised by an [`crate::ranking::Embedder`].
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("embedding service returned {got} vectors for {expected} inputs")]
    Count { expected: usize, got: usize },

    #[error("invalid embedding client configuration: {0}")]
    Config(String),
}

/// Errors raised while ranking candidates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("no candidates to rank")]
    NoCandidates,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding shape mismatch: {0}")]
    Shape(String),
}

impl From<EmbedError> for RankError {
    fn from(err: EmbedError) -> Self {
        RankError::Embedding(err.to_string())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to set up embedder: {0}")]
    Embedder(#[from] EmbedError),
}
