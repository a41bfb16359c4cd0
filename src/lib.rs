//! Greedy semantic navigation over Wikipedia's link graph.
//!
//! Starting from one article, the [`Navigator`] repeatedly fetches the current
//! page, ranks its internal links by embedding similarity to a target article
//! and follows the best one, until it reaches the target or runs out of steps.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod navigator;
pub mod parsers;
pub mod ranking;
pub mod results;
pub mod topics;
pub mod utils;

// Re-export commonly used types for convenience
pub use cache::PageCache;
pub use config::HopConfig;
pub use error::{ConfigError, EmbedError, FetchError, RankError};
pub use fetchers::{PageFetcher, WikiFetcher};
pub use navigator::Navigator;
pub use ranking::{Embedder, OpenAiEmbedder, SimilarityRanker};
pub use results::{Hop, Link, Navigation, Page, Termination};

/// Run one navigation with the HTTP-backed components described by `config`
pub async fn navigate(
    config: &HopConfig,
    start: &str,
    target: &str,
) -> Result<Navigation, ConfigError> {
    let navigator = Navigator::from_config(config)?;
    Ok(navigator.run(start, target).await)
}
