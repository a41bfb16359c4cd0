use crate::error::FetchError;
use crate::results::Page;
use async_trait::async_trait;

/// Base trait for anything that can turn an article title into a [`Page`]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieve the article named `title`.
    ///
    /// Implementations do not cache; see [`crate::cache::PageCache`].
    async fn fetch(&self, title: &str) -> Result<Page, FetchError>;
}
