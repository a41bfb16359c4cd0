use crate::error::FetchError;
use crate::fetchers::PageFetcher;
use crate::results::Page;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoizes fetch results for the lifetime of one navigation run.
///
/// Pages are stored under their canonical title, and every requested title
/// that resolved to them is kept as an alias, so link-text variants of the
/// same article share one entry. Failures are remembered under the requested
/// title and are not retried within the run.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: HashMap<String, Arc<Page>>,
    aliases: HashMap<String, String>,
    failures: HashMap<String, FetchError>,
    hits: usize,
    misses: usize,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached entry for `title`, fetching it on first use
    pub async fn get<F>(&mut self, title: &str, fetcher: &F) -> Result<Arc<Page>, FetchError>
    where
        F: PageFetcher + ?Sized,
    {
        if let Some(cached) = self.lookup(title) {
            self.hits += 1;
            ::log::debug!("Cache hit for {:?}", title);
            return cached;
        }

        self.misses += 1;
        ::log::debug!("Cache miss for {:?}", title);

        match fetcher.fetch(title).await {
            Ok(page) => {
                let page = Arc::new(page);
                // Store under the canonical title, aliasing the requested one
                let canonical = page.title.clone();
                if canonical != title {
                    self.aliases.insert(title.to_string(), canonical.clone());
                }
                self.pages.insert(canonical, Arc::clone(&page));
                Ok(page)
            }
            Err(err) => {
                self.failures.insert(title.to_string(), err.clone());
                Err(err)
            }
        }
    }

    fn lookup(&self, title: &str) -> Option<Result<Arc<Page>, FetchError>> {
        let key = self.aliases.get(title).map(String::as_str).unwrap_or(title);
        if let Some(page) = self.pages.get(key) {
            return Some(Ok(Arc::clone(page)));
        }
        self.failures.get(title).cloned().map(Err)
    }

    /// Whether `title` (or an alias of it) already has an entry
    pub fn contains(&self, title: &str) -> bool {
        self.lookup(title).is_some()
    }

    /// Number of distinct articles held
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True until the first fetch, successful or not, has been recorded
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.failures.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
