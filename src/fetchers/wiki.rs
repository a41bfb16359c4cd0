use crate::config::WikiConfig;
use crate::error::{ConfigError, FetchError};
use crate::fetchers::PageFetcher;
use crate::filter::LinkFilter;
use crate::parsers::html;
use crate::results::Page;
use crate::utils::{linear_backoff, truncate_for_log};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Fetches articles from a MediaWiki site.
///
/// Each fetch is a metadata lookup through the action API (canonical title,
/// lead extract, canonical URL) followed by a download of the rendered
/// article. Both requests carry the configured `User-Agent`.
pub struct WikiFetcher {
    client: Client,
    config: WikiConfig,
    filter: LinkFilter,
}

/// Outcome of a single failed attempt
#[derive(Debug)]
enum Failure {
    /// Permanent; retrying cannot help
    NotFound,
    /// Worth another attempt
    Transient(String),
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::Transient(err.to_string())
    }
}

/// Metadata resolved for a title
#[derive(Debug)]
struct ArticleInfo {
    title: String,
    summary: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: String,
    fullurl: Option<String>,
}

impl WikiFetcher {
    /// Build a fetcher from configuration
    pub fn new(config: WikiConfig) -> Result<Self, ConfigError> {
        let filter = LinkFilter::new(config.links.clone())?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            filter,
        })
    }

    /// Wait after the `attempt`-th failed attempt (1-based)
    fn retry_delay(&self, attempt: usize) -> Duration {
        linear_backoff(self.config.backoff(), attempt)
    }

    /// Run `op` until it succeeds, fails permanently, or the attempt budget is spent
    async fn with_retries<T, F, Fut>(
        &self,
        title: &str,
        what: &str,
        mut op: F,
    ) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let attempts = self.config.retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(Failure::NotFound) => {
                    return Err(FetchError::NotFound {
                        title: title.to_string(),
                    });
                }
                Err(Failure::Transient(reason)) if attempt < attempts => {
                    let wait = self.retry_delay(attempt);
                    ::log::warn!(
                        "{} for {:?} failed (attempt {}/{}): {}; retrying in {:?}",
                        what,
                        title,
                        attempt,
                        attempts,
                        reason,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(Failure::Transient(reason)) => {
                    ::log::error!(
                        "{} for {:?} failed after {} attempt(s): {}",
                        what,
                        title,
                        attempt,
                        reason
                    );
                    return Err(FetchError::Unavailable {
                        title: title.to_string(),
                        attempts: attempt,
                        reason,
                    });
                }
            }
        }
    }

    /// Resolve a title to its canonical title, lead extract and URL
    async fn lookup(&self, title: &str) -> Result<ArticleInfo, Failure> {
        ::log::debug!("Looking up metadata for {:?}", title);
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("redirects", "1"),
                ("prop", "extracts|info"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?;

        // Extract the single page entry
        let body: QueryResponse = response.json().await?;
        let query = body
            .query
            .ok_or_else(|| Failure::Transient("response has no query section".to_string()))?;

        let Some(page) = query.pages.into_iter().next() else {
            return Err(Failure::NotFound);
        };
        // Missing and invalid titles are permanent
        if page.missing || page.invalid {
            return Err(Failure::NotFound);
        }
        let url = page.fullurl.ok_or(Failure::NotFound)?;

        Ok(ArticleInfo {
            title: page.title,
            summary: page.extract.trim().to_string(),
            url,
        })
    }

    /// Download the rendered article
    async fn download(&self, url: &str) -> Result<String, Failure> {
        ::log::debug!("Downloading {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for WikiFetcher {
    async fn fetch(&self, title: &str) -> Result<Page, FetchError> {
        if title.trim().is_empty() {
            return Err(FetchError::NotFound {
                title: title.to_string(),
            });
        }

        // Resolve metadata, then download the rendered article
        let info = self
            .with_retries(title, "metadata lookup", || self.lookup(title))
            .await?;
        ::log::debug!(
            "Resolved {:?} to {:?}: {}",
            title,
            info.title,
            truncate_for_log(&info.summary, 80)
        );
        let document = self
            .with_retries(title, "document download", || self.download(&info.url))
            .await?;

        // Parse the document and filter its links
        let parsed = html::parse(&document);
        let filter = match Url::parse(&info.url) {
            Ok(base) => self.filter.clone().with_base_url(base),
            Err(_) => self.filter.clone(),
        };
        let links = filter.filter_links(&parsed.anchors);

        ::log::info!("Fetched {:?} with {} internal links", info.title, links.len());

        Ok(Page::new(
            info.title,
            info.summary,
            parsed.content,
            info.url,
            links,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::LinkFilterConfig;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_AGENT: &str = "wiki-hop-tests/0.1";

    const SPACEX_HTML: &str = r#"<html><body>
        <div id="mw-content-text">
            <a href="/wiki/Falcon_9">Falcon 9</a>
            <a href="/wiki/File:Falcon_9_Demo.jpg">image</a>
            <a href="/wiki/Category:Rocket_companies">Rocket companies</a>
            <a href="/wiki/Dragon_(disambiguation)">Dragon</a>
            <a href="/wiki/Falcon_9#Reusability">reusable</a>
            <a href="/wiki/Elon_Musk">Elon Musk</a>
        </div>
    </body></html>"#;

    fn config(server: &MockServer) -> WikiConfig {
        WikiConfig {
            api_url: format!("{}/w/api.php", server.uri()),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 5,
            retries: 3,
            backoff_ms: 1,
            links: LinkFilterConfig::default(),
        }
    }

    async fn mount_metadata(server: &MockServer, requested: &str, canonical: &str) {
        let body = json!({
            "batchcomplete": true,
            "query": {
                "pages": [{
                    "pageid": 1,
                    "ns": 0,
                    "title": canonical,
                    "extract": "SpaceX is an American aerospace company.\n",
                    "fullurl": format!("{}/wiki/{}", server.uri(), canonical.replace(' ', "_")),
                }]
            }
        });
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("titles", requested))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_builds_page_with_filtered_links() {
        let server = MockServer::start().await;
        mount_metadata(&server, "SpaceX", "SpaceX").await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPACEX_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(config(&server)).unwrap();
        let page = fetcher.fetch("SpaceX").await.unwrap();

        assert_eq!(page.title, "SpaceX");
        assert_eq!(page.summary, "SpaceX is an American aerospace company.");
        assert_eq!(page.url, format!("{}/wiki/SpaceX", server.uri()));
        assert!(page.content.contains("mw-content-text"));

        let pages: Vec<_> = page.internal_links.iter().map(|l| l.page.as_str()).collect();
        assert_eq!(pages, vec!["Falcon 9", "Elon Musk"]);
    }

    #[tokio::test]
    async fn test_redirects_resolve_to_canonical_title() {
        let server = MockServer::start().await;
        mount_metadata(&server, "Space X", "SpaceX").await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPACEX_HTML))
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(config(&server)).unwrap();
        let page = fetcher.fetch("Space X").await.unwrap();
        assert_eq!(page.title, "SpaceX");
    }

    #[tokio::test]
    async fn test_missing_article_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "batchcomplete": true,
                "query": { "pages": [{ "ns": 0, "title": "Nonexistent Thing", "missing": true }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(config(&server)).unwrap();
        let err = fetcher.fetch("Nonexistent Thing").await.unwrap_err();
        assert_eq!(
            err,
            FetchError::NotFound {
                title: "Nonexistent Thing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_title_is_not_found_without_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(config(&server)).unwrap();
        assert!(matches!(
            fetcher.fetch("  ").await,
            Err(FetchError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_transient_document_failures_are_retried() {
        let server = MockServer::start().await;
        mount_metadata(&server, "SpaceX", "SpaceX").await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPACEX_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(config(&server)).unwrap();
        let page = fetcher.fetch("SpaceX").await.unwrap();
        assert_eq!(page.internal_links.len(), 2);
    }

    #[test]
    fn test_retry_delay_is_linear_in_attempt() {
        let config = WikiConfig {
            backoff_ms: 1500,
            ..WikiConfig::default()
        };
        let fetcher = WikiFetcher::new(config).unwrap();
        assert_eq!(fetcher.retry_delay(1), Duration::from_millis(1500));
        assert_eq!(fetcher.retry_delay(2), Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_retries_wait_base_times_attempt() {
        let server = MockServer::start().await;
        mount_metadata(&server, "SpaceX", "SpaceX").await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPACEX_HTML))
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(WikiConfig {
            backoff_ms: 200,
            ..config(&server)
        })
        .unwrap();

        // 200ms after the first failure, 400ms after the second
        let started = std::time::Instant::now();
        fetcher.fetch("SpaceX").await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(950), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_exhausted_retries_are_unavailable() {
        let server = MockServer::start().await;
        mount_metadata(&server, "SpaceX", "SpaceX").await;
        Mock::given(method("GET"))
            .and(path("/wiki/SpaceX"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = WikiFetcher::new(config(&server)).unwrap();
        match fetcher.fetch("SpaceX").await {
            Err(FetchError::Unavailable {
                title, attempts, ..
            }) => {
                assert_eq!(title, "SpaceX");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_is_unavailable() {
        let config = WikiConfig {
            api_url: "http://127.0.0.1:9/w/api.php".to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 2,
            retries: 2,
            backoff_ms: 1,
            links: LinkFilterConfig::default(),
        };

        let fetcher = WikiFetcher::new(config).unwrap();
        assert!(matches!(
            fetcher.fetch("SpaceX").await,
            Err(FetchError::Unavailable { attempts: 2, .. })
        ));
    }
}
