use crate::parsers::Anchor;
use crate::results::Link;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::{Position, Url};

/// Path prefix of the article namespace
pub const ARTICLE_PREFIX: &str = "/wiki/";

/// Any target containing this is namespaced (File:, Category:, Template:, ...)
pub const NAMESPACE_MARKER: char = ':';

/// Case-insensitive marker for disambiguation pages
pub const DISAMBIGUATION_MARKER: &str = "disambiguation";

/// Configuration for internal link filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Path prefix an href must carry to count as an article link
    #[serde(default = "default_article_prefix")]
    pub article_prefix: String,

    /// Substring (matched case-insensitively) marking disambiguation pages
    #[serde(default = "default_disambiguation_marker")]
    pub disambiguation_marker: String,

    /// Regex patterns for hrefs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_article_prefix() -> String {
    ARTICLE_PREFIX.to_string()
}

fn default_disambiguation_marker() -> String {
    DISAMBIGUATION_MARKER.to_string()
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            article_prefix: default_article_prefix(),
            disambiguation_marker: default_disambiguation_marker(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Decides which anchors on a page are internal article links and turns them into [`Link`]s
#[derive(Debug, Clone)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    exclude_regexes: Vec<Regex>,
    base_url: Option<Url>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            config: LinkFilterConfig::default(),
            exclude_regexes: Vec::new(),
            base_url: None,
        }
    }
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: LinkFilterConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            config,
            exclude_regexes,
            base_url: None,
        })
    }

    /// Resolve absolute hrefs against the page they were found on.
    ///
    /// Without a base only site-relative hrefs (`/wiki/...`) are accepted.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Run every anchor through the pipeline: namespace check, normalization,
    /// disambiguation check, then dedup on the normalized name.
    pub fn filter_links(&self, anchors: &[Anchor]) -> Vec<Link> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in anchors {
            let Some(page) = self.article_name(&anchor.href) else {
                ::log::trace!("Skipping non-article href: {}", anchor.href);
                continue;
            };

            let title = anchor.text.trim();
            if self.is_disambiguation(&page, title) {
                ::log::trace!("Skipping disambiguation link: {}", anchor.href);
                continue;
            }

            if !seen.insert(page.clone()) {
                continue;
            }

            links.push(Link {
                title: if title.is_empty() {
                    page.clone()
                } else {
                    title.to_string()
                },
                page,
                url: anchor.href.clone(),
            });
        }

        ::log::debug!(
            "Kept {} internal links out of {} anchors",
            links.len(),
            anchors.len()
        );
        links
    }

    /// Normalized article name an href points at, or `None` if it is not an
    /// article link
    pub fn article_name(&self, href: &str) -> Option<String> {
        if href.starts_with('#') {
            return None;
        }

        for regex in &self.exclude_regexes {
            if regex.is_match(href) {
                return None;
            }
        }

        let path = self.article_path(href)?;
        let rest = path.strip_prefix(self.config.article_prefix.as_str())?;

        // Check the namespace marker before any suffix is dropped
        if rest.contains(NAMESPACE_MARKER) {
            return None;
        }

        let raw = strip_suffixes(rest);
        if raw.is_empty() {
            return None;
        }

        let name = normalize_page_name(raw);
        if name.is_empty() { None } else { Some(name) }
    }

    /// Check a normalized name and anchor text against the disambiguation marker
    pub fn is_disambiguation(&self, page: &str, anchor_text: &str) -> bool {
        let marker = self.config.disambiguation_marker.to_lowercase();
        page.to_lowercase().contains(&marker) || anchor_text.to_lowercase().contains(&marker)
    }

    /// Site-relative path of an href if it stays on the encyclopedia
    fn article_path(&self, href: &str) -> Option<String> {
        if href.starts_with(self.config.article_prefix.as_str()) {
            return Some(href.to_string());
        }

        let base = self.base_url.as_ref()?;
        let resolved = base.join(href).ok()?;
        if !matches!(resolved.scheme(), "http" | "https") || resolved.host_str() != base.host_str()
        {
            return None;
        }
        Some(resolved[Position::BeforePath..].to_string())
    }
}

/// Drop any `#fragment` or `?query` suffix
fn strip_suffixes(raw: &str) -> &str {
    let end = raw.find(['#', '?']).unwrap_or(raw.len());
    &raw[..end]
}

/// Percent-decode an article path segment and turn underscores into spaces
pub fn normalize_page_name(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8_lossy()
        .replace('_', " ")
        .trim()
        .to_string()
}
