use crate::error::{FetchError, RankError};
use serde::{Deserialize, Serialize};

/// One outbound internal link discovered on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Anchor text as rendered (falls back to `page` when the anchor is empty)
    pub title: String,

    /// Normalized article name: no fragment or query, percent-decoded, spaces for underscores
    pub page: String,

    /// The href exactly as found in the markup
    pub url: String,
}

/// Represents one fetched article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Canonical title as resolved by the article source
    pub title: String,

    /// Lead section as plain text
    pub summary: String,

    /// Rendered HTML of the main content region
    pub content: String,

    /// URL the content was fetched from
    pub url: String,

    /// Internal links in document order, deduplicated by `page`
    pub internal_links: Vec<Link>,
}

impl Page {
    /// Create a new page
    pub fn new(
        title: String,
        summary: String,
        content: String,
        url: String,
        internal_links: Vec<Link>,
    ) -> Self {
        Self {
            title,
            summary,
            content,
            url,
            internal_links,
        }
    }

    /// Link titles in order, used as ranking candidates
    pub fn candidate_titles(&self) -> Vec<String> {
        self.internal_links.iter().map(|l| l.title.clone()).collect()
    }
}

/// A single greedy step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hop {
    pub from: String,
    pub to: String,
    pub score: f32,
}

/// Why a navigation run stopped
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The current page is the target
    Reached,
    /// The current page has no usable internal links
    ExhaustedLinks,
    /// The step budget ran out
    StepLimit,
    /// A page on the path could not be retrieved
    FetchFailed { title: String, error: FetchError },
    /// The embedding service failed while ranking
    RankingFailed { error: RankError },
    /// The chosen title was already on the path (only with `stop_on_revisit`)
    Revisited { title: String },
}

impl Termination {
    pub fn is_reached(&self) -> bool {
        matches!(self, Termination::Reached)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Reached => write!(f, "reached target"),
            Termination::ExhaustedLinks => write!(f, "no more internal links to follow"),
            Termination::StepLimit => write!(f, "step limit reached"),
            Termination::FetchFailed { title, error } => {
                write!(f, "could not retrieve {:?}: {}", title, error)
            }
            Termination::RankingFailed { error } => write!(f, "ranking failed: {}", error),
            Termination::Revisited { title } => write!(f, "revisited {:?}", title),
        }
    }
}

/// Result of one navigation run
#[derive(Debug, Clone)]
pub struct Navigation {
    /// Visited titles, starting with the start page's canonical title
    pub path: Vec<String>,

    /// One entry per greedy step, in order
    pub hops: Vec<Hop>,

    pub termination: Termination,
}
