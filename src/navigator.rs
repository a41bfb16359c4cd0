use crate::cache::PageCache;
use crate::config::HopConfig;
use crate::error::ConfigError;
use crate::fetchers::{PageFetcher, WikiFetcher};
use crate::ranking::{Embedder, OpenAiEmbedder, SimilarityRanker, TargetEmbedding};
use crate::results::{Hop, Navigation, Termination};
use std::collections::HashSet;

/// Mutable state of one run; created by [`Navigator::run`] and dropped at its end
struct NavigationState {
    path: Vec<String>,
    hops: Vec<Hop>,
    cache: PageCache,
    steps_remaining: usize,
    visited: HashSet<String>,
}

impl NavigationState {
    fn new(max_steps: usize) -> Self {
        Self {
            path: Vec::new(),
            hops: Vec::new(),
            cache: PageCache::new(),
            steps_remaining: max_steps,
            visited: HashSet::new(),
        }
    }

    fn finish(self, termination: Termination) -> Navigation {
        ::log::info!(
            "Navigation finished after {} step(s): {} (cache: {} hits, {} misses)",
            self.hops.len(),
            termination,
            self.cache.hits(),
            self.cache.misses()
        );
        Navigation {
            path: self.path,
            hops: self.hops,
            termination,
        }
    }
}

/// Greedy walker over the link graph.
///
/// At every step the links of the current page are ranked against the target
/// and the best one is followed. There is no backtracking; only the step
/// budget (and optionally `stop_on_revisit`) guarantees termination.
pub struct Navigator<F: ?Sized, E: ?Sized> {
    fetcher: Box<F>,
    ranker: SimilarityRanker<E>,
    max_steps: usize,
    stop_on_revisit: bool,
}

impl Navigator<WikiFetcher, OpenAiEmbedder> {
    /// Wire up the HTTP-backed fetcher and embedder from configuration
    pub fn from_config(config: &HopConfig) -> Result<Self, ConfigError> {
        let fetcher = WikiFetcher::new(config.wiki.clone())?;
        let embedder = OpenAiEmbedder::new(&config.embedding)?;

        Ok(Navigator::new(Box::new(fetcher), SimilarityRanker::new(Box::new(embedder)))
            .with_max_steps(config.max_steps)
            .with_stop_on_revisit(config.stop_on_revisit))
    }
}

impl<F, E> Navigator<F, E>
where
    F: PageFetcher + ?Sized,
    E: Embedder + ?Sized,
{
    pub fn new(fetcher: Box<F>, ranker: SimilarityRanker<E>) -> Self {
        Self {
            fetcher,
            ranker,
            max_steps: 10,
            stop_on_revisit: false,
        }
    }

    /// Set the step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Stop when the greedy choice lands on a title already on the path.
    ///
    /// This shortens the reported path compared to the default behaviour,
    /// which keeps looping until the step budget runs out.
    pub fn with_stop_on_revisit(mut self, stop_on_revisit: bool) -> Self {
        self.stop_on_revisit = stop_on_revisit;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn ranker(&self) -> &SimilarityRanker<E> {
        &self.ranker
    }

    /// Walk from `start` towards `target`.
    ///
    /// Never fails: fetch and ranking problems end the run with a terminal
    /// [`Termination`] and whatever path was accumulated so far.
    pub async fn run(&self, start: &str, target: &str) -> Navigation {
        ::log::info!(
            "Navigating from {:?} to {:?} (max {} steps)",
            start,
            target,
            self.max_steps
        );

        let mut state = NavigationState::new(self.max_steps);
        let fetcher = self.fetcher.as_ref();

        // Fetch both endpoints first
        let mut current = match state.cache.get(start, fetcher).await {
            Ok(page) => page,
            Err(error) => {
                return state.finish(Termination::FetchFailed {
                    title: start.to_string(),
                    error,
                });
            }
        };
        let target_page = match state.cache.get(target, fetcher).await {
            Ok(page) => page,
            Err(error) => {
                return state.finish(Termination::FetchFailed {
                    title: target.to_string(),
                    error,
                });
            }
        };

        state.path.push(current.title.clone());
        state.visited.insert(current.title.clone());

        // Embedded lazily so runs that end before ranking make no embedder calls
        let mut target_embedding: Option<TargetEmbedding> = None;

        loop {
            // Check terminal conditions
            if current.title == target_page.title {
                return state.finish(Termination::Reached);
            }
            if state.steps_remaining == 0 {
                return state.finish(Termination::StepLimit);
            }
            if current.internal_links.is_empty() {
                return state.finish(Termination::ExhaustedLinks);
            }

            // Rank the current page's links against the target
            let candidates = current.candidate_titles();

            let embedding = match target_embedding.take() {
                Some(embedding) => embedding,
                None => match self.ranker.embed_target(&target_page).await {
                    Ok(embedding) => embedding,
                    Err(error) => return state.finish(Termination::RankingFailed { error }),
                },
            };
            let ranked = self.ranker.rank_against(&embedding, &candidates).await;
            target_embedding = Some(embedding);

            let best = match ranked {
                Ok(ranked) => ranked,
                Err(error) => return state.finish(Termination::RankingFailed { error }),
            };

            ::log::info!(
                "Step {}: {:?} -> {:?} (score {:.4}, {} candidates)",
                state.hops.len() + 1,
                current.title,
                best.title,
                best.score,
                candidates.len()
            );

            // Record the hop
            state.path.push(best.title.clone());
            state.hops.push(Hop {
                from: current.title.clone(),
                to: best.title.clone(),
                score: best.score,
            });
            state.steps_remaining -= 1;

            if best.title == target_page.title {
                return state.finish(Termination::Reached);
            }

            let first_visit = state.visited.insert(best.title.clone());
            if self.stop_on_revisit && !first_visit {
                return state.finish(Termination::Revisited { title: best.title });
            }

            // Follow the link
            current = match state.cache.get(&best.title, fetcher).await {
                Ok(page) => page,
                Err(error) => {
                    return state.finish(Termination::FetchFailed {
                        title: best.title,
                        error,
                    });
                }
            };

            // A link label can redirect to a page already on the path
            if current.title != best.title {
                let first_visit = state.visited.insert(current.title.clone());
                if self.stop_on_revisit && !first_visit && current.title != target_page.title {
                    return state.finish(Termination::Revisited {
                        title: current.title.clone(),
                    });
                }
            }
        }
    }
}
