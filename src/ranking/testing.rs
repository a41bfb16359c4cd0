//! Deterministic embedder for tests.

use crate::error::EmbedError;
use crate::ranking::Embedder;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bag-of-words embedder over a fixed vocabulary: one dimension per word,
/// counting whole-token, case-insensitive occurrences. Texts with no
/// vocabulary words map to the zero vector.
pub(crate) struct VocabularyEmbedder {
    vocabulary: Vec<String>,
    calls: AtomicUsize,
}

impl VocabularyEmbedder {
    pub(crate) fn new(words: &[&str]) -> Self {
        Self {
            vocabulary: words.iter().map(|w| w.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` calls served so far
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();
        self.vocabulary
            .iter()
            .map(|word| tokens.iter().filter(|t| *t == word).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for VocabularyEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs.iter().map(|text| self.vectorize(text)).collect())
    }
}
