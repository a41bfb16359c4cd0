//! Cosine-similarity ranking of candidate titles against a target page.

use crate::error::RankError;
use crate::ranking::Embedder;
use crate::results::Page;
use serde::Serialize;

/// Unit-length embedding of a target page, reusable across ranking calls
#[derive(Debug, Clone)]
pub struct TargetEmbedding {
    pub title: String,
    vector: Vec<f32>,
}

/// Best candidate of one ranking call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub title: String,
    pub score: f32,
    /// Position of `title` in the candidate list
    pub index: usize,
}

/// Picks the candidate closest in meaning to a target page.
///
/// Holds no per-run state; the embedder is long-lived and shared.
pub struct SimilarityRanker<E: ?Sized> {
    embedder: Box<E>,
}

impl<E: Embedder + ?Sized> SimilarityRanker<E> {
    pub fn new(embedder: Box<E>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Text the target is represented by: `"{title}. {summary}"`
    pub fn target_text(target: &Page) -> String {
        format!("{}. {}", target.title, target.summary)
    }

    /// Embed the target once so it can be reused for every step of a run
    pub async fn embed_target(&self, target: &Page) -> Result<TargetEmbedding, RankError> {
        let mut vectors = self.embedder.embed(&[Self::target_text(target)]).await?;
        if vectors.len() != 1 {
            return Err(RankError::Shape(format!(
                "expected 1 target vector, got {}",
                vectors.len()
            )));
        }
        let mut vector = vectors.remove(0);
        normalize(&mut vector);

        Ok(TargetEmbedding {
            title: target.title.clone(),
            vector,
        })
    }

    /// Embed the target and rank `candidates` against it
    pub async fn rank(&self, target: &Page, candidates: &[String]) -> Result<Ranked, RankError> {
        if candidates.is_empty() {
            return Err(RankError::NoCandidates);
        }
        let target = self.embed_target(target).await?;
        self.rank_against(&target, candidates).await
    }

    /// Rank `candidates` against a precomputed target embedding
    pub async fn rank_against(
        &self,
        target: &TargetEmbedding,
        candidates: &[String],
    ) -> Result<Ranked, RankError> {
        if candidates.is_empty() {
            return Err(RankError::NoCandidates);
        }

        let vectors = self.embedder.embed(candidates).await?;
        if vectors.len() != candidates.len() {
            return Err(RankError::Shape(format!(
                "expected {} candidate vectors, got {}",
                candidates.len(),
                vectors.len()
            )));
        }

        let mut scores = Vec::with_capacity(vectors.len());
        for mut vector in vectors {
            if vector.len() != target.vector.len() {
                return Err(RankError::Shape(format!(
                    "candidate dimension {} does not match target dimension {}",
                    vector.len(),
                    target.vector.len()
                )));
            }
            normalize(&mut vector);
            scores.push(dot(&target.vector, &vector));
        }

        let (index, score) = argmax(&scores).ok_or(RankError::NoCandidates)?;
        ::log::debug!(
            "Best of {} candidates for {:?}: {:?} ({:.4})",
            candidates.len(),
            target.title,
            candidates[index],
            score
        );

        Ok(Ranked {
            title: candidates[index].clone(),
            score,
            index,
        })
    }
}

/// Scale `vector` to unit length in place; zero vectors are left as they are
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Index and value of the first strictly greatest score
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}
