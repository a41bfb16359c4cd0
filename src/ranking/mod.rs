pub mod embedder;
pub mod similarity;

#[cfg(test)]
pub(crate) mod testing;

pub use embedder::{Embedder, OpenAiEmbedder};
pub use similarity::{Ranked, SimilarityRanker, TargetEmbedding};
