
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use tracing::{debug, info};

use crate::{GridError, Result};

/// Identifier of the pinned embedding model. Recorded in the index manifest
/// at build time and verified again when the index is opened; answering
/// with vectors from a different model would silently corrupt retrieval.
pub const EMBEDDING_MODEL_ID: &str = "BAAI/bge-small-zh-v1.5";

/// Output dimensionality of the pinned model
pub const EMBEDDING_DIMENSION: usize = 512;

/// Anything that can turn text into fixed-dimensionality vectors.
///
/// The production implementation is [`LocalEncoder`]; tests substitute a
/// deterministic stand-in so the pipeline can run without model weights.
pub trait Embedder: Send {
    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_id(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embed a single question with the same model used at build time
    fn embed_query(&mut self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(std::slice::from_ref(&text.to_string()))?;
        vectors
            .pop()
            .ok_or_else(|| GridError::Embedding("Model returned no vector for query".to_string()))
    }
}

/// Local embedding model, loaded once per process
pub struct LocalEncoder {
    model: TextEmbedding,
}

impl LocalEncoder {
    #[inline]
    pub fn new() -> Result<Self> {
        info!("Loading embedding model {EMBEDDING_MODEL_ID}");

        let model = TextEmbedding::try_new(TextInitOptions::new(EmbeddingModel::BGESmallZHV15))
            .map_err(|e| GridError::Embedding(format!("Failed to load embedding model: {e}")))?;

        Ok(Self { model })
    }
}

impl Embedder for LocalEncoder {
    #[inline]
    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Embedding batch of {} texts", texts.len());

        let vectors = self
            .model
            .embed(texts, None)
            .map_err(|e| GridError::Embedding(format!("Embedding generation failed: {e}")))?;

        if vectors.len() != texts.len() {
            return Err(GridError::Embedding(format!(
                "Mismatch between request and response counts: {} vs {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }

    #[inline]
    fn model_id(&self) -> &str {
        EMBEDDING_MODEL_ID
    }

    #[inline]
    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
