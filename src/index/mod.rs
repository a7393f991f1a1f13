// Vector index module
// Persisted LanceDB index of chunk embeddings plus the manifest that pins
// which embedding model produced them


pub mod store;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use store::{SearchResult, VectorIndex};

use crate::{GridError, Result};

/// Embedding record stored in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique identifier for this embedding
    pub id: String,
    /// The vector embedding
    pub vector: Vec<f32>,
    /// The chunk text this embedding represents
    pub content: String,
    /// Filename of the source document
    pub source_file: String,
    /// Position of the chunk within its document
    pub chunk_index: u32,
    /// Timestamp when this embedding was created
    pub created_at: String,
}

/// Written alongside the vectors after a successful build; its absence
/// means the index is not usable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexManifest {
    /// Identifier of the embedding model the vectors were produced with
    pub model: String,
    /// Vector dimensionality
    pub dimension: usize,
    /// Number of chunks stored
    pub chunk_count: usize,
    /// Build timestamp, RFC 3339
    pub built_at: String,
}

pub const MANIFEST_FILE: &str = "manifest.json";

impl IndexManifest {
    #[inline]
    pub fn write(&self, index_dir: &Path) -> Result<()> {
        let path = index_dir.join(MANIFEST_FILE);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| GridError::Storage(format!("Failed to serialize manifest: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Read the manifest, distinguishing a missing index from a broken one
    #[inline]
    pub fn read(index_dir: &Path) -> Result<Self> {
        let path = index_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(GridError::IndexMissing(index_dir.display().to_string()));
        }

        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| GridError::IndexCorrupt(format!("Invalid manifest: {e}")))
    }

    /// Refuse to serve vectors produced by a different model than the one
    /// this binary embeds queries with.
    #[inline]
    pub fn verify(&self, expected_model: &str, expected_dimension: usize) -> Result<()> {
        if self.model != expected_model || self.dimension != expected_dimension {
            return Err(GridError::ModelMismatch {
                found: self.model.clone(),
                found_dimension: self.dimension,
                expected: expected_model.to_string(),
                expected_dimension,
            });
        }
        Ok(())
    }
}
