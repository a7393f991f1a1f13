#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::Document;

/// Configuration for splitting document text into retrieval chunks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub max_chunk_chars: usize,
    /// Characters shared between consecutive chunks of the same document
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_chunk_chars: 500,
            overlap_chars: 50,
        }
    }
}

/// A chunk of one document's text, the unit of retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    pub content: String,
    pub source_file: String,
    pub chunk_index: usize,
}

/// Split text into fixed-size overlapping chunks.
///
/// Boundaries are character positions, not byte offsets; the corpus is
/// largely CJK text and byte slicing would split code points. Every chunk
/// is at most `max_chunk_chars` long and consecutive chunks share exactly
/// `overlap_chars` characters, except the final chunk which may be shorter.
#[inline]
pub fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() || config.max_chunk_chars == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let max = config.max_chunk_chars;
    let stride = max.saturating_sub(config.overlap_chars).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + max).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }

    chunks
}

/// Chunk a single extracted document, tagging each chunk with its source
#[inline]
pub fn chunk_document(document: &Document, config: &ChunkingConfig) -> Vec<DocumentChunk> {
    let chunks: Vec<DocumentChunk> = split_text(&document.text, config)
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| DocumentChunk {
            content,
            source_file: document.source_file.clone(),
            chunk_index,
        })
        .collect();

    debug!(
        "Chunked {} into {} chunks (max {} chars, overlap {})",
        document.source_file,
        chunks.len(),
        config.max_chunk_chars,
        config.overlap_chars
    );

    chunks
}
