// Embedding generation module
// Chunking of extracted text plus the local embedding model that turns
// chunks and questions into vectors

pub mod chunking;
pub mod encoder;

pub use chunking::{ChunkingConfig, DocumentChunk, chunk_document, split_text};
pub use encoder::{EMBEDDING_DIMENSION, EMBEDDING_MODEL_ID, Embedder, LocalEncoder};
