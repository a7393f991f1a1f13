use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No readable documents found under {0}")]
    EmptyCorpus(String),

    #[error("Failed to extract text from {file}: {reason}")]
    Extraction { file: String, reason: String },

    #[error("Knowledge index not found at {0} (run `gridwatch build` first)")]
    IndexMissing(String),

    #[error("Knowledge index is unreadable: {0}")]
    IndexCorrupt(String),

    #[error(
        "Knowledge index was built with embedding model {found} ({found_dimension} dims) but this binary embeds with {expected} ({expected_dimension} dims); rebuild the index"
    )]
    ModelMismatch {
        found: String,
        found_dimension: usize,
        expected: String,
        expected_dimension: usize,
    },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index storage error: {0}")]
    Storage(String),

    #[error("DEEPSEEK_API_KEY is not configured")]
    MissingApiKey,

    #[error("Chat service error: {0}")]
    Chat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod assistant;
pub mod chat;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod indexer;
