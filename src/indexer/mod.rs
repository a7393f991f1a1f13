// Index builder module
// Offline pipeline: scan the documents directory, extract text per file,
// chunk, embed, and persist the vector index with its manifest


use std::path::{Path, PathBuf};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embeddings::chunking::{ChunkingConfig, DocumentChunk, chunk_document};
use crate::embeddings::encoder::Embedder;
use crate::extract::{extract_document, supported_extension};
use crate::index::{EmbeddingRecord, IndexManifest, VectorIndex};
use crate::{GridError, Result};

/// Chunks embedded per call to the embedding model
const EMBED_BATCH_SIZE: usize = 16;

/// Offline index builder
pub struct IndexBuilder<'a> {
    embedder: &'a mut dyn Embedder,
    chunking: ChunkingConfig,
}

/// Outcome of one build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub documents_indexed: usize,
    pub documents_failed: usize,
    pub chunks_created: usize,
    pub dimension: usize,
}

impl<'a> IndexBuilder<'a> {
    #[inline]
    pub fn new(embedder: &'a mut dyn Embedder, chunking: ChunkingConfig) -> Self {
        Self { embedder, chunking }
    }

    /// Build the vector index from every supported document under
    /// `docs_dir`. Individual unreadable documents are logged and skipped;
    /// an empty corpus aborts the build with nothing written.
    #[inline]
    pub async fn build(&mut self, docs_dir: &Path, index_dir: &Path) -> Result<BuildStats> {
        let paths = scan_documents(docs_dir)?;
        if paths.is_empty() {
            return Err(GridError::EmptyCorpus(docs_dir.display().to_string()));
        }

        info!(
            "Found {} candidate documents under {}",
            paths.len(),
            docs_dir.display()
        );

        let mut documents = Vec::new();
        let mut documents_failed = 0;
        for path in &paths {
            match extract_document(path) {
                Ok(document) => {
                    if document.text.trim().is_empty() {
                        warn!("No text extracted from {}, skipping", document.source_file);
                        documents_failed += 1;
                    } else {
                        documents.push(document);
                    }
                }
                Err(e) => {
                    warn!("{e}");
                    documents_failed += 1;
                }
            }
        }

        let chunks: Vec<DocumentChunk> = documents
            .iter()
            .flat_map(|document| chunk_document(document, &self.chunking))
            .collect();

        if chunks.is_empty() {
            return Err(GridError::EmptyCorpus(docs_dir.display().to_string()));
        }

        info!(
            "Split {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );

        let dimension = self.embedder.dimension();
        let mut index = VectorIndex::create(index_dir, dimension).await?;

        let progress = embedding_progress_bar(chunks.len() as u64);
        let created_at = Utc::now().to_rfc3339();

        for batch in &chunks.iter().chunks(EMBED_BATCH_SIZE) {
            let batch: Vec<&DocumentChunk> = batch.collect();
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.content.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts)?;

            let records: Vec<EmbeddingRecord> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| EmbeddingRecord {
                    id: Uuid::new_v4().to_string(),
                    vector,
                    content: chunk.content.clone(),
                    source_file: chunk.source_file.clone(),
                    chunk_index: chunk.chunk_index as u32,
                    created_at: created_at.clone(),
                })
                .collect();

            index.store_batch(&records).await?;
            progress.inc(records.len() as u64);
        }
        progress.finish_and_clear();

        index.finalize(
            index_dir,
            IndexManifest {
                model: self.embedder.model_id().to_string(),
                dimension,
                chunk_count: chunks.len(),
                built_at: created_at,
            },
        )?;

        let stats = BuildStats {
            documents_indexed: documents.len(),
            documents_failed,
            chunks_created: chunks.len(),
            dimension,
        };

        info!(
            "Index build complete: {} documents, {} chunks",
            stats.documents_indexed, stats.chunks_created
        );

        Ok(stats)
    }
}

/// List supported documents under a directory, sorted by file name so
/// repeated builds see the same order.
fn scan_documents(docs_dir: &Path) -> Result<Vec<PathBuf>> {
    if !docs_dir.is_dir() {
        return Err(GridError::EmptyCorpus(docs_dir.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(docs_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && supported_extension(path))
        .collect();
    paths.sort();

    Ok(paths)
}

fn embedding_progress_bar(total: u64) -> ProgressBar {
    if console::user_attended_stderr() {
        ProgressBar::new(total).with_style(
            ProgressStyle::with_template("{spinner} Embedding chunks [{bar:40}] {pos}/{len}")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    }
}

/// List supported documents without building; used by the status report
#[inline]
pub fn list_documents(docs_dir: &Path) -> Result<Vec<PathBuf>> {
    scan_documents(docs_dir)
}
