#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase},
};
use tracing::{debug, info};

use super::{EmbeddingRecord, IndexManifest, MANIFEST_FILE};
use crate::{GridError, Result};

const TABLE_NAME: &str = "chunks";
const VECTORS_SUBDIR: &str = "vectors";

/// Read-only handle over a persisted vector index; created once by the
/// build pipeline, opened once per process at query time.
pub struct VectorIndex {
    connection: Connection,
    manifest: IndexManifest,
    dimension: usize,
}

/// Nearest-neighbor search hit, ordered by ascending vector distance
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub content: String,
    pub source_file: String,
    pub chunk_index: u32,
    pub distance: f32,
}

impl VectorIndex {
    /// Create a fresh index directory for a build, replacing any previous
    /// table. The manifest is only written by [`VectorIndex::finalize`], so
    /// an interrupted build leaves an index that refuses to open.
    #[inline]
    pub async fn create(index_dir: &Path, dimension: usize) -> Result<Self> {
        std::fs::create_dir_all(index_dir).map_err(|e| {
            GridError::Storage(format!(
                "Failed to create index directory {}: {e}",
                index_dir.display()
            ))
        })?;

        let manifest_path = index_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            std::fs::remove_file(&manifest_path)?;
        }

        let connection = connect(&vectors_path(index_dir)).await?;

        let table_names = connection
            .table_names()
            .execute()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to list tables: {e}")))?;
        if table_names.contains(&TABLE_NAME.to_string()) {
            info!("Dropping previous chunks table before rebuild");
            connection
                .drop_table(TABLE_NAME)
                .await
                .map_err(|e| GridError::Storage(format!("Failed to drop table: {e}")))?;
        }

        connection
            .create_empty_table(TABLE_NAME, schema(dimension))
            .execute()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to create table: {e}")))?;

        debug!(
            "Initialized empty index at {} with {} dimensions",
            index_dir.display(),
            dimension
        );

        Ok(Self {
            connection,
            manifest: IndexManifest {
                model: String::new(),
                dimension,
                chunk_count: 0,
                built_at: String::new(),
            },
            dimension,
        })
    }

    /// Open an existing index read-only, verifying the manifest against the
    /// embedding model compiled into this binary.
    #[inline]
    pub async fn open(
        index_dir: &Path,
        expected_model: &str,
        expected_dimension: usize,
    ) -> Result<Self> {
        if !index_dir.exists() {
            return Err(GridError::IndexMissing(index_dir.display().to_string()));
        }

        let manifest = IndexManifest::read(index_dir)?;
        manifest.verify(expected_model, expected_dimension)?;

        let connection = connect(&vectors_path(index_dir)).await?;

        let table_names = connection
            .table_names()
            .execute()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to list tables: {e}")))?;
        if !table_names.contains(&TABLE_NAME.to_string()) {
            return Err(GridError::IndexCorrupt(format!(
                "Manifest present but chunks table missing at {}",
                index_dir.display()
            )));
        }

        info!(
            "Opened index at {} ({} chunks, model {})",
            index_dir.display(),
            manifest.chunk_count,
            manifest.model
        );

        let dimension = manifest.dimension;
        Ok(Self {
            connection,
            manifest,
            dimension,
        })
    }

    /// Append a batch of embedding records
    #[inline]
    pub async fn store_batch(&mut self, records: &[EmbeddingRecord]) -> Result<()> {
        if records.is_empty() {
            debug!("No embeddings to store");
            return Ok(());
        }

        let record_batch = self.build_record_batch(records)?;

        let table = self.open_table().await?;
        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to insert embeddings: {e}")))?;

        debug!("Stored batch of {} embeddings", records.len());
        Ok(())
    }

    /// Write the manifest, marking the build complete
    #[inline]
    pub fn finalize(&mut self, index_dir: &Path, manifest: IndexManifest) -> Result<()> {
        manifest.write(index_dir)?;
        self.manifest = manifest;
        info!("Index build finalized ({} chunks)", self.manifest.chunk_count);
        Ok(())
    }

    #[inline]
    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    /// Nearest-neighbor search over the stored vectors
    #[inline]
    pub async fn search(&self, query_vector: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        debug!("Searching for nearest chunks with limit {limit}");

        let table = self.open_table().await?;

        let results = table
            .vector_search(query_vector)
            .map_err(|e| GridError::Storage(format!("Failed to create vector search: {e}")))?
            .column("vector")
            .limit(limit)
            .execute()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to execute search: {e}")))?;

        let mut search_results = Vec::new();
        let mut stream = results;
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to read result stream: {e}")))?
        {
            search_results.extend(parse_search_batch(&batch)?);
        }

        debug!("Search returned {} chunks", search_results.len());
        Ok(search_results)
    }

    /// Total number of stored chunks
    #[inline]
    pub async fn count(&self) -> Result<u64> {
        let table = self.open_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| GridError::Storage(format!("Failed to count rows: {e}")))?;
        Ok(count as u64)
    }

    async fn open_table(&self) -> Result<lancedb::Table> {
        self.connection
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|e| GridError::Storage(format!("Failed to open table: {e}")))
    }

    fn build_record_batch(&self, records: &[EmbeddingRecord]) -> Result<RecordBatch> {
        let len = records.len();

        let mut ids = Vec::with_capacity(len);
        let mut contents = Vec::with_capacity(len);
        let mut source_files = Vec::with_capacity(len);
        let mut chunk_indices = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * self.dimension);

        for record in records {
            if record.vector.len() != self.dimension {
                return Err(GridError::Storage(format!(
                    "Embedding dimension {} does not match index dimension {}",
                    record.vector.len(),
                    self.dimension
                )));
            }
            ids.push(record.id.as_str());
            contents.push(record.content.as_str());
            source_files.push(record.source_file.as_str());
            chunk_indices.push(record.chunk_index);
            created_ats.push(record.created_at.as_str());
            flat_values.extend_from_slice(&record.vector);
        }

        let values_array = Float32Array::from(flat_values);
        let item_field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array = FixedSizeListArray::try_new(
            item_field,
            self.dimension as i32,
            Arc::new(values_array),
            None,
        )
        .map_err(|e| GridError::Storage(format!("Failed to create vector array: {e}")))?;

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(source_files)),
            Arc::new(UInt32Array::from(chunk_indices)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(schema(self.dimension), arrays)
            .map_err(|e| GridError::Storage(format!("Failed to create record batch: {e}")))
    }
}

fn vectors_path(index_dir: &Path) -> PathBuf {
    index_dir.join(VECTORS_SUBDIR)
}

async fn connect(db_path: &Path) -> Result<Connection> {
    let uri = format!("file://{}", db_path.display());
    lancedb::connect(&uri)
        .execute()
        .await
        .map_err(|e| GridError::Storage(format!("Failed to connect to vector database: {e}")))
}

fn schema(dimension: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, false)),
                dimension as i32,
            ),
            false,
        ),
        Field::new("content", DataType::Utf8, false),
        Field::new("source_file", DataType::Utf8, false),
        Field::new("chunk_index", DataType::UInt32, false),
        Field::new("created_at", DataType::Utf8, false),
    ]))
}

fn parse_search_batch(batch: &RecordBatch) -> Result<Vec<SearchResult>> {
    let contents = string_column(batch, "content")?;
    let source_files = string_column(batch, "source_file")?;

    let chunk_indices = batch
        .column_by_name("chunk_index")
        .ok_or_else(|| GridError::Storage("Missing chunk_index column".to_string()))?
        .as_any()
        .downcast_ref::<UInt32Array>()
        .ok_or_else(|| GridError::Storage("Invalid chunk_index column type".to_string()))?;

    let distances = batch
        .column_by_name("_distance")
        .map(|col| col.as_any().downcast_ref::<Float32Array>());

    let mut results = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let distance = distances
            .flatten()
            .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

        results.push(SearchResult {
            content: contents.value(row).to_string(),
            source_file: source_files.value(row).to_string(),
            chunk_index: chunk_indices.value(row),
            distance,
        });
    }

    Ok(results)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| GridError::Storage(format!("Missing {name} column")))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| GridError::Storage(format!("Invalid {name} column type")))
}
