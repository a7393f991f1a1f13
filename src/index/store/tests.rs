use tempfile::TempDir;

use super::*;
use crate::index::{EmbeddingRecord, IndexManifest};

const DIM: usize = 4;

fn record(id: &str, vector: [f32; DIM], content: &str, source_file: &str) -> EmbeddingRecord {
    EmbeddingRecord {
        id: id.to_string(),
        vector: vector.to_vec(),
        content: content.to_string(),
        source_file: source_file.to_string(),
        chunk_index: 0,
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

fn manifest(chunk_count: usize) -> IndexManifest {
    IndexManifest {
        model: "stub-model".to_string(),
        dimension: DIM,
        chunk_count,
        built_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn create_store_open_search_roundtrip() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let index_dir = temp_dir.path().join("knowledge_base");

    let mut index = VectorIndex::create(&index_dir, DIM)
        .await
        .expect("can create index");

    let records = vec![
        record("a", [1.0, 0.0, 0.0, 0.0], "voltage stability", "a.docx"),
        record("b", [0.0, 1.0, 0.0, 0.0], "fault transients", "b.pptx"),
        record("c", [0.9, 0.1, 0.0, 0.0], "reactive power", "a.docx"),
    ];
    index.store_batch(&records).await.expect("can store batch");
    index
        .finalize(&index_dir, manifest(records.len()))
        .expect("can finalize");

    let reopened = VectorIndex::open(&index_dir, "stub-model", DIM)
        .await
        .expect("can reopen index");
    assert_eq!(reopened.count().await.expect("can count"), 3);
    assert_eq!(reopened.manifest().chunk_count, 3);

    let results = reopened
        .search(&[1.0, 0.0, 0.0, 0.0], 2)
        .await
        .expect("search succeeds");

    assert_eq!(results.len(), 2);
    // Nearest first: the exact match, then the 0.9 neighbor
    assert_eq!(results[0].content, "voltage stability");
    assert_eq!(results[1].content, "reactive power");
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn open_missing_index_fails_distinctly() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let index_dir = temp_dir.path().join("never_built");

    let result = VectorIndex::open(&index_dir, "stub-model", DIM).await;
    assert!(matches!(result, Err(crate::GridError::IndexMissing(_))));
}

#[tokio::test]
async fn unfinalized_build_refuses_to_open() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let index_dir = temp_dir.path().join("knowledge_base");

    let mut index = VectorIndex::create(&index_dir, DIM)
        .await
        .expect("can create index");
    index
        .store_batch(&[record("a", [1.0, 0.0, 0.0, 0.0], "text", "a.docx")])
        .await
        .expect("can store batch");
    // No finalize: the manifest was never written

    let result = VectorIndex::open(&index_dir, "stub-model", DIM).await;
    assert!(matches!(result, Err(crate::GridError::IndexMissing(_))));
}

#[tokio::test]
async fn open_rejects_different_model() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let index_dir = temp_dir.path().join("knowledge_base");

    let mut index = VectorIndex::create(&index_dir, DIM)
        .await
        .expect("can create index");
    index
        .store_batch(&[record("a", [1.0, 0.0, 0.0, 0.0], "text", "a.docx")])
        .await
        .expect("can store batch");
    index.finalize(&index_dir, manifest(1)).expect("can finalize");

    let result = VectorIndex::open(&index_dir, "different-model", DIM).await;
    assert!(matches!(
        result,
        Err(crate::GridError::ModelMismatch { .. })
    ));
}

#[tokio::test]
async fn store_rejects_wrong_dimension() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let index_dir = temp_dir.path().join("knowledge_base");

    let mut index = VectorIndex::create(&index_dir, DIM)
        .await
        .expect("can create index");

    let bad = EmbeddingRecord {
        id: "bad".to_string(),
        vector: vec![1.0, 2.0],
        content: "text".to_string(),
        source_file: "a.docx".to_string(),
        chunk_index: 0,
        created_at: "2026-01-01T00:00:00Z".to_string(),
    };
    let result = index.store_batch(&[bad]).await;
    assert!(matches!(result, Err(crate::GridError::Storage(_))));
}

#[tokio::test]
async fn rebuild_replaces_previous_contents() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let index_dir = temp_dir.path().join("knowledge_base");

    let mut first = VectorIndex::create(&index_dir, DIM)
        .await
        .expect("can create index");
    first
        .store_batch(&[
            record("a", [1.0, 0.0, 0.0, 0.0], "old", "a.docx"),
            record("b", [0.0, 1.0, 0.0, 0.0], "old", "a.docx"),
        ])
        .await
        .expect("can store batch");
    first.finalize(&index_dir, manifest(2)).expect("can finalize");

    let mut second = VectorIndex::create(&index_dir, DIM)
        .await
        .expect("can recreate index");
    second
        .store_batch(&[record("c", [0.5, 0.5, 0.0, 0.0], "new", "b.pptx")])
        .await
        .expect("can store batch");
    second
        .finalize(&index_dir, manifest(1))
        .expect("can finalize");

    let reopened = VectorIndex::open(&index_dir, "stub-model", DIM)
        .await
        .expect("can reopen index");
    assert_eq!(reopened.count().await.expect("can count"), 1);
}
