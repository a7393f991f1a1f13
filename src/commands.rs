use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::GridError;
use crate::config::Config;
use crate::dashboard::{self, Session};
use crate::embeddings::encoder::{EMBEDDING_DIMENSION, EMBEDDING_MODEL_ID, LocalEncoder};
use crate::index::{IndexManifest, VectorIndex};
use crate::indexer::{IndexBuilder, list_documents};

/// Build the knowledge index from the documents directory
#[inline]
pub async fn run_build(docs_dir: Option<PathBuf>, index_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let docs_dir = docs_dir.unwrap_or_else(|| config.paths.docs_dir.clone());
    let index_dir = index_dir.unwrap_or_else(|| config.paths.index_dir.clone());

    info!("Building index from {} into {}", docs_dir.display(), index_dir.display());

    println!("📂 Scanning documents under {}...", docs_dir.display());
    println!("🧠 Loading embedding model {EMBEDDING_MODEL_ID}...");

    let mut encoder = LocalEncoder::new()?;
    let mut builder = IndexBuilder::new(&mut encoder, config.chunking.clone());

    let stats = builder
        .build(&docs_dir, &index_dir)
        .await
        .context("Index build failed")?;

    println!("✅ Knowledge base built at {}", index_dir.display());
    println!("  Documents indexed: {}", stats.documents_indexed);
    if stats.documents_failed > 0 {
        println!("  Documents skipped (unreadable): {}", stats.documents_failed);
    }
    println!("  Chunks created: {}", stats.chunks_created);
    println!("  Vector dimensions: {}", stats.dimension);

    Ok(())
}

/// Interactive question loop against the knowledge assistant
#[inline]
pub async fn run_chat() -> Result<()> {
    let config = Config::load()?;
    let mut session = Session::new();
    let mut assistant = None;

    dashboard::chat_widget(&config, &mut session, &mut assistant).await;

    Ok(())
}

/// The page-based monitoring console
#[inline]
pub async fn run_dashboard() -> Result<()> {
    let config = Config::load()?;
    dashboard::run(&config).await?;
    Ok(())
}

/// Show configuration, credential, document, and index health
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("📊 Gridwatch Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🔑 Credential:");
    match config.chat.resolve_api_key() {
        Some(_) => println!("   ✅ DEEPSEEK_API_KEY configured"),
        None => {
            println!("   ❌ No API key configured");
            println!("   Set DEEPSEEK_API_KEY or run 'gridwatch config'");
        }
    }

    println!();
    println!("📄 Documents ({}):", config.paths.docs_dir.display());
    match list_documents(&config.paths.docs_dir) {
        Ok(paths) if paths.is_empty() => {
            println!("   📭 No supported documents found (docx/pptx/pdf)");
        }
        Ok(paths) => {
            println!("   ✅ {} supported documents found", paths.len());
            for path in paths.iter().take(10) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    println!("      • {name}");
                }
            }
            if paths.len() > 10 {
                println!("      … and {} more", paths.len() - 10);
            }
        }
        Err(_) => {
            println!("   ❌ Documents directory does not exist");
        }
    }

    println!();
    println!("🔍 Knowledge Index ({}):", config.paths.index_dir.display());
    match IndexManifest::read(&config.paths.index_dir) {
        Ok(manifest) => {
            println!("   ✅ Built {} ({} chunks)", manifest.built_at, manifest.chunk_count);
            println!("   📋 Model: {} ({} dims)", manifest.model, manifest.dimension);

            if manifest.model != EMBEDDING_MODEL_ID || manifest.dimension != EMBEDDING_DIMENSION {
                println!(
                    "   ⚠️  Index model differs from this binary ({EMBEDDING_MODEL_ID}, {EMBEDDING_DIMENSION} dims); rebuild required"
                );
            } else {
                match VectorIndex::open(&config.paths.index_dir, &manifest.model, manifest.dimension)
                    .await
                {
                    Ok(index) => match index.count().await {
                        Ok(count) => println!("   📦 {count} vectors stored"),
                        Err(e) => println!("   ⚠️  Could not count vectors: {e}"),
                    },
                    Err(e) => println!("   ❌ Index unreadable: {e}"),
                }
            }
        }
        Err(GridError::IndexMissing(_)) => {
            println!("   📭 Not built yet (run 'gridwatch build')");
        }
        Err(e) => {
            println!("   ❌ {e}");
        }
    }

    println!();
    println!("🗺️  Map Data Service:");
    match dashboard::geomap::load_boundary() {
        dashboard::geomap::BoundaryData::Available { regions } => {
            println!("   ✅ Boundary data reachable ({regions} regions)");
        }
        dashboard::geomap::BoundaryData::Unavailable { reason } => {
            println!("   ⚠️  Unavailable: {reason}");
        }
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'gridwatch build' to (re)build the knowledge base");
    println!("   • Use 'gridwatch chat' to ask the assistant questions");
    println!("   • Use 'gridwatch dashboard' to open the monitoring console");

    Ok(())
}
