// Document text extraction
// Pulls plain text out of the three supported source formats so the
// indexer never has to know how any of them are encoded on disk.

pub mod office;
pub mod pdf;

#[cfg(test)]
mod tests;

use std::path::Path;

use anyhow::anyhow;

pub use office::{extract_docx, extract_pptx};
pub use pdf::extract_pdf;

use crate::{GridError, Result};

/// A source document reduced to plain text plus its originating filename
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source_file: String,
    pub text: String,
}

/// Extensions the index builder will pick up from the documents directory
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["docx", "pptx", "pdf"];

#[inline]
pub fn supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Extract the text of a single source document, dispatching on extension.
/// Every per-file failure surfaces as [`GridError::Extraction`] so callers
/// can log and skip the file without aborting a whole build.
#[inline]
pub fn extract_document(path: &Path) -> Result<Document> {
    let source_file = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        "docx" => extract_docx(path),
        "pptx" => extract_pptx(path),
        "pdf" => extract_pdf(path),
        other => Err(anyhow!("Unsupported document extension: {other:?}")),
    }
    .map_err(|e| GridError::Extraction {
        file: source_file.clone(),
        reason: format!("{e:#}"),
    })?;

    Ok(Document { source_file, text })
}
