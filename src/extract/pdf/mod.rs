
use std::path::Path;

use anyhow::{Result, anyhow};
use pdf_oxide::PdfDocument;
use pdf_oxide::converters::ConversionOptions;
use tracing::debug;

fn conversion_options() -> ConversionOptions {
    ConversionOptions {
        include_images: false,
        ..ConversionOptions::default()
    }
}

/// Extract the text of every page of a PDF, pages joined in order.
#[inline]
pub fn extract_pdf(path: &Path) -> Result<String> {
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("PDF path is not valid UTF-8: {}", path.display()))?;

    let mut document = PdfDocument::open(path_str)
        .map_err(|e| anyhow!("Failed to open PDF: {e}"))?;
    let page_count = document
        .page_count()
        .map_err(|e| anyhow!("Failed to read PDF page count: {e}"))?;

    let options = conversion_options();
    let mut pages = Vec::new();

    for page_index in 0..page_count {
        let page_text = document
            .to_markdown(page_index, &options)
            .map_err(|e| anyhow!("Failed to extract PDF page {}: {e}", page_index + 1))?;
        if !page_text.trim().is_empty() {
            pages.push(page_text.trim_end().to_string());
        }
    }

    if pages.is_empty() {
        return Err(anyhow!("PDF contains no extractable text"));
    }

    debug!("Extracted text from {} of {} PDF pages", pages.len(), page_count);
    Ok(pages.join("\n\n"))
}
