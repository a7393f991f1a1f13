
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;

/// Extract paragraph text from a `.docx` word-processor file.
///
/// The document body lives in `word/document.xml`; visible text is carried
/// by `<w:t>` runs, with `</w:p>` closing each paragraph.
#[inline]
pub fn extract_docx(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    extract_docx_from_reader(file)
}

#[inline]
pub fn extract_docx_from_reader<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader).context("Not a valid docx archive")?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("Archive is missing word/document.xml")?
        .read_to_string(&mut document_xml)
        .context("Failed to read word/document.xml")?;

    let text = collect_runs(&document_xml, "w:t", "w:p")?;
    debug!("Extracted {} characters from word document", text.chars().count());
    Ok(text)
}

/// Extract slide text from a `.pptx` slide deck, slides in deck order.
///
/// Each slide is a separate `ppt/slides/slideN.xml` entry; text runs are
/// `<a:t>` elements, paragraphs close with `</a:p>`.
#[inline]
pub fn extract_pptx(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    extract_pptx_from_reader(file)
}

#[inline]
pub fn extract_pptx_from_reader<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader).context("Not a valid pptx archive")?;

    let mut slide_names: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|number| (number, name.to_string())))
        .collect();
    slide_names.sort_unstable_by_key(|(number, _)| *number);

    if slide_names.is_empty() {
        return Err(anyhow!("Archive contains no slides"));
    }

    let mut slides = Vec::with_capacity(slide_names.len());
    for (_, name) in slide_names {
        let mut slide_xml = String::new();
        archive
            .by_name(&name)
            .with_context(|| format!("Failed to open slide entry {name}"))?
            .read_to_string(&mut slide_xml)
            .with_context(|| format!("Failed to read slide entry {name}"))?;

        let slide_text = collect_runs(&slide_xml, "a:t", "a:p")?;
        if !slide_text.trim().is_empty() {
            slides.push(slide_text.trim_end().to_string());
        }
    }

    debug!("Extracted text from {} slides", slides.len());
    Ok(slides.join("\n\n"))
}

/// Parse a slide entry name like `ppt/slides/slide12.xml` into its number
fn slide_number(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("ppt/slides/slide")?;
    let digits = rest.strip_suffix(".xml")?;
    digits.parse().ok()
}

/// Walk the XML event stream collecting the text of `text_tag` runs,
/// inserting a newline whenever `paragraph_tag` closes.
fn collect_runs(xml: &str, text_tag: &str, paragraph_tag: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut output = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref element)) => {
                if element.name().as_ref() == text_tag.as_bytes() {
                    in_text_run = true;
                }
            }
            Ok(Event::End(ref element)) => {
                let name = element.name();
                if name.as_ref() == text_tag.as_bytes() {
                    in_text_run = false;
                } else if name.as_ref() == paragraph_tag.as_bytes() {
                    output.push('\n');
                }
            }
            Ok(Event::Text(ref text)) => {
                if in_text_run {
                    let unescaped = text
                        .unescape()
                        .context("Invalid XML text content")?;
                    output.push_str(&unescaped);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(anyhow!(
                    "XML parse error at position {}: {e}",
                    reader.buffer_position()
                ));
            }
        }
        buf.clear();
    }

    Ok(output)
}
