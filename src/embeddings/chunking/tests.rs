use super::*;

fn config(max: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig {
        max_chunk_chars: max,
        overlap_chars: overlap,
    }
}

#[test]
fn short_text_is_a_single_chunk() {
    let chunks = split_text("The DC bus holds at 500 kV.", &ChunkingConfig::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], "The DC bus holds at 500 kV.");
}

#[test]
fn empty_and_whitespace_text_yield_no_chunks() {
    assert!(split_text("", &ChunkingConfig::default()).is_empty());
    assert!(split_text("   \n\t  ", &ChunkingConfig::default()).is_empty());
}

#[test]
fn chunk_length_never_exceeds_max() {
    let text = "abcdefghij".repeat(100);
    let config = config(73, 9);

    for chunk in split_text(&text, &config) {
        assert!(chunk.chars().count() <= 73);
    }
}

#[test]
fn consecutive_chunks_share_exact_overlap() {
    let text: String = ('a'..='z').cycle().take(2000).collect();
    let config = config(500, 50);
    let chunks = split_text(&text, &config);
    assert!(chunks.len() > 1);

    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let next: Vec<char> = pair[1].chars().collect();
        let tail: String = prev[prev.len() - 50..].iter().collect();
        let head: String = next[..50].iter().collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn all_but_last_chunk_are_full_length() {
    let text: String = "x".repeat(1234);
    let config = config(500, 50);
    let chunks = split_text(&text, &config);

    for chunk in &chunks[..chunks.len() - 1] {
        assert_eq!(chunk.chars().count(), 500);
    }
    assert!(chunks[chunks.len() - 1].chars().count() <= 500);
}

#[test]
fn splitting_is_character_based_not_byte_based() {
    // Three bytes per character in UTF-8; byte slicing would panic or
    // produce invalid boundaries
    let text = "风电场直流母线电压稳定运行".repeat(100);
    let config = config(100, 10);
    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 100);
    }
    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let tail: String = prev[prev.len() - 10..].iter().collect();
        let head: String = pair[1].chars().take(10).collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn reconstruction_covers_original_text() {
    // Dropping each chunk's leading overlap must reproduce the input
    let text: String = ('0'..='9').cycle().take(1700).collect();
    let config = config(400, 40);
    let chunks = split_text(&text, &config);

    let mut rebuilt: String = chunks[0].clone();
    for chunk in &chunks[1..] {
        let fresh: String = chunk.chars().skip(40).collect();
        rebuilt.push_str(&fresh);
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn splitting_is_deterministic() {
    let text = "Grid-forming converters emulate synchronous machine behavior. ".repeat(40);
    let config = ChunkingConfig::default();

    assert_eq!(split_text(&text, &config), split_text(&text, &config));
}

#[test]
fn chunk_document_tags_source_and_index() {
    let document = Document {
        source_file: "fault-handbook.docx".to_string(),
        text: "z".repeat(1100),
    };

    let chunks = chunk_document(&document, &ChunkingConfig::default());

    assert!(chunks.len() > 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.source_file, "fault-handbook.docx");
        assert_eq!(chunk.chunk_index, i);
    }
}

#[test]
fn zero_max_yields_no_chunks() {
    let chunks = split_text("some text", &config(0, 0));
    assert!(chunks.is_empty());
}
