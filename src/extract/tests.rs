use std::path::Path;

use super::*;

#[test]
fn supported_extensions() {
    assert!(supported_extension(Path::new("data/handbook.docx")));
    assert!(supported_extension(Path::new("data/overview.pptx")));
    assert!(supported_extension(Path::new("data/fault-study.pdf")));
    // Extension matching must be case-insensitive
    assert!(supported_extension(Path::new("data/HANDBOOK.DOCX")));
    assert!(supported_extension(Path::new("data/Overview.PpTx")));

    assert!(!supported_extension(Path::new("data/readme.txt")));
    assert!(!supported_extension(Path::new("data/legacy.doc")));
    assert!(!supported_extension(Path::new("data/noextension")));
}

#[test]
fn unsupported_extension_is_an_extraction_error() {
    let result = extract_document(Path::new("data/readme.txt"));
    match result {
        Err(GridError::Extraction { file, .. }) => assert_eq!(file, "readme.txt"),
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_extraction_error() {
    let result = extract_document(Path::new("/nonexistent/manual.docx"));
    assert!(matches!(result, Err(GridError::Extraction { .. })));
}
