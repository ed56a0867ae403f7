use tempfile::TempDir;

use super::{PdfStore, extract_reference_dois};

#[test]
fn test_extracts_doi_citations() {
    let text = "See doi:10.1234/abc.def-1 and also DOI: 10.5555/XYZ;22 for details.";
    let dois = extract_reference_dois(text);
    assert_eq!(dois, vec!["10.1234/abc.def-1", "10.5555/XYZ;22"]);
}

#[test]
fn test_ignores_bare_dois_without_prefix() {
    // Only `doi:`-prefixed citations count as references.
    let text = "https://doi.org/10.1234/abc is a link, 10.1234/xyz is bare.";
    assert!(extract_reference_dois(text).is_empty());
}

#[test]
fn test_tolerates_whitespace_after_prefix() {
    let dois = extract_reference_dois("doi:   10.1000/182");
    assert_eq!(dois, vec!["10.1000/182"]);
}

#[test]
fn test_no_matches_on_empty_text() {
    assert!(extract_reference_dois("").is_empty());
}

#[test]
fn test_path_for_sanitizes_doi() {
    let dir = TempDir::new().expect("tempdir");
    let store = PdfStore::new(dir.path().to_path_buf(), reqwest::Client::new());

    let path = store.path_for("10.1234/ab/cd");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("10.1234_ab_cd.pdf")
    );
    assert!(!store.contains("10.1234/ab/cd"));
}

#[test]
fn test_load_bytes_roundtrip() {
    let dir = TempDir::new().expect("tempdir");
    let store = PdfStore::new(dir.path().to_path_buf(), reqwest::Client::new());

    std::fs::write(store.path_for("10.1/x"), b"%PDF-1.4 fake").expect("write");
    assert_eq!(store.load_bytes("10.1/x"), Some(b"%PDF-1.4 fake".to_vec()));
    assert_eq!(store.load_bytes("10.1/missing"), None);
}

#[test]
fn test_extract_text_on_garbage_is_none() {
    let dir = TempDir::new().expect("tempdir");
    let store = PdfStore::new(dir.path().to_path_buf(), reqwest::Client::new());

    std::fs::write(store.path_for("10.1/bad"), b"not a pdf at all").expect("write");
    assert!(store.extract_text("10.1/bad").is_none());
    assert!(store.extract_text("10.1/absent").is_none());
}
