use std::collections::HashMap;

use super::doaj::{Identifier, doi_from_identifiers};
use super::openalex::reconstruct_abstract;
use super::{SearchQuery, local_pdf_route, normalize_doi};

#[test]
fn test_normalize_doi_strips_url_prefixes() {
    assert_eq!(normalize_doi("https://doi.org/10.1234/abc"), "10.1234/abc");
    assert_eq!(normalize_doi("http://doi.org/10.1234/abc"), "10.1234/abc");
    assert_eq!(normalize_doi("doi.org/10.1234/abc"), "10.1234/abc");
    assert_eq!(normalize_doi(" 10.1234/abc "), "10.1234/abc");
}

#[test]
fn test_local_pdf_route_sanitizes() {
    assert_eq!(
        local_pdf_route("10.1234/ab/cd"),
        "/article/10.1234_ab_cd/pdf"
    );
}

#[test]
fn test_reconstruct_abstract_orders_by_position() {
    let mut index: HashMap<String, Vec<u32>> = HashMap::new();
    index.insert("the".to_string(), vec![0, 3]);
    index.insert("quick".to_string(), vec![1]);
    index.insert("fox".to_string(), vec![2]);
    index.insert("end".to_string(), vec![4]);

    assert_eq!(reconstruct_abstract(&index), "the quick fox the end");
}

#[test]
fn test_reconstruct_abstract_empty_index() {
    assert_eq!(reconstruct_abstract(&HashMap::new()), "");
}

#[test]
fn test_doi_from_identifiers_picks_doi_entry() {
    let identifiers = vec![
        Identifier {
            kind: Some("pissn".to_string()),
            id: Some("1234-5678".to_string()),
        },
        Identifier {
            kind: Some("doi".to_string()),
            id: Some("https://doi.org/10.1/x".to_string()),
        },
    ];

    assert_eq!(doi_from_identifiers(&identifiers), Some("10.1/x".to_string()));
}

#[test]
fn test_doi_from_identifiers_none_when_absent() {
    let identifiers = vec![Identifier {
        kind: Some("eissn".to_string()),
        id: Some("8765-4321".to_string()),
    }];
    assert_eq!(doi_from_identifiers(&identifiers), None);

    let empty_id = vec![Identifier {
        kind: Some("doi".to_string()),
        id: Some("".to_string()),
    }];
    assert_eq!(doi_from_identifiers(&empty_id), None);
}

#[test]
fn test_search_query_defaults() {
    let query = SearchQuery::new("machine learning");
    assert_eq!(query.query, "machine learning");
    assert_eq!(query.kind, "all");
    assert!(query.year_from.is_none());
    assert!(query.year_to.is_none());
}
