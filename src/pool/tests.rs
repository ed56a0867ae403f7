use super::{Article, CandidatePool};

fn article(doi: &str, title: &str) -> Article {
    Article {
        title: title.to_string(),
        authors: String::new(),
        year: Some(2021),
        doi: doi.to_string(),
        source: "OpenAlex".to_string(),
        pdf_url: String::new(),
        abstract_text: String::new(),
    }
}

#[test]
fn test_add_candidates_dedupes_by_doi() {
    let pool = CandidatePool::new();

    let inserted = pool.add_candidates(&[
        article("10.1/aaa", "one"),
        article("10.1/bbb", "two"),
        article("10.1/aaa", "one again"),
    ]);

    assert_eq!(inserted, 2);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_add_candidates_is_idempotent() {
    let pool = CandidatePool::new();
    pool.add_candidates(&[article("10.1/aaa", "one")]);

    let inserted = pool.add_candidates(&[article("10.1/aaa", "one")]);
    assert_eq!(inserted, 0);
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_dedup_is_case_insensitive() {
    let pool = CandidatePool::new();
    pool.add_candidates(&[article("10.1/AAA", "upper")]);
    pool.add_candidates(&[article("10.1/aaa", "lower")]);

    assert_eq!(pool.len(), 1);
    // First occurrence wins, fields are not overwritten.
    assert_eq!(pool.snapshot()[0].title, "upper");
}

#[test]
fn test_missing_doi_dropped_silently() {
    let pool = CandidatePool::new();
    let inserted = pool.add_candidates(&[article("", "no doi"), article("  ", "whitespace doi")]);

    assert_eq!(inserted, 0);
    assert!(pool.is_empty());
}

#[test]
fn test_insertion_order_preserved() {
    let pool = CandidatePool::new();
    pool.add_candidates(&[article("10.1/c", "c"), article("10.1/a", "a")]);
    pool.add_candidates(&[article("10.1/b", "b"), article("10.1/a", "dup")]);

    let dois: Vec<String> = pool.snapshot().iter().map(|a| a.doi.clone()).collect();
    assert_eq!(dois, vec!["10.1/c", "10.1/a", "10.1/b"]);
}

#[test]
fn test_doi_matches() {
    let art = article("10.1/AbC", "x");
    assert!(art.doi_matches(Some("10.1/abc")));
    assert!(art.doi_matches(Some("10.1/ABC")));
    assert!(!art.doi_matches(Some("10.1/other")));
    assert!(!art.doi_matches(None));
}
