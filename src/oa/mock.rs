//! Mock OA lookup for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::StatusCode;

use super::error::OaError;
use super::{OaLocation, OaLookup, OaStatus};

/// In-memory [`OaLookup`] with a call counter.
#[derive(Default, Clone)]
pub struct MockOaLookup {
    statuses: Arc<RwLock<HashMap<String, OaStatus>>>,
    fail_all: Arc<RwLock<bool>>,
    calls: Arc<AtomicUsize>,
}

impl MockOaLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a downloadable OA status for `doi`.
    pub fn insert_oa(&self, doi: &str, pdf_url: &str) {
        self.insert(doi, OaStatus {
            is_oa: true,
            title: Some(format!("Title of {doi}")),
            journal_name: Some("Mock Journal".to_string()),
            best_oa_location: Some(OaLocation {
                url: None,
                url_for_pdf: Some(pdf_url.to_string()),
                license: Some("cc-by".to_string()),
            }),
        });
    }

    /// Registers an arbitrary status for `doi`.
    pub fn insert(&self, doi: &str, status: OaStatus) {
        self.statuses.write().insert(doi.to_string(), status);
    }

    /// Makes every lookup fail with a transport-style error.
    pub fn fail_all(&self) {
        *self.fail_all.write() = true;
    }

    /// Number of live lookups attempted (cache hits never reach this).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OaLookup for MockOaLookup {
    async fn lookup(&self, doi: &str) -> Result<OaStatus, OaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if *self.fail_all.read() {
            return Err(OaError::Status {
                code: StatusCode::SERVICE_UNAVAILABLE,
            });
        }

        match self.statuses.read().get(doi) {
            Some(status) => Ok(status.clone()),
            None => Err(OaError::Status {
                code: StatusCode::NOT_FOUND,
            }),
        }
    }
}
