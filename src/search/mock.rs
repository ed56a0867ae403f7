//! Mock search adapter for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::StatusCode;

use super::error::SearchError;
use super::{SearchAdapter, SearchQuery};
use crate::pool::Article;

/// Fixed-result [`SearchAdapter`].
#[derive(Clone)]
pub struct MockSearchAdapter {
    name: &'static str,
    results: Arc<RwLock<Vec<Article>>>,
    fail: Arc<RwLock<bool>>,
}

impl MockSearchAdapter {
    pub fn new(name: &'static str, results: Vec<Article>) -> Self {
        Self {
            name,
            results: Arc::new(RwLock::new(results)),
            fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Makes every search fail, to exercise partial fan-out.
    pub fn fail_all(&self) {
        *self.fail.write() = true;
    }

    pub fn set_results(&self, results: Vec<Article>) {
        *self.results.write() = results;
    }
}

#[async_trait]
impl SearchAdapter for MockSearchAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Article>, SearchError> {
        if *self.fail.read() {
            return Err(SearchError::Status {
                code: StatusCode::BAD_GATEWAY,
            });
        }
        Ok(self.results.read().clone())
    }
}
