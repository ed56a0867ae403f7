//! Shared handler state.

use std::sync::Arc;

use crate::pdf::PdfStore;
use crate::service::DiscoveryService;

/// State threaded through every gateway handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DiscoveryService>,
    pub pdf_store: Arc<PdfStore>,
}

impl AppState {
    pub fn new(service: Arc<DiscoveryService>, pdf_store: Arc<PdfStore>) -> Self {
        Self { service, pdf_store }
    }
}
