//! Local PDF storage, retrieval, and reference-DOI extraction.
//!
//! PDFs live at `<pdf_dir>/<sanitized-doi>.pdf`, the same sanitization used
//! for cache keys, so the serving route `/article/{doi}/pdf` resolves
//! deterministically.

mod error;

#[cfg(test)]
mod tests;

pub use error::PdfError;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::cache::sanitize_key;

/// Reference DOIs are recognized as `doi:10.NNNN/...` citations.
fn reference_doi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)doi:\s*(10\.\d{4,9}/[-._;()/:A-Z0-9]+)").expect("valid regex")
    })
}

/// Extracts candidate reference DOIs from PDF text.
pub fn extract_reference_dois(text: &str) -> Vec<String> {
    reference_doi_regex()
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Stores and serves article PDFs keyed by DOI.
#[derive(Debug, Clone)]
pub struct PdfStore {
    dir: PathBuf,
    client: reqwest::Client,
}

impl PdfStore {
    pub fn new(dir: PathBuf, client: reqwest::Client) -> Self {
        Self { dir, client }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures the PDF directory exists.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Deterministic on-disk path for a DOI's PDF.
    pub fn path_for(&self, doi: &str) -> PathBuf {
        self.dir.join(format!("{}.pdf", sanitize_key(doi)))
    }

    pub fn contains(&self, doi: &str) -> bool {
        self.path_for(doi).exists()
    }

    /// Downloads the PDF for `doi` from `url` unless it is already stored.
    ///
    /// Download failures are logged and swallowed; a missing PDF only means
    /// the article is skipped by the analysis pipeline later.
    pub async fn fetch(&self, doi: &str, url: &str) {
        let path = self.path_for(doi);
        if path.exists() {
            return;
        }

        if let Err(e) = self.try_fetch(&path, url).await {
            warn!(doi, url, error = %e, "failed to fetch PDF");
        }
    }

    async fn try_fetch(&self, path: &Path, url: &str) -> Result<(), PdfError> {
        self.ensure_dir()?;

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(PdfError::Status {
                code: resp.status(),
            });
        }

        let bytes = resp.bytes().await?;
        fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "PDF stored");
        Ok(())
    }

    /// Raw bytes of the stored PDF, if present.
    pub fn load_bytes(&self, doi: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(doi)).ok()
    }

    /// Extracted text of the stored PDF, if present and parseable.
    ///
    /// Parse failures are treated the same as a missing PDF.
    pub fn extract_text(&self, doi: &str) -> Option<String> {
        let path = self.path_for(doi);
        if !path.exists() {
            return None;
        }

        let document = match lopdf::Document::load(&path) {
            Ok(document) => document,
            Err(e) => {
                debug!(doi, error = %e, "failed to load stored PDF");
                return None;
            }
        };

        let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let mut text = String::new();
        for page_number in page_numbers {
            if let Ok(page_text) = document.extract_text(&[page_number]) {
                let trimmed = page_text.trim();
                if !trimmed.is_empty() {
                    text.push_str(trimmed);
                    text.push('\n');
                }
            }
        }

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
