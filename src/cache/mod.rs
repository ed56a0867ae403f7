//! File-backed JSON cache (one file per key).
//!
//! Keys are opaque strings; callers derive them from domain identifiers via
//! [`sanitize_key`]. Reads that fail for any reason are cache misses, never
//! errors. Writes are last-writer-wins with no expiry and no size bound.


use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const CACHE_EXTENSION: &str = "json";

const TEMP_EXTENSION: &str = "json.tmp";

/// Replaces path-unsafe characters in a domain identifier.
///
/// DOIs contain `/`, which cannot appear in a file name; the original cache
/// layout replaces it with `_` and that substitution is part of the on-disk
/// contract (PDF paths and cache keys must agree).
pub fn sanitize_key(raw: &str) -> String {
    raw.replace('/', "_")
}

/// Stores and retrieves JSON-serialized values under `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the root cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures the root cache directory exists.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{CACHE_EXTENSION}"))
    }

    fn temp_entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{TEMP_EXTENSION}"))
    }

    /// Loads the value cached under `key`, if present and parseable.
    ///
    /// Malformed content is discarded and treated as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "discarding malformed cache entry");
                None
            }
        }
    }

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// Failures are logged and swallowed: the cache is an optimization and a
    /// failed write must not abort the operation that produced the value.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_put(key, value) {
            warn!(key, error = %e, "cache write failed");
        }
    }

    fn try_put<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        self.ensure_dir()?;

        let bytes = serde_json::to_vec(value)?;

        let temp_path = self.temp_entry_path(key);
        let final_path = self.entry_path(key);

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
        }

        fs::rename(&temp_path, &final_path)?;
        Ok(())
    }

    /// Returns whether `key` currently has an entry on disk.
    pub fn contains(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }
}
