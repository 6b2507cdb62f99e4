//! Page Cache Module
//!
//! Disk-backed cache of fully rendered pages. Each `(path, lang)` pair maps
//! to one JSON file named after a SHA-256 of `path:lang`, so entries survive
//! process restarts and are shared by every instance pointed at the same
//! directory.
//!
//! Every failure is absorbed here: unreadable or corrupted files become
//! misses (and are deleted), failed writes are logged and dropped.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::entry::current_timestamp_secs;
use super::keys::page_file_stem;
use super::lock::mutex_lock;
use super::metrics::CacheMetrics;
use crate::error::{CacheError, Result};

const SOURCE: &str = "cache::page";
const FILE_EXTENSION: &str = "json";

/// Default rendered page TTL in seconds.
pub const DEFAULT_PAGE_TTL: u64 = 3600;

// == Page Record ==
/// On-disk layout of one cached page.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PageRecord {
    content: String,
    metadata: Map<String, Value>,
    path: String,
    lang: String,
    created_at: f64,
    expires_at: f64,
}

impl PageRecord {
    fn is_expired_at(&self, now: f64) -> bool {
        now >= self.expires_at
    }
}

// == Rendered Page ==
/// A cached page as handed back to the render path.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub content: String,
    pub metadata: Map<String, Value>,
}

// == Page Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageCacheStats {
    pub total_files: usize,
    pub active_files: usize,
    /// Expired and unreadable files still on disk
    pub expired_files: usize,
    pub total_size_bytes: u64,
    pub cache_dir: String,
}

// == Page Cache ==
#[derive(Debug)]
pub struct PageCache {
    cache_dir: PathBuf,
    default_ttl: u64,
    /// Serializes all filesystem access made through this instance
    lock: Mutex<()>,
    metrics: Arc<CacheMetrics>,
}

impl PageCache {
    // == Constructor ==
    /// Opens (and creates if needed) the cache directory.
    ///
    /// A directory that cannot be created is only logged: every later
    /// operation then degrades to a miss.
    pub fn new(cache_dir: impl Into<PathBuf>, default_ttl: u64, metrics: Arc<CacheMetrics>) -> Self {
        let cache_dir = cache_dir.into();
        if let Err(err) = fs::create_dir_all(&cache_dir) {
            warn!(
                dir = %cache_dir.display(),
                error = %err,
                "Failed to create page cache directory"
            );
        }
        Self {
            cache_dir,
            default_ttl,
            lock: Mutex::new(()),
            metrics,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Location of the cache file for `(path, lang)`.
    pub fn file_path(&self, path: &str, lang: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{FILE_EXTENSION}", page_file_stem(path, lang)))
    }

    // == Get ==
    /// Returns the cached rendering of `path` in `lang`.
    ///
    /// Expired or corrupted files are deleted and reported as a miss.
    pub fn get(&self, path: &str, lang: &str) -> Option<RenderedPage> {
        let file = self.file_path(path, lang);
        let found = {
            let _guard = mutex_lock(&self.lock, SOURCE, "get");
            match read_record(&file) {
                Ok(Some(record)) if record.is_expired_at(current_timestamp_secs()) => {
                    debug!(path, lang, "page cache expired");
                    remove_cache_file(&file);
                    None
                }
                Ok(Some(record)) => Some(RenderedPage {
                    content: record.content,
                    metadata: record.metadata,
                }),
                Ok(None) => None,
                Err(err @ CacheError::Corrupt { .. }) => {
                    warn!(error = %err, "Removing corrupted page cache file");
                    remove_cache_file(&file);
                    None
                }
                Err(err) => {
                    warn!(error = %err, "Failed to read page cache file");
                    None
                }
            }
        };

        match found {
            Some(_) => {
                debug!(path, lang, "page cache hit");
                self.metrics.record_hit();
            }
            None => {
                debug!(path, lang, "page cache miss");
                self.metrics.record_miss();
            }
        }
        found
    }

    // == Set ==
    /// Writes a rendered page to disk.
    ///
    /// The file is written under a temporary name and renamed into place so a
    /// concurrent reader never sees a partial record. Failures are logged and
    /// otherwise ignored.
    pub fn set(
        &self,
        path: &str,
        lang: &str,
        content: impl Into<String>,
        metadata: Map<String, Value>,
        ttl: Option<u64>,
    ) {
        let ttl = ttl.filter(|t| *t > 0).unwrap_or(self.default_ttl);
        let now = current_timestamp_secs();
        let record = PageRecord {
            content: content.into(),
            metadata,
            path: path.to_string(),
            lang: lang.to_string(),
            created_at: now,
            expires_at: now + ttl as f64,
        };
        let file = self.file_path(path, lang);

        let written = {
            let _guard = mutex_lock(&self.lock, SOURCE, "set");
            self.write_record(&file, &record)
        };

        match written {
            Ok(()) => {
                debug!(path, lang, ttl, "page cache set");
                self.metrics.record_set();
            }
            Err(err) => warn!(error = %err, "Failed to write page cache file"),
        }
    }

    fn write_record(&self, file: &Path, record: &PageRecord) -> Result<()> {
        let body = serde_json::to_vec(record).map_err(|e| CacheError::corrupt(file, e))?;
        fs::create_dir_all(&self.cache_dir).map_err(|e| CacheError::io(&self.cache_dir, e))?;

        let tmp = file.with_extension(format!("{FILE_EXTENSION}.tmp"));
        fs::write(&tmp, body).map_err(|e| CacheError::io(&tmp, e))?;
        fs::rename(&tmp, file).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CacheError::io(file, e)
        })
    }

    // == Invalidate ==
    /// Deletes the cached rendering of `path` in `lang`, if any.
    pub fn invalidate(&self, path: &str, lang: &str) -> bool {
        let file = self.file_path(path, lang);
        let removed = {
            let _guard = mutex_lock(&self.lock, SOURCE, "invalidate");
            remove_cache_file(&file)
        };
        if removed {
            debug!(path, lang, "page cache invalidated");
            self.metrics.record_invalidation();
        }
        removed
    }

    /// Deletes every cached rendering of `path`, in any language.
    pub fn invalidate_path(&self, path: &str) -> usize {
        self.invalidate_matching("invalidate_path", |record| record.path == path)
    }

    /// Deletes every cached rendering in `lang`, for any path.
    pub fn invalidate_lang(&self, lang: &str) -> usize {
        self.invalidate_matching("invalidate_lang", |record| record.lang == lang)
    }

    /// Scans the whole directory and removes records matching `predicate`.
    ///
    /// File names are hashes, so finding all files of one path or language
    /// means parsing every file: cost grows linearly with the number of
    /// cached pages and the store lock is held for the whole scan.
    fn invalidate_matching<F>(&self, op: &'static str, predicate: F) -> usize
    where
        F: Fn(&PageRecord) -> bool,
    {
        let removed = {
            let _guard = mutex_lock(&self.lock, SOURCE, op);
            let mut removed = 0;
            for file in self.cache_files() {
                match read_record(&file) {
                    Ok(Some(record)) if predicate(&record) => {
                        if remove_cache_file(&file) {
                            removed += 1;
                        }
                    }
                    Ok(_) => {}
                    Err(err @ CacheError::Corrupt { .. }) => {
                        warn!(error = %err, "Removing corrupted page cache file");
                        remove_cache_file(&file);
                    }
                    Err(err) => warn!(error = %err, "Failed to read page cache file"),
                }
            }
            removed
        };

        debug!(op, removed, "page cache scan finished");
        self.metrics.record_invalidations(removed);
        removed
    }

    // == Clear ==
    /// Deletes every file in the cache directory. Metrics are left untouched.
    pub fn clear(&self) {
        let _guard = mutex_lock(&self.lock, SOURCE, "clear");
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %self.cache_dir.display(), error = %err, "Failed to list page cache");
                return;
            }
        };

        for entry in entries.flatten() {
            let file = entry.path();
            if file.is_file() {
                remove_cache_file(&file);
            }
        }
        debug!(dir = %self.cache_dir.display(), "page cache cleared");
    }

    // == Stats ==
    pub fn get_stats(&self) -> PageCacheStats {
        let _guard = mutex_lock(&self.lock, SOURCE, "get_stats");
        let now = current_timestamp_secs();
        let mut stats = PageCacheStats {
            cache_dir: self.cache_dir.display().to_string(),
            ..PageCacheStats::default()
        };

        for file in self.cache_files() {
            stats.total_files += 1;
            stats.total_size_bytes += fs::metadata(&file).map(|m| m.len()).unwrap_or(0);
            match read_record(&file) {
                Ok(Some(record)) if !record.is_expired_at(now) => stats.active_files += 1,
                _ => stats.expired_files += 1,
            }
        }
        stats
    }

    /// Lists the `*.json` files in the cache directory.
    fn cache_files(&self) -> Vec<PathBuf> {
        match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|file| file.extension().is_some_and(|ext| ext == FILE_EXTENSION))
                .collect(),
            Err(err) => {
                warn!(dir = %self.cache_dir.display(), error = %err, "Failed to list page cache");
                Vec::new()
            }
        }
    }
}

/// Reads one cache file. A missing file is `Ok(None)`.
fn read_record(file: &Path) -> Result<Option<PageRecord>> {
    let raw = match fs::read(file) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(CacheError::io(file, err)),
    };
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|e| CacheError::corrupt(file, e))
}

/// Deletes one cache file, returning whether it existed.
fn remove_cache_file(file: &Path) -> bool {
    match fs::remove_file(file) {
        Ok(()) => true,
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => {
            warn!(file = %file.display(), error = %err, "Failed to remove page cache file");
            false
        }
    }
}
