//! Image Cache Module
//!
//! Caches image metadata lists per image type (logo, slider, background, ...).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::keys::{image_key, image_prefix};
use super::metrics::CacheMetrics;
use super::store::{StoreStats, TtlStore};

/// Default image cache TTL in seconds.
pub const DEFAULT_IMAGE_TTL: u64 = 600;

// == Image Record ==
/// Metadata of one stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Public path of the optimized image
    pub path: String,
    /// Path of the uploaded original, when kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
}

impl ImageRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_path: None,
        }
    }
}

// == Image Cache ==
#[derive(Debug)]
pub struct ImageCache {
    store: TtlStore<Vec<ImageRecord>>,
}

impl ImageCache {
    pub fn new(default_ttl: u64, metrics: Arc<CacheMetrics>) -> Self {
        Self {
            store: TtlStore::new("images", default_ttl, metrics),
        }
    }

    pub fn get(&self, image_type: &str) -> Option<Vec<ImageRecord>> {
        self.store.get(&image_key(image_type))
    }

    pub fn set(&self, image_type: &str, images: Vec<ImageRecord>, ttl: Option<u64>) {
        self.store.set(image_key(image_type), images, ttl);
    }

    /// Drops the cached list for one image type.
    pub fn invalidate_type(&self, image_type: &str) -> bool {
        self.store.invalidate(&image_key(image_type))
    }

    /// Drops every cached image list.
    pub fn invalidate_all(&self) -> usize {
        self.store.invalidate_prefix(&image_prefix())
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn get_stats(&self) -> StoreStats {
        self.store.get_stats()
    }
}
