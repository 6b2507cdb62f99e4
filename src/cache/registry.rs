//! Cache Registry Module
//!
//! Owns the process-wide cache instances and fans content-change events out
//! to them.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::image::ImageCache;
use super::metrics::{CacheMetrics, MetricsSnapshot};
use super::page::{PageCache, PageCacheStats};
use super::store::StoreStats;
use super::text::TextCache;
use crate::config::Config;

// == Cache Overview ==
/// Combined statistics for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CacheOverview {
    pub metrics: MetricsSnapshot,
    pub texts: StoreStats,
    pub images: StoreStats,
    pub pages: PageCacheStats,
}

// == Cache Registry ==
/// Every cache used by the site, built once at startup and shared by
/// reference with request and mutation handlers.
///
/// Each cache has its own lock; operations spanning several caches are not
/// atomic, so a concurrent reader may briefly see one cache invalidated and
/// another not yet.
#[derive(Debug)]
pub struct CacheRegistry {
    pub texts: TextCache,
    pub images: ImageCache,
    pub pages: PageCache,
    pub metrics: Arc<CacheMetrics>,
}

impl CacheRegistry {
    // == Constructor ==
    pub fn new(
        text_ttl: u64,
        image_ttl: u64,
        page_cache_dir: impl Into<PathBuf>,
        page_ttl: u64,
    ) -> Self {
        let metrics = Arc::new(CacheMetrics::new());
        Self {
            texts: TextCache::new(text_ttl, Arc::clone(&metrics)),
            images: ImageCache::new(image_ttl, Arc::clone(&metrics)),
            pages: PageCache::new(page_cache_dir, page_ttl, Arc::clone(&metrics)),
            metrics,
        }
    }

    /// Builds every cache from configured TTLs and directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.text_ttl,
            config.image_ttl,
            config.page_cache_dir.clone(),
            config.page_ttl,
        )
    }

    // == Invalidate Content Caches ==
    /// Drops cached data made stale by a content change.
    ///
    /// - `page`: texts of that page in every language, and rendered pages
    ///   stored under that path.
    /// - `lang`: rendered pages in that language. The text cache is only
    ///   touched through `page`.
    /// - neither: every cache is cleared.
    pub fn invalidate_content_caches(&self, page: Option<&str>, lang: Option<&str>) {
        if page.is_none() && lang.is_none() {
            self.clear_all_caches();
            return;
        }

        if let Some(page) = page {
            let texts = self.texts.invalidate_page(page);
            let pages = self.pages.invalidate_path(page);
            info!(page, texts, pages, "Invalidated caches for page");
        }

        if let Some(lang) = lang {
            let pages = self.pages.invalidate_lang(lang);
            info!(lang, pages, "Invalidated caches for language");
        }
    }

    // == Clear All ==
    /// Empties every cache. Lifetime metrics are kept.
    pub fn clear_all_caches(&self) {
        self.texts.clear();
        self.images.clear();
        self.pages.clear();
        info!("All caches cleared");
    }

    // == Overview ==
    pub fn overview(&self) -> CacheOverview {
        CacheOverview {
            metrics: self.metrics.get_stats(),
            texts: self.texts.get_stats(),
            images: self.images.get_stats(),
            pages: self.pages.get_stats(),
        }
    }
}
