//! Text Cache Module
//!
//! Caches the text blocks of a page per language.

use std::collections::HashMap;
use std::sync::Arc;

use super::keys::{text_key, text_page_prefix};
use super::metrics::CacheMetrics;
use super::store::{StoreStats, TtlStore};

/// Text blocks of one page in one language, keyed by block name.
pub type PageTexts = HashMap<String, String>;

/// Default text cache TTL in seconds.
pub const DEFAULT_TEXT_TTL: u64 = 300;

// == Text Cache ==
#[derive(Debug)]
pub struct TextCache {
    store: TtlStore<PageTexts>,
}

impl TextCache {
    pub fn new(default_ttl: u64, metrics: Arc<CacheMetrics>) -> Self {
        Self {
            store: TtlStore::new("texts", default_ttl, metrics),
        }
    }

    /// Returns the cached texts for `page` in `lang`.
    pub fn get(&self, page: &str, lang: &str) -> Option<PageTexts> {
        self.store.get(&text_key(page, lang))
    }

    /// Caches `texts` for `page` in `lang`.
    ///
    /// The cache owns its copy; later changes to a caller's map are not seen.
    pub fn set(&self, page: &str, lang: &str, texts: PageTexts, ttl: Option<u64>) {
        self.store.set(text_key(page, lang), texts, ttl);
    }

    /// Drops the texts for one page and language.
    pub fn invalidate(&self, page: &str, lang: &str) -> bool {
        self.store.invalidate(&text_key(page, lang))
    }

    /// Drops the texts for `page` in every language.
    pub fn invalidate_page(&self, page: &str) -> usize {
        self.store.invalidate_prefix(&text_page_prefix(page))
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn get_stats(&self) -> StoreStats {
        self.store.get_stats()
    }
}
