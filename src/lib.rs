//! CMS Cache - TTL caching and invalidation core for a multilingual CMS
//!
//! Provides in-memory text and image caches, a disk-backed rendered-page
//! cache, shared hit/miss metrics, and fan-out invalidation on content changes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::CacheRegistry;
pub use config::Config;
