//! Cache Module
//!
//! TTL-governed caches for page texts, image metadata and rendered pages,
//! the shared metrics aggregator, and the registry tying them together.

mod entry;
mod image;
pub mod keys;
mod lock;
mod metrics;
mod page;
mod registry;
mod store;
mod text;


// Re-export public types
pub use entry::{current_timestamp_ms, current_timestamp_secs, CacheEntry};
pub use image::{ImageCache, ImageRecord, DEFAULT_IMAGE_TTL};
pub use metrics::{
    measure_render_time, measure_render_time_async, CacheMetrics, MetricsSnapshot, RenderSample,
    RenderTimer, RENDER_SAMPLE_CAPACITY,
};
pub use page::{PageCache, PageCacheStats, RenderedPage, DEFAULT_PAGE_TTL};
pub use registry::{CacheOverview, CacheRegistry};
pub use store::{StoreStats, TtlStore};
pub use text::{PageTexts, TextCache, DEFAULT_TEXT_TTL};
