//! API Module
//!
//! HTTP handlers and routing for the cache admin API consumed by the CMS
//! dashboard and content mutation handlers.
//!
//! # Endpoints
//! - `GET /cache/stats` - Metrics and per-cache entry counts
//! - `POST /cache/invalidate` - Invalidate caches for a page and/or language
//! - `DELETE /cache` - Clear every cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
