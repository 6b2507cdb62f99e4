//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::{CacheOverview, CacheRegistry};
use crate::error::{CacheError, Result};
use crate::models::{ClearResponse, HealthResponse, InvalidateRequest, InvalidateResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide caches
    pub cache: Arc<CacheRegistry>,
}

impl AppState {
    /// Creates a new AppState around an existing registry.
    pub fn new(cache: CacheRegistry) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheRegistry::from_config(config))
    }
}

/// Runs a registry operation on the blocking pool.
///
/// Page cache operations touch the filesystem and may scan the whole cache
/// directory, so they stay off the async workers.
async fn with_registry<T, F>(state: &AppState, op: F) -> Result<T>
where
    F: FnOnce(&CacheRegistry) -> T + Send + 'static,
    T: Send + 'static,
{
    let cache = Arc::clone(&state.cache);
    tokio::task::spawn_blocking(move || op(cache.as_ref()))
        .await
        .map_err(|e| CacheError::Internal(format!("cache task failed: {}", e)))
}

/// Handler for GET /cache/stats
///
/// Returns metrics and per-cache entry counts.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<CacheOverview>> {
    let overview = with_registry(&state, CacheRegistry::overview).await?;
    Ok(Json(overview))
}

/// Handler for POST /cache/invalidate
///
/// Called by content mutation paths after a successful write.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let InvalidateRequest { page, lang } = req;
    let (page, lang) = with_registry(&state, move |cache| {
        cache.invalidate_content_caches(page.as_deref(), lang.as_deref());
        (page, lang)
    })
    .await?;

    Ok(Json(InvalidateResponse::new(page, lang)))
}

/// Handler for DELETE /cache
///
/// Empties every cache; lifetime metrics are kept.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    with_registry(&state, CacheRegistry::clear_all_caches).await?;
    Ok(Json(ClearResponse::new()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
