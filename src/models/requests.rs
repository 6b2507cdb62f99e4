//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /cache/invalidate
///
/// Both fields are optional; omitting both invalidates every cache.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Page whose texts and rendered output changed
    #[serde(default)]
    pub page: Option<String>,
    /// Language whose rendered output changed
    #[serde(default)]
    pub lang: Option<String>,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Some("Page cannot be empty".to_string());
        }
        if self.lang.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Some("Language cannot be empty".to_string());
        }
        None
    }
}
