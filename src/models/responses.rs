//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for POST /cache/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human-readable summary
    pub message: String,
    pub page: Option<String>,
    pub lang: Option<String>,
}

impl InvalidateResponse {
    pub fn new(page: Option<String>, lang: Option<String>) -> Self {
        let message = match (&page, &lang) {
            (None, None) => "All caches cleared".to_string(),
            (Some(page), None) => format!("Caches for page '{}' invalidated", page),
            (None, Some(lang)) => format!("Caches for language '{}' invalidated", lang),
            (Some(page), Some(lang)) => format!(
                "Caches for page '{}' and language '{}' invalidated",
                page, lang
            ),
        };
        Self {
            message,
            page,
            lang,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new() -> Self {
        Self {
            message: "All caches cleared".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_response_messages() {
        assert_eq!(InvalidateResponse::new(None, None).message, "All caches cleared");
        assert!(InvalidateResponse::new(Some("home".into()), None)
            .message
            .contains("'home'"));
        assert!(InvalidateResponse::new(None, Some("ru".into()))
            .message
            .contains("'ru'"));
    }

    #[test]
    fn test_invalidate_response_serialize() {
        let resp = InvalidateResponse::new(Some("home".into()), Some("en".into()));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""page":"home""#));
        assert!(json.contains(r#""lang":"en""#));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
