//! Configuration Module
//!
//! Handles loading cache TTLs, the page cache directory and the admin server
//! port from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{DEFAULT_IMAGE_TTL, DEFAULT_PAGE_TTL, DEFAULT_TEXT_TTL};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for the text cache
    pub text_ttl: u64,
    /// Default TTL in seconds for the image cache
    pub image_ttl: u64,
    /// Default TTL in seconds for rendered pages on disk
    pub page_ttl: u64,
    /// Directory holding rendered page cache files
    pub page_cache_dir: PathBuf,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TEXT_CACHE_TTL` - Text cache TTL in seconds (default: 300)
    /// - `IMAGE_CACHE_TTL` - Image cache TTL in seconds (default: 600)
    /// - `PAGE_CACHE_TTL` - Rendered page TTL in seconds (default: 3600)
    /// - `PAGE_CACHE_DIR` - Rendered page cache directory (default: cache/pages)
    /// - `SERVER_PORT` - Admin HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            text_ttl: parse_env("TEXT_CACHE_TTL").unwrap_or(defaults.text_ttl),
            image_ttl: parse_env("IMAGE_CACHE_TTL").unwrap_or(defaults.image_ttl),
            page_ttl: parse_env("PAGE_CACHE_TTL").unwrap_or(defaults.page_ttl),
            page_cache_dir: env::var("PAGE_CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.page_cache_dir),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_ttl: DEFAULT_TEXT_TTL,
            image_ttl: DEFAULT_IMAGE_TTL,
            page_ttl: DEFAULT_PAGE_TTL,
            page_cache_dir: PathBuf::from("cache/pages"),
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.text_ttl, 300);
        assert_eq!(config.image_ttl, 600);
        assert_eq!(config.page_ttl, 3600);
        assert_eq!(config.page_cache_dir, PathBuf::from("cache/pages"));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("TEXT_CACHE_TTL");
        env::remove_var("IMAGE_CACHE_TTL");
        env::remove_var("PAGE_CACHE_TTL");
        env::remove_var("PAGE_CACHE_DIR");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.text_ttl, 300);
        assert_eq!(config.image_ttl, 600);
        assert_eq!(config.page_ttl, 3600);
        assert_eq!(config.page_cache_dir, PathBuf::from("cache/pages"));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        env::set_var("CMS_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(parse_env::<u64>("CMS_CACHE_TEST_GARBAGE"), None);
        env::remove_var("CMS_CACHE_TEST_GARBAGE");
    }
}
