//! Page cache behavior across instances sharing one directory.

use std::fs;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use cms_cache::cache::{measure_render_time, CacheMetrics, PageCache};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

fn open(dir: &TempDir) -> PageCache {
    PageCache::new(dir.path(), 3600, Arc::new(CacheMetrics::new()))
}

fn metadata() -> Map<String, Value> {
    json!({"title": "Главная", "description": "Home page"})
        .as_object()
        .cloned()
        .unwrap()
}

#[test]
fn test_entries_survive_restart() {
    let dir = TempDir::new().unwrap();

    open(&dir).set("/", "ru", "<h1>Главная</h1>", metadata(), None);

    // A second instance stands in for a restarted process
    let page = open(&dir).get("/", "ru").expect("page should be cached");
    assert_eq!(page.content, "<h1>Главная</h1>");
    assert_eq!(page.metadata, metadata());
}

#[test]
fn test_invalidation_visible_to_other_instance() {
    let dir = TempDir::new().unwrap();
    let writer = open(&dir);
    let reader = open(&dir);

    writer.set("/about", "en", "about", Map::new(), None);
    writer.set("/about", "ru", "о нас", Map::new(), None);
    assert!(reader.get("/about", "en").is_some());

    writer.invalidate_path("/about");
    assert!(reader.get("/about", "en").is_none());
    assert!(reader.get("/about", "ru").is_none());
}

#[test]
fn test_truncated_file_is_removed() {
    let dir = TempDir::new().unwrap();
    let cache = open(&dir);

    cache.set("/", "en", "<h1>Home</h1>", metadata(), None);
    let file = cache.file_path("/", "en");
    let raw = fs::read(&file).unwrap();
    fs::write(&file, &raw[..raw.len() / 2]).unwrap();

    assert!(cache.get("/", "en").is_none());
    assert!(!file.exists());

    // The slot is usable again afterwards
    cache.set("/", "en", "<h1>Home</h1>", metadata(), None);
    assert!(cache.get("/", "en").is_some());
}

#[test]
fn test_expired_entry_is_miss_and_not_active() {
    let dir = TempDir::new().unwrap();
    let cache = open(&dir);

    cache.set("/", "en", "<h1>Home</h1>", Map::new(), Some(1));
    sleep(Duration::from_millis(1100));

    assert!(cache.get("/", "en").is_none());
    assert_eq!(cache.get_stats().active_files, 0);
}

#[test]
fn test_render_then_cache() {
    let dir = TempDir::new().unwrap();
    let metrics = Arc::new(CacheMetrics::new());
    let cache = PageCache::new(dir.path(), 3600, Arc::clone(&metrics));

    let html = match cache.get("/", "en") {
        Some(page) => page.content,
        None => {
            let rendered: Result<String, String> =
                measure_render_time(&metrics, || Ok("<h1>Home</h1>".to_string()));
            let html = rendered.unwrap();
            cache.set("/", "en", html.clone(), Map::new(), None);
            html
        }
    };

    assert_eq!(html, "<h1>Home</h1>");
    assert_eq!(cache.get("/", "en").unwrap().content, html);

    let stats = metrics.get_stats();
    assert_eq!((stats.hits, stats.misses, stats.sets), (1, 1, 1));
    assert_eq!(metrics.render_samples().len(), 1);
}
