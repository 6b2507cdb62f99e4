//! Cache Metrics Module
//!
//! Process-wide hit/miss/set/invalidation counters shared by every cache,
//! plus a bounded history of page render durations.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::entry::current_timestamp_secs;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::metrics";

/// Number of render-time samples retained.
pub const RENDER_SAMPLE_CAPACITY: usize = 100;

// == Render Sample ==
/// One recorded render duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSample {
    /// Unix seconds when the sample was recorded
    pub timestamp: f64,
    /// How long the render took
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct MetricsState {
    hits: u64,
    misses: u64,
    sets: u64,
    invalidations: u64,
    render_times: VecDeque<RenderSample>,
}

// == Cache Metrics ==
/// Lifetime cache statistics.
///
/// Counters only ever grow; clearing a cache does not reset them.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    state: Mutex<MetricsState>,
}

// == Metrics Snapshot ==
/// Derived statistics as reported to the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub invalidations: u64,
    /// Percentage of lookups that hit, rounded to 2 decimals
    pub hit_rate_percent: f64,
    /// Mean of retained render samples in milliseconds, rounded to 2 decimals
    pub avg_render_time_ms: f64,
    /// hits + misses
    pub total_requests: u64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new aggregator with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        mutex_lock(&self.state, SOURCE, "record_hit").hits += 1;
    }

    pub fn record_miss(&self) {
        mutex_lock(&self.state, SOURCE, "record_miss").misses += 1;
    }

    pub fn record_set(&self) {
        mutex_lock(&self.state, SOURCE, "record_set").sets += 1;
    }

    pub fn record_invalidation(&self) {
        self.record_invalidations(1);
    }

    /// Records several invalidations in one critical section.
    pub fn record_invalidations(&self, count: usize) {
        if count == 0 {
            return;
        }
        mutex_lock(&self.state, SOURCE, "record_invalidations").invalidations += count as u64;
    }

    // == Record Render Time ==
    /// Appends a render sample, keeping only the most recent
    /// [`RENDER_SAMPLE_CAPACITY`] samples.
    pub fn record_render_time(&self, duration: Duration) {
        let mut state = mutex_lock(&self.state, SOURCE, "record_render_time");
        state.render_times.push_back(RenderSample {
            timestamp: current_timestamp_secs(),
            duration,
        });
        while state.render_times.len() > RENDER_SAMPLE_CAPACITY {
            state.render_times.pop_front();
        }
    }

    /// Returns the retained render samples, oldest first.
    pub fn render_samples(&self) -> Vec<RenderSample> {
        mutex_lock(&self.state, SOURCE, "render_samples")
            .render_times
            .iter()
            .copied()
            .collect()
    }

    // == Stats ==
    /// Computes a snapshot of the counters and derived rates.
    pub fn get_stats(&self) -> MetricsSnapshot {
        let state = mutex_lock(&self.state, SOURCE, "get_stats");

        let total_requests = state.hits + state.misses;
        let hit_rate_percent = if total_requests == 0 {
            0.0
        } else {
            round2(state.hits as f64 / total_requests as f64 * 100.0)
        };

        let avg_render_time_ms = if state.render_times.is_empty() {
            0.0
        } else {
            let total: f64 = state
                .render_times
                .iter()
                .map(|s| s.duration.as_secs_f64())
                .sum();
            round2(total / state.render_times.len() as f64 * 1000.0)
        };

        MetricsSnapshot {
            hits: state.hits,
            misses: state.misses,
            sets: state.sets,
            invalidations: state.invalidations,
            hit_rate_percent,
            avg_render_time_ms,
            total_requests,
        }
    }

    /// Starts timing a render; see [`RenderTimer`].
    pub fn start_render(&self) -> RenderTimer<'_> {
        RenderTimer {
            metrics: self,
            started: Instant::now(),
            armed: true,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// == Render Timer ==
/// Scoped render timer.
///
/// Records the elapsed time when dropped. Nothing is recorded if the timer
/// was cancelled or the thread is unwinding from a panic.
#[must_use = "dropping the timer immediately records a near-zero sample"]
pub struct RenderTimer<'a> {
    metrics: &'a CacheMetrics,
    started: Instant,
    armed: bool,
}

impl RenderTimer<'_> {
    /// Discards the measurement.
    pub fn cancel(mut self) {
        self.armed = false;
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for RenderTimer<'_> {
    fn drop(&mut self) {
        if self.armed && !std::thread::panicking() {
            self.metrics.record_render_time(self.started.elapsed());
        }
    }
}

// == Instrumented Calls ==
/// Runs `render`, recording its duration when it returns `Ok`.
///
/// The result is passed through untouched; an `Err` records no sample.
pub fn measure_render_time<T, E, F>(metrics: &CacheMetrics, render: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    let timer = metrics.start_render();
    let result = render();
    if result.is_err() {
        timer.cancel();
    }
    result
}

/// Async counterpart of [`measure_render_time`].
pub async fn measure_render_time_async<T, E, Fut>(
    metrics: &CacheMetrics,
    render: Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    let result = render.await;
    if result.is_ok() {
        metrics.record_render_time(started.elapsed());
    }
    result
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let stats = CacheMetrics::new().get_stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.invalidations, 0);
        assert_eq!(stats.total_requests, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheMetrics::new().get_stats().hit_rate_percent, 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let metrics = CacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let stats = metrics.get_stats();
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.hit_rate_percent, 66.67);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let metrics = CacheMetrics::new();
        for _ in 0..4 {
            metrics.record_hit();
        }
        assert_eq!(metrics.get_stats().hit_rate_percent, 100.0);
    }

    #[test]
    fn test_sets_and_invalidations() {
        let metrics = CacheMetrics::new();
        metrics.record_set();
        metrics.record_invalidation();
        metrics.record_invalidations(3);
        metrics.record_invalidations(0);

        let stats = metrics.get_stats();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.invalidations, 4);
        assert_eq!(stats.total_requests, 0);
    }

    #[test]
    fn test_avg_render_time() {
        let metrics = CacheMetrics::new();
        metrics.record_render_time(Duration::from_millis(10));
        metrics.record_render_time(Duration::from_millis(20));

        assert_eq!(metrics.get_stats().avg_render_time_ms, 15.0);
    }

    #[test]
    fn test_render_samples_bounded() {
        let metrics = CacheMetrics::new();
        for i in 0..(RENDER_SAMPLE_CAPACITY as u64 + 20) {
            metrics.record_render_time(Duration::from_millis(i));
        }

        let samples = metrics.render_samples();
        assert_eq!(samples.len(), RENDER_SAMPLE_CAPACITY);
        // The oldest 20 were dropped
        assert_eq!(samples[0].duration, Duration::from_millis(20));
        assert_eq!(
            samples[RENDER_SAMPLE_CAPACITY - 1].duration,
            Duration::from_millis(RENDER_SAMPLE_CAPACITY as u64 + 19)
        );
    }

    #[test]
    fn test_measure_render_time_records_success() {
        let metrics = CacheMetrics::new();
        let result: Result<&str, ()> = measure_render_time(&metrics, || Ok("<html>"));

        assert_eq!(result, Ok("<html>"));
        assert_eq!(metrics.render_samples().len(), 1);
    }

    #[test]
    fn test_measure_render_time_skips_error() {
        let metrics = CacheMetrics::new();
        let result: Result<(), String> =
            measure_render_time(&metrics, || Err("template missing".to_string()));

        assert_eq!(result, Err("template missing".to_string()));
        assert!(metrics.render_samples().is_empty());
    }

    #[test]
    fn test_render_timer_records_on_drop() {
        let metrics = CacheMetrics::new();
        {
            let _timer = metrics.start_render();
        }
        assert_eq!(metrics.render_samples().len(), 1);

        metrics.start_render().cancel();
        assert_eq!(metrics.render_samples().len(), 1);
    }

    #[test]
    fn test_render_timer_skips_panic() {
        let metrics = CacheMetrics::new();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _timer = metrics.start_render();
            panic!("render blew up");
        }));

        assert!(outcome.is_err());
        assert!(metrics.render_samples().is_empty());
    }

    #[tokio::test]
    async fn test_measure_render_time_async() {
        let metrics = CacheMetrics::new();
        let ok: Result<u32, ()> = measure_render_time_async(&metrics, async { Ok(7) }).await;
        let err: Result<u32, ()> = measure_render_time_async(&metrics, async { Err(()) }).await;

        assert_eq!(ok, Ok(7));
        assert!(err.is_err());
        assert_eq!(metrics.render_samples().len(), 1);
    }
}
