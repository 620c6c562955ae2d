//! Prometheus metrics for codescope
//!
//! Search, query-cache and symbol-index counters exposed in the Prometheus
//! text format.

use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Once;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Search metrics
    // ============================================================================

    /// Total number of search requests
    pub static ref SEARCH_REQUESTS: Counter = Counter::with_opts(
        Opts::new(
            "codescope_search_requests_total",
            "Total number of search requests"
        )
    ).expect("Failed to create SEARCH_REQUESTS counter");

    /// Search request latency in seconds
    pub static ref SEARCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "codescope_search_latency_seconds",
            "Search request latency in seconds"
        ).buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0])
    ).expect("Failed to create SEARCH_LATENCY histogram");

    /// Number of search results returned per request
    pub static ref SEARCH_RESULTS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "codescope_search_results_count",
            "Number of search results returned per request"
        ).buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0])
    ).expect("Failed to create SEARCH_RESULTS histogram");

    /// Queries answered from the result cache
    pub static ref CACHE_HITS: Counter = Counter::with_opts(
        Opts::new(
            "codescope_query_cache_hits_total",
            "Queries answered from the result cache"
        )
    ).expect("Failed to create CACHE_HITS counter");

    /// Queries that had to be computed
    pub static ref CACHE_MISSES: Counter = Counter::with_opts(
        Opts::new(
            "codescope_query_cache_misses_total",
            "Queries that missed the result cache"
        )
    ).expect("Failed to create CACHE_MISSES counter");

    // ============================================================================
    // Index metrics
    // ============================================================================

    /// Number of full symbol index rebuilds
    pub static ref INDEX_REBUILDS: Counter = Counter::with_opts(
        Opts::new(
            "codescope_index_rebuilds_total",
            "Number of full symbol index rebuilds"
        )
    ).expect("Failed to create INDEX_REBUILDS counter");

    /// Files contributing symbols to the current index
    pub static ref INDEXED_FILES: Gauge = Gauge::with_opts(
        Opts::new(
            "codescope_indexed_files_total",
            "Files contributing symbols to the current index"
        )
    ).expect("Failed to create INDEXED_FILES gauge");

    /// Symbols in the current index
    pub static ref INDEXED_SYMBOLS: Gauge = Gauge::with_opts(
        Opts::new(
            "codescope_indexed_symbols_total",
            "Symbols in the current index"
        )
    ).expect("Failed to create INDEXED_SYMBOLS gauge");

    /// Time to rebuild the symbol index in seconds
    pub static ref INDEX_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "codescope_index_build_duration_seconds",
            "Time to rebuild the symbol index in seconds"
        ).buckets(vec![0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0])
    ).expect("Failed to create INDEX_LATENCY histogram");
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; only the first call registers.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(SEARCH_REQUESTS.clone()),
            Box::new(SEARCH_LATENCY.clone()),
            Box::new(SEARCH_RESULTS.clone()),
            Box::new(CACHE_HITS.clone()),
            Box::new(CACHE_MISSES.clone()),
            Box::new(INDEX_REBUILDS.clone()),
            Box::new(INDEXED_FILES.clone()),
            Box::new(INDEXED_SYMBOLS.clone()),
            Box::new(INDEX_LATENCY.clone()),
        ];

        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                tracing::error!("Failed to register metric: {}", e);
            }
        }
    });
}

/// Gather all metrics and encode them in Prometheus text format
///
/// Returns an empty string if encoding fails.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Metrics contained invalid UTF-8: {}", e);
        String::new()
    })
}

/// Index metric values in a human-readable form
///
/// Counters live in process memory, so a snapshot only covers work done by
/// the current process.
pub struct MetricSnapshot {
    pub index_rebuilds: f64,
    pub indexed_files: f64,
    pub indexed_symbols: f64,
    pub index_latency_avg: f64,
}

impl MetricSnapshot {
    /// Capture the current state of the index metrics
    pub fn capture() -> Self {
        Self {
            index_rebuilds: INDEX_REBUILDS.get(),
            indexed_files: INDEXED_FILES.get(),
            indexed_symbols: INDEXED_SYMBOLS.get(),
            index_latency_avg: calculate_histogram_avg(&INDEX_LATENCY),
        }
    }
}

fn calculate_histogram_avg(histogram: &Histogram) -> f64 {
    let count = histogram.get_sample_count();
    if count == 0 {
        return 0.0;
    }
    histogram.get_sample_sum() / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increment() {
        let initial = CACHE_HITS.get();
        CACHE_HITS.inc();
        assert!(CACHE_HITS.get() - initial >= 1.0);
    }

    #[test]
    fn test_histogram_observe() {
        let count_before = SEARCH_LATENCY.get_sample_count();
        SEARCH_LATENCY.observe(0.1);
        assert!(SEARCH_LATENCY.get_sample_count() > count_before);
    }

    #[test]
    fn test_register_twice_and_gather() {
        register_metrics();
        register_metrics();
        SEARCH_REQUESTS.inc();
        let output = gather_metrics();
        assert!(output.contains("codescope_search_requests_total"));
    }

    #[test]
    fn test_snapshot_values_non_negative() {
        let snapshot = MetricSnapshot::capture();
        assert!(snapshot.index_rebuilds >= 0.0);
        assert!(snapshot.indexed_symbols >= 0.0);
        assert!(snapshot.index_latency_avg >= 0.0);
    }
}
