//! Prometheus-compatible metrics for Review Lens.
//!
//! Counts interpretations, low-confidence answers, formatted responses and
//! data-source failures, and tracks interpretation/execution latency.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::query::QueryDomain;
use crate::response::Persona;

/// Global metrics instance.
static METRICS: std::sync::OnceLock<Arc<Metrics>> = std::sync::OnceLock::new();

/// Get or initialize the global metrics instance.
pub fn get_metrics() -> Arc<Metrics> {
    METRICS.get_or_init(|| Arc::new(Metrics::new())).clone()
}

/// Latency buckets in seconds. Interpretation is sub-millisecond, so the
/// buckets start at 10µs.
fn default_latency_buckets() -> Vec<f64> {
    vec![
        0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
    ]
}

/// All metrics for Review Lens.
pub struct Metrics {
    /// Prometheus registry for all metrics.
    pub registry: Registry,

    // =========================================================================
    // Counters
    // =========================================================================
    /// Total number of queries interpreted.
    pub queries_interpreted_total: IntCounter,
    /// Interpretations below the low-confidence threshold.
    pub low_confidence_total: IntCounter,
    /// Interpretations per domain.
    pub domain_queries_total: IntCounterVec,
    /// Responses formatted per persona.
    pub responses_formatted_total: IntCounterVec,
    /// Data source failures.
    pub data_source_errors_total: IntCounter,

    // =========================================================================
    // Histograms (durations in seconds)
    // =========================================================================
    /// Interpretation duration in seconds.
    pub interpretation_duration_seconds: Histogram,
    /// Data source execution duration in seconds.
    pub execution_duration_seconds: Histogram,

    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance with all metrics registered.
    pub fn new() -> Self {
        let registry = Registry::new();

        let queries_interpreted_total = IntCounter::new(
            "review_lens_queries_interpreted_total",
            "Total number of queries interpreted",
        )
        .expect("failed to create counter");

        let low_confidence_total = IntCounter::new(
            "review_lens_low_confidence_total",
            "Interpretations below the low-confidence threshold",
        )
        .expect("failed to create counter");

        let domain_queries_total = IntCounterVec::new(
            Opts::new(
                "review_lens_domain_queries_total",
                "Interpreted queries by domain",
            ),
            &["domain"],
        )
        .expect("failed to create counter vec");

        let responses_formatted_total = IntCounterVec::new(
            Opts::new(
                "review_lens_responses_formatted_total",
                "Formatted responses by persona",
            ),
            &["persona"],
        )
        .expect("failed to create counter vec");

        let data_source_errors_total = IntCounter::new(
            "review_lens_data_source_errors_total",
            "Total number of data source failures",
        )
        .expect("failed to create counter");

        let interpretation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "review_lens_interpretation_duration_seconds",
                "Query interpretation duration in seconds",
            )
            .buckets(default_latency_buckets()),
        )
        .expect("failed to create histogram");

        let execution_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "review_lens_execution_duration_seconds",
                "Data source execution duration in seconds",
            )
            .buckets(default_latency_buckets()),
        )
        .expect("failed to create histogram");

        registry
            .register(Box::new(queries_interpreted_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(low_confidence_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(domain_queries_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(responses_formatted_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(data_source_errors_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(interpretation_duration_seconds.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(execution_duration_seconds.clone()))
            .expect("failed to register metric");

        Self {
            registry,
            queries_interpreted_total,
            low_confidence_total,
            domain_queries_total,
            responses_formatted_total,
            data_source_errors_total,
            interpretation_duration_seconds,
            execution_duration_seconds,
            start_time: Instant::now(),
        }
    }

    /// Record one finished interpretation.
    pub fn record_interpretation(
        &self,
        domain: QueryDomain,
        confidence: f64,
        low_confidence_threshold: f64,
        elapsed: Duration,
    ) {
        self.queries_interpreted_total.inc();
        self.domain_queries_total
            .with_label_values(&[domain.as_str()])
            .inc();
        if confidence < low_confidence_threshold {
            self.low_confidence_total.inc();
        }
        self.interpretation_duration_seconds
            .observe(elapsed.as_secs_f64());
    }

    /// Record one formatted response.
    pub fn record_response(&self, persona: Persona) {
        self.responses_formatted_total
            .with_label_values(&[persona.as_str()])
            .inc();
    }

    /// Seconds since this instance was created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Export metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::warn!(error = %e, "failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Export metrics as JSON.
    pub fn export_json(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_interpreted_total: self.queries_interpreted_total.get(),
            low_confidence_total: self.low_confidence_total.get(),
            data_source_errors_total: self.data_source_errors_total.get(),
            uptime_seconds: self.uptime().as_secs(),
            interpretation_duration_seconds: HistogramSnapshot::from_prometheus(
                &self.interpretation_duration_seconds,
            ),
            execution_duration_seconds: HistogramSnapshot::from_prometheus(
                &self.execution_duration_seconds,
            ),
        }
    }

    /// Start a timer that records duration to a histogram when dropped.
    pub fn start_timer(histogram: &Histogram) -> HistogramTimer {
        HistogramTimer {
            histogram: histogram.clone(),
            start: Instant::now(),
        }
    }
}

/// Timer that records duration to a histogram when dropped.
pub struct HistogramTimer {
    histogram: Histogram,
    start: Instant,
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

impl HistogramTimer {
    /// Elapsed time so far; the duration is still recorded on drop.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Snapshot of the scalar metrics for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub queries_interpreted_total: u64,
    pub low_confidence_total: u64,
    pub data_source_errors_total: u64,
    pub uptime_seconds: u64,
    pub interpretation_duration_seconds: HistogramSnapshot,
    pub execution_duration_seconds: HistogramSnapshot,
}

/// Snapshot of a histogram for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub sum: f64,
    pub mean: Option<f64>,
}

impl HistogramSnapshot {
    /// Create a snapshot from a prometheus histogram.
    pub fn from_prometheus(h: &Histogram) -> Self {
        let sample_count = h.get_sample_count();
        let sample_sum = h.get_sample_sum();
        let mean = if sample_count > 0 {
            Some(sample_sum / sample_count as f64)
        } else {
            None
        };
        Self {
            count: sample_count,
            sum: sample_sum,
            mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_interpretation() {
        let metrics = Metrics::new();
        metrics.record_interpretation(QueryDomain::Loyalty, 0.9, 0.6, Duration::from_micros(40));
        metrics.record_interpretation(QueryDomain::Loyalty, 0.3, 0.6, Duration::from_micros(20));

        assert_eq!(metrics.queries_interpreted_total.get(), 2);
        assert_eq!(metrics.low_confidence_total.get(), 1);
        assert_eq!(
            metrics
                .domain_queries_total
                .with_label_values(&["loyalty"])
                .get(),
            2
        );
        assert_eq!(metrics.interpretation_duration_seconds.get_sample_count(), 2);
    }

    #[test]
    fn test_low_confidence_uses_given_threshold() {
        let metrics = Metrics::new();
        metrics.record_interpretation(QueryDomain::Sentiment, 0.65, 0.6, Duration::from_micros(10));
        assert_eq!(metrics.low_confidence_total.get(), 0);

        metrics.record_interpretation(QueryDomain::Sentiment, 0.65, 0.8, Duration::from_micros(10));
        assert_eq!(metrics.low_confidence_total.get(), 1);

        metrics.record_interpretation(QueryDomain::Sentiment, 0.5, 0.4, Duration::from_micros(10));
        assert_eq!(metrics.low_confidence_total.get(), 1);
    }

    #[test]
    fn test_record_response() {
        let metrics = Metrics::new();
        metrics.record_response(Persona::Executive);
        assert_eq!(
            metrics
                .responses_formatted_total
                .with_label_values(&["executive"])
                .get(),
            1
        );
    }

    #[test]
    fn test_histogram_timer() {
        let metrics = Metrics::new();
        {
            let _timer = Metrics::start_timer(&metrics.execution_duration_seconds);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(metrics.execution_duration_seconds.get_sample_count(), 1);
        assert!(metrics.execution_duration_seconds.get_sample_sum() >= 0.005);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.queries_interpreted_total.inc_by(7);
        metrics.data_source_errors_total.inc();

        let output = metrics.export_prometheus();
        assert!(output.contains("review_lens_queries_interpreted_total 7"));
        assert!(output.contains("review_lens_data_source_errors_total 1"));
        assert!(output.contains("review_lens_interpretation_duration_seconds"));
    }

    #[test]
    fn test_json_export() {
        let metrics = Metrics::new();
        metrics.low_confidence_total.inc_by(3);

        let snapshot = metrics.export_json();
        assert_eq!(snapshot.low_confidence_total, 3);
        assert!(snapshot.interpretation_duration_seconds.mean.is_none());
    }

    #[test]
    fn test_global_metrics() {
        let metrics = get_metrics();
        metrics.queries_interpreted_total.inc();
        assert!(metrics.queries_interpreted_total.get() >= 1);
    }
}
