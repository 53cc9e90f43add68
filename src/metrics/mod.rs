//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_with_registry, Counter, CounterVec, Histogram, Opts, Registry,
};
use std::sync::Arc;
use std::time::Duration;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Chat API metrics
    pub chat_requests: CounterVec,

    // Model call metrics
    pub model_calls: CounterVec,
    pub model_call_duration: Histogram,

    // Session metrics
    pub sessions_created: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let chat_requests = register_counter_vec_with_registry!(
            Opts::new("chat_requests_total", "Total chat requests"),
            &["status"],
            registry
        )?;

        let model_calls = register_counter_vec_with_registry!(
            Opts::new("model_calls_total", "Total upstream model calls"),
            &["outcome"],
            registry
        )?;

        let model_call_duration = register_histogram_with_registry!(
            "model_call_duration_seconds",
            "Upstream model call duration in seconds, including retries",
            registry
        )?;

        let sessions_created = register_counter_with_registry!(
            Opts::new("sessions_created_total", "Total sessions created"),
            registry
        )?;

        Ok(Self {
            registry,
            chat_requests,
            model_calls,
            model_call_duration,
            sessions_created,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a chat request outcome
    pub fn record_chat_request(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.chat_requests.with_label_values(&[status]).inc();
    }

    /// Record an upstream model call outcome and duration
    pub fn record_model_call(&self, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "error" };
        self.model_calls.with_label_values(&[outcome]).inc();
        self.model_call_duration.observe(duration.as_secs_f64());
    }

    /// Record a session creation
    pub fn record_session_created(&self) {
        self.sessions_created.inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_chat_request() {
        let metrics = Metrics::new().unwrap();
        metrics.record_chat_request(true);
        metrics.record_chat_request(false);
        // Metrics should be recorded without panicking
    }

    #[test]
    fn test_export_contains_registered_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.record_model_call(true, Duration::from_millis(120));
        let text = metrics.export_prometheus();
        assert!(text.contains("model_calls_total"));
        assert!(text.contains("model_call_duration_seconds"));
    }
}
