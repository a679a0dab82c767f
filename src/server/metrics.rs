//! Prometheus metrics for devops-helper
//!
//! Exposes a single request counter:
//! - `devops_helper_requests_total{method, endpoint, status}`

use prometheus::core::Collector;
use prometheus::{self, Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Request metrics registry
///
/// Thread-safe container for all Prometheus metrics.
/// Clone is cheap (Arc internally).
#[derive(Clone)]
pub struct RequestMetrics {
    registry: Registry,
    /// Total requests by method, path and response status
    pub requests_total: IntCounterVec,
}

impl RequestMetrics {
    /// Create a new registry with the request counter registered
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("devops_helper_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
        })
    }

    /// Record one completed request
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16) {
        self.requests_total
            .with_label_values(&[method, endpoint, &status.to_string()])
            .inc();
    }

    /// Current count for a label tuple (0 if never observed)
    ///
    /// Reads the collected families instead of `with_label_values` so that
    /// asking about a tuple does not create it.
    pub fn request_count(&self, method: &str, endpoint: &str, status: u16) -> u64 {
        let status = status.to_string();
        let wanted = [
            ("method", method),
            ("endpoint", endpoint),
            ("status", status.as_str()),
        ];

        let families = self.requests_total.collect();
        for metric in families.iter().flat_map(|family| family.get_metric()) {
            let matches = wanted.iter().all(|(name, value)| {
                metric
                    .get_label()
                    .iter()
                    .any(|pair| pair.get_name() == *name && pair.get_value() == *value)
            });
            if matches {
                return metric.get_counter().get_value() as u64;
            }
        }
        0
    }

    /// Encode all metrics to Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Failed to encode metrics as UTF-8: {}", e))
        })
    }
}

/// Shared metrics handle for use across handlers
pub type SharedMetrics = Arc<RequestMetrics>;

/// Create a new shared metrics instance
pub fn create_metrics() -> Result<SharedMetrics, prometheus::Error> {
    Ok(Arc::new(RequestMetrics::new()?))
}
