use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::{Error, Result};

lazy_static! {
    /// Process-wide registry scraped by the `/metrics` endpoint.
    pub static ref REGISTRY: Registry = Registry::new();
}

/// Sink for the relay's observable side effects.
pub trait MetricsSink: Send + Sync {
    fn alert_received(&self, status: &str, alert_name: &str);
    fn alert_sent(&self, receiver: &str);
    fn send_failed(&self, receiver: &str);
}

#[derive(Clone)]
pub struct PrometheusMetrics {
    alerts_total: IntCounterVec,
    alerts_sent: IntCounterVec,
    send_errors: IntCounterVec,
}

impl PrometheusMetrics {
    /// Creates the relay counters and registers them with `registry`.
    pub fn register(registry: &Registry) -> Result<Self> {
        let alerts_total = IntCounterVec::new(
            Opts::new("am_telegram_alerts_total", "Total alerts received"),
            &["status", "alertname"],
        )?;
        let alerts_sent = IntCounterVec::new(
            Opts::new("am_telegram_alerts_send", "Total alerts sent"),
            &["receiver"],
        )?;
        let send_errors = IntCounterVec::new(
            Opts::new("am_telegram_alerts_send_errors", "Total alert send errors"),
            &["receiver"],
        )?;

        registry.register(Box::new(alerts_total.clone()))?;
        registry.register(Box::new(alerts_sent.clone()))?;
        registry.register(Box::new(send_errors.clone()))?;

        Ok(Self {
            alerts_total,
            alerts_sent,
            send_errors,
        })
    }
}

impl MetricsSink for PrometheusMetrics {
    fn alert_received(&self, status: &str, alert_name: &str) {
        self.alerts_total.with_label_values(&[status, alert_name]).inc();
    }

    fn alert_sent(&self, receiver: &str) {
        self.alerts_sent.with_label_values(&[receiver]).inc();
    }

    fn send_failed(&self, receiver: &str) {
        self.send_errors.with_label_values(&[receiver]).inc();
    }
}

/// Renders every metric family in `registry` in the text exposition format.
pub fn gather_metrics(registry: &Registry) -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Internal(format!("Metrics are not valid UTF-8: {}", e)))
}
