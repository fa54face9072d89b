//! Per-request alert processing: gate, resolve, format, fan out.

use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    alert::{Alert, AlertBatch},
    clock::Clock,
    config::Config,
    format::MessageFormatter,
    metrics::MetricsSink,
    policy::SuppressionPolicy,
    receivers::receivers_for,
    telegram::{DeliveryOutcome, Notifier},
};

/// Counts gathered while processing one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub received: usize,
    pub suppressed: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped_receivers: usize,
}

pub struct AlertPipeline {
    default_receivers: Vec<String>,
    policy: SuppressionPolicy,
    formatter: MessageFormatter,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<dyn MetricsSink>,
}

impl AlertPipeline {
    pub fn new(
        config: &Config,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            default_receivers: config.routing.default_receivers.clone(),
            policy: SuppressionPolicy::new(clock),
            formatter: MessageFormatter::from_config(config),
            notifier,
            metrics,
        }
    }

    pub async fn handle_batch(&self, batch: AlertBatch) -> BatchReport {
        let span = info_span!("batch", batch_id = %Uuid::new_v4(), alerts = batch.len());
        async move {
            info!("Received {} alerts", batch.len());

            let mut report = BatchReport::default();
            for alert in &batch.alerts {
                self.process_alert(alert, &mut report).await;
            }

            info!(
                suppressed = report.suppressed,
                sent = report.sent,
                failed = report.failed,
                "Batch processed"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn process_alert(&self, alert: &Alert, report: &mut BatchReport) {
        let alert_name = alert.alert_name();
        report.received += 1;
        self.metrics.alert_received(&alert.status, alert_name);
        info!("Processing alert: {} [{}]", alert_name, alert.status);

        if let Some(reason) = self.policy.suppress_reason(alert) {
            info!("Skipping alert {} due to {}", alert_name, reason);
            report.suppressed += 1;
            return;
        }

        let receivers = receivers_for(alert, &self.default_receivers);
        let text = self.formatter.format(alert);

        for receiver in &receivers {
            if receiver.is_empty() {
                warn!("Skipping empty receiver id for alert {}", alert_name);
                report.skipped_receivers += 1;
                continue;
            }

            match self.notifier.deliver(receiver, &text).await {
                DeliveryOutcome::Sent => {
                    self.metrics.alert_sent(receiver);
                    report.sent += 1;
                    info!("Alert sent to receiver: {}", receiver);
                }
                DeliveryOutcome::Failed { reason } => {
                    self.metrics.send_failed(receiver);
                    report.failed += 1;
                    error!("Failed to send alert to {}: {}", receiver, reason);
                }
            }
        }
    }
}
