use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use am_telegram_relay::{
    clock::SystemClock,
    config::{Config, LogFormat},
    metrics::{PrometheusMetrics, REGISTRY},
    pipeline::AlertPipeline,
    server::Server,
    telegram::TelegramClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    init_tracing(config.log_format);
    config.warn_incomplete();
    info!(
        addr = %config.server.addr,
        default_receivers = config.routing.default_receivers.len(),
        "Loaded configuration"
    );

    let metrics = PrometheusMetrics::register(&REGISTRY).context("failed to register metrics")?;
    let notifier = TelegramClient::new(&config.telegram).context("failed to build Telegram client")?;

    let pipeline = AlertPipeline::new(
        &config,
        Arc::new(SystemClock),
        Arc::new(notifier),
        Arc::new(metrics),
    );

    let server = Server::new(&config, pipeline, REGISTRY.clone());

    info!("Starting server on {}", config.server.addr);
    server
        .start(&config.server.addr)
        .await
        .with_context(|| format!("server error on {}", config.server.addr))?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
