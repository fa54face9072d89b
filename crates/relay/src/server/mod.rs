mod routes;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use prometheus::Registry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::Config, pipeline::AlertPipeline, Result};

pub struct AppState {
    pub pipeline: AlertPipeline,
    pub registry: Registry,
}

pub struct Server {
    state: Arc<AppState>,
    request_timeout: Duration,
}

impl Server {
    pub fn new(config: &Config, pipeline: AlertPipeline, registry: Registry) -> Self {
        Self {
            state: Arc::new(AppState { pipeline, registry }),
            request_timeout: config.server.request_timeout,
        }
    }

    pub fn build_router(self) -> Router {
        Router::new()
            .route("/alert", post(routes::handle_alert))
            .route("/health-check", get(routes::health_check))
            .route("/metrics", get(routes::metrics))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.request_timeout,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }

    pub async fn start(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
