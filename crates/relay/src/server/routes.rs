use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use std::sync::Arc;
use tracing::{error, info};

use super::AppState;
use crate::{alert::AlertBatch, metrics::gather_metrics};

pub async fn health_check() -> &'static str {
    info!("Health check OK");
    "ok"
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match gather_metrics(&state.registry) {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!("Error encoding metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decodes the body itself so malformed payloads get a plain `400`.
pub async fn handle_alert(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let batch = match AlertBatch::decode(&body) {
        Ok(batch) => batch,
        Err(e) => {
            error!("Error decoding alert payload: {}", e);
            return (StatusCode::BAD_REQUEST, "bad request").into_response();
        }
    };

    state.pipeline.handle_batch(batch).await;
    (StatusCode::OK, "ok").into_response()
}
