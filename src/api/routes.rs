//! Conversion and health check endpoints.

use axum::{Json, extract::State};
use tracing::info;

use super::AppState;
use super::dto::{ConvertRequest, ConvertResponse, HealthResponse};

/// Domain failures are returned as data in the body, always with 200.
pub async fn convert(
    State(state): State<AppState>,
    Json(req): Json<ConvertRequest>,
) -> Json<ConvertResponse> {
    let result = state
        .engine
        .convert(&req.from_currency, &req.to_currency, req.amount)
        .await;
    info!(
        from = %req.from_currency,
        to = %req.to_currency,
        amount = req.amount,
        success = result.is_success(),
        "Handled conversion request"
    );
    Json(result.into())
}

/// Does not touch the rate source.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
