//! Server configuration and startup.

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::AppState;
use super::routes;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/convert", post(routes::convert))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the server until Ctrl-C.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;

    info!("Conversion API listening on http://{}", addr);
    info!("  GET  /health");
    info!("  POST /convert");

    serve_with_shutdown(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{ConvertResponse, HealthResponse};
    use crate::core::{ConversionEngine, Quote, RateError, RateSource};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubRateSource {
        rate: Result<f64, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for StubRateSource {
        async fn fetch_usd_jpy_rate(&self) -> Result<Quote, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fetched_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
            match &self.rate {
                Ok(rate) => Quote::new(*rate, fetched_at).ok_or_else(RateError::unavailable),
                Err(message) => Err(RateError::Unavailable(message.clone())),
            }
        }
    }

    async fn spawn_server(rate: Result<f64, String>) -> (SocketAddr, Arc<StubRateSource>) {
        let source = Arc::new(StubRateSource {
            rate,
            calls: AtomicUsize::new(0),
        });
        let state = AppState::new(ConversionEngine::new(source.clone()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_with_shutdown(
            listener,
            state,
            std::future::pending::<()>(),
        ));
        (addr, source)
    }

    async fn post_convert(addr: SocketAddr, body: serde_json::Value) -> ConvertResponse {
        let response = reqwest::Client::new()
            .post(format!("http://{addr}/convert"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        response.json().await.unwrap()
    }

    #[tokio::test]
    async fn test_health_does_not_fetch_rates() {
        let (addr, source) = spawn_server(Err("down".to_string())).await;

        let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert!(response.status().is_success());
        let body: HealthResponse = response.json().await.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_convert_usd_to_jpy() {
        let (addr, _) = spawn_server(Ok(150.25)).await;

        let body = post_convert(
            addr,
            json!({"from_currency": "USD", "to_currency": "JPY", "amount": 100}),
        )
        .await;
        assert_eq!(body.result, Some(15025.0));
        assert_eq!(body.rate, Some(150.25));
        assert_eq!(body.fetched_at.as_deref(), Some("2024-01-02T03:04:05Z"));
        assert!(body.error.is_none());
    }

    #[tokio::test]
    async fn test_convert_jpy_to_usd() {
        let (addr, _) = spawn_server(Ok(150.25)).await;

        let body = post_convert(
            addr,
            json!({"from_currency": "JPY", "to_currency": "USD", "amount": 15025}),
        )
        .await;
        assert_eq!(body.result, Some(100.0));
        assert_eq!(body.rate, Some(150.25));
    }

    #[tokio::test]
    async fn test_domain_failures_are_returned_as_error_field() {
        let (addr, source) = spawn_server(Ok(150.25)).await;

        let body = post_convert(
            addr,
            json!({"from_currency": "USD", "to_currency": "JPY", "amount": -5}),
        )
        .await;
        assert_eq!(
            body,
            ConvertResponse {
                error: Some("Invalid amount".to_string()),
                ..Default::default()
            }
        );

        let body = post_convert(
            addr,
            json!({"from_currency": "EUR", "to_currency": "USD", "amount": 5}),
        )
        .await;
        assert_eq!(
            body.error.as_deref(),
            Some("Unsupported currency pair: EUR/USD")
        );
        assert!(body.result.is_none() && body.rate.is_none() && body.fetched_at.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overflowing_amount_returns_only_error() {
        let (addr, source) = spawn_server(Ok(150.25)).await;

        let body = post_convert(
            addr,
            json!({"from_currency": "USD", "to_currency": "JPY", "amount": 1e307}),
        )
        .await;
        assert_eq!(
            body,
            ConvertResponse {
                error: Some("Invalid amount".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_failure_message_is_passed_through() {
        let (addr, _) = spawn_server(Err("為替レートの取得に失敗しました".to_string())).await;

        let body = post_convert(
            addr,
            json!({"from_currency": "USD", "to_currency": "JPY", "amount": 1}),
        )
        .await;
        assert_eq!(body.error.as_deref(), Some("為替レートの取得に失敗しました"));
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected() {
        let (addr, _) = spawn_server(Ok(150.25)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/convert"))
            .json(&json!({"from_currency": "USD", "amount": "lots"}))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
