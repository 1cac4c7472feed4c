//! Client for the conversion API, used by the chat front end.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::dto::{ConvertRequest, ConvertResponse, MalformedResponse};
use crate::core::ConversionResult;
use crate::core::conversion::ConversionPair;

/// Failure to obtain any result from the API. Never shown to chat users verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(#[from] MalformedResponse),
}

#[async_trait]
pub trait ConvertApi: Send + Sync {
    async fn convert(
        &self,
        pair: ConversionPair,
        amount: f64,
    ) -> Result<ConversionResult, ClientError>;
}

/// Holds the single outbound HTTP client for the lifetime of the bot process.
pub struct ConvertClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConvertClient {
    /// `timeout` bounds the whole request, including reading the body.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("fxconv-bot/1.0")
            .timeout(timeout)
            .build()?;
        Ok(ConvertClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ConvertApi for ConvertClient {
    #[instrument(name = "ConvertApiCall", skip(self))]
    async fn convert(
        &self,
        pair: ConversionPair,
        amount: f64,
    ) -> Result<ConversionResult, ClientError> {
        let url = format!("{}/convert", self.base_url);
        let payload = ConvertRequest {
            from_currency: pair.from_currency().to_string(),
            to_currency: pair.to_currency().to_string(),
            amount,
        };

        let request_error = |source| ClientError::Request {
            url: url.clone(),
            source,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let body: ConvertResponse = response.json().await.map_err(request_error)?;
        debug!(?body, "Received conversion response");

        Ok(ConversionResult::try_from(body)?)
    }
}
