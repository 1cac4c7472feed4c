use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::core::rate::{Quote, RateError, RateSource};

pub const USD_JPY_SYMBOL: &str = "USDJPY=X";

/// USD/JPY quotes from the Yahoo Finance chart API.
pub struct YahooRateSource {
    base_url: String,
    client: reqwest::Client,
}

impl YahooRateSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("fxconv/1.0").build()?;
        Ok(YahooRateSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_price(&self) -> Result<f64> {
        let url = format!("{}/v8/finance/chart/{USD_JPY_SYMBOL}", self.base_url);
        debug!("Requesting currency rate from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, USD_JPY_SYMBOL))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                USD_JPY_SYMBOL
            ));
        }

        let text = response.text().await?;

        let data: YahooChartResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!("Failed to parse JSON response for {}: {}", USD_JPY_SYMBOL, e)
        })?;

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| anyhow!("No rate data found for symbol: {}", USD_JPY_SYMBOL))?;

        item.meta
            .regular_market_price
            .ok_or_else(|| anyhow!("No price in response for symbol: {}", USD_JPY_SYMBOL))
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Debug, Deserialize)]
struct ChartItem {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[async_trait]
impl RateSource for YahooRateSource {
    #[instrument(name = "YahooRateFetch", skip(self))]
    async fn fetch_usd_jpy_rate(&self) -> Result<Quote, RateError> {
        let price = self.fetch_price().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch USD/JPY rate");
            RateError::unavailable()
        })?;

        let quote = Quote::new(price, Utc::now()).ok_or_else(|| {
            warn!(price, "Unusable USD/JPY price");
            RateError::unavailable()
        })?;
        debug!(rate = quote.rate(), "Fetched USD/JPY rate");
        Ok(quote)
    }
}
