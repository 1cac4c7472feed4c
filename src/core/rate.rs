//! Exchange rate abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Message shown to users when no usable quote could be obtained.
pub const RATE_UNAVAILABLE_MESSAGE: &str = "為替レートの取得に失敗しました";

/// A single USD/JPY observation paired with the time it was acquired locally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    rate: f64,
    fetched_at: DateTime<Utc>,
}

impl Quote {
    /// Returns `None` unless `rate` is finite and strictly positive.
    pub fn new(rate: f64, fetched_at: DateTime<Utc>) -> Option<Self> {
        (rate.is_finite() && rate > 0.0).then_some(Quote { rate, fetched_at })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateError {
    #[error("{0}")]
    Unavailable(String),
}

impl RateError {
    pub fn unavailable() -> Self {
        RateError::Unavailable(RATE_UNAVAILABLE_MESSAGE.to_string())
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the current USD to JPY rate. One upstream call per invocation.
    async fn fetch_usd_jpy_rate(&self) -> Result<Quote, RateError>;
}
