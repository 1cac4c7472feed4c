//! USD/JPY conversion: validation, rate acquisition and directional arithmetic.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::rate::{RateError, RateSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Jpy => "JPY",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "JPY" => Ok(Currency::Jpy),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// The supported conversion directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPair {
    UsdToJpy,
    JpyToUsd,
}

impl ConversionPair {
    /// Matches currency codes exactly; `usd` is not `USD`.
    pub fn from_codes(from: &str, to: &str) -> Result<Self, ConversionError> {
        match (from.parse::<Currency>(), to.parse::<Currency>()) {
            (Ok(Currency::Usd), Ok(Currency::Jpy)) => Ok(ConversionPair::UsdToJpy),
            (Ok(Currency::Jpy), Ok(Currency::Usd)) => Ok(ConversionPair::JpyToUsd),
            _ => Err(ConversionError::UnsupportedPair {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    pub fn from_currency(&self) -> Currency {
        match self {
            ConversionPair::UsdToJpy => Currency::Usd,
            ConversionPair::JpyToUsd => Currency::Jpy,
        }
    }

    pub fn to_currency(&self) -> Currency {
        match self {
            ConversionPair::UsdToJpy => Currency::Jpy,
            ConversionPair::JpyToUsd => Currency::Usd,
        }
    }

    /// Applies a USD->JPY rate in this pair's direction.
    pub fn apply(&self, amount: f64, usd_jpy_rate: f64) -> f64 {
        match self {
            ConversionPair::UsdToJpy => amount * usd_jpy_rate,
            ConversionPair::JpyToUsd => amount / usd_jpy_rate,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("{0}")]
    RateUnavailable(String),
    #[error("Unsupported currency pair: {from}/{to}")]
    UnsupportedPair { from: String, to: String },
}

impl From<RateError> for ConversionError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::Unavailable(message) => ConversionError::RateUnavailable(message),
        }
    }
}

/// A successful conversion. `result` is already rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub result: f64,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a conversion as it travels through both front ends.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success(Conversion),
    Failure { message: String },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success(_))
    }
}

impl From<Result<Conversion, ConversionError>> for ConversionResult {
    fn from(result: Result<Conversion, ConversionError>) -> Self {
        match result {
            Ok(conversion) => ConversionResult::Success(conversion),
            Err(err) => ConversionResult::Failure {
                message: err.to_string(),
            },
        }
    }
}

/// Rounds half away from zero to 2 decimal places. Magnitudes too large to
/// scale by 100 have no fractional part and are returned unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

#[derive(Clone)]
pub struct ConversionEngine {
    source: Arc<dyn RateSource>,
}

impl ConversionEngine {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        ConversionEngine { source }
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> ConversionResult {
        self.try_convert(from, to, amount).await.into()
    }

    #[instrument(name = "Convert", skip(self))]
    pub async fn try_convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, ConversionError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ConversionError::InvalidAmount);
        }

        if amount == 0.0 {
            debug!("Zero amount, skipping rate fetch");
            return Ok(Conversion {
                result: 0.0,
                rate: 0.0,
                fetched_at: Utc::now(),
            });
        }

        let pair = ConversionPair::from_codes(from, to)?;

        let quote = self.source.fetch_usd_jpy_rate().await.map_err(|e| {
            warn!(error = %e, "Rate source failed");
            ConversionError::from(e)
        })?;

        let result = round_to_cents(pair.apply(amount, quote.rate()));
        if !result.is_finite() {
            warn!(amount, rate = quote.rate(), "Conversion overflowed");
            return Err(ConversionError::InvalidAmount);
        }
        debug!(rate = quote.rate(), result, "Converted");

        Ok(Conversion {
            result,
            rate: quote.rate(),
            fetched_at: quote.fetched_at(),
        })
    }
}
