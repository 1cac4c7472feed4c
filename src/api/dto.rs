//! Request and response bodies for the HTTP boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Conversion, ConversionResult};

/// UTC, second precision, `Z` suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
}

/// Either `error` or the `result`/`rate`/`fetched_at` triple is present, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConvertResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MalformedResponse {
    #[error("response has neither an error nor a complete result")]
    Incomplete,
    #[error("invalid fetched_at timestamp `{0}`")]
    InvalidTimestamp(String),
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MalformedResponse> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| MalformedResponse::InvalidTimestamp(raw.to_string()))
}

impl From<ConversionResult> for ConvertResponse {
    fn from(result: ConversionResult) -> Self {
        match result {
            ConversionResult::Success(conversion) => ConvertResponse {
                result: Some(conversion.result),
                rate: Some(conversion.rate),
                fetched_at: Some(format_timestamp(&conversion.fetched_at)),
                error: None,
            },
            ConversionResult::Failure { message } => ConvertResponse {
                error: Some(message),
                ..Default::default()
            },
        }
    }
}

impl TryFrom<ConvertResponse> for ConversionResult {
    type Error = MalformedResponse;

    fn try_from(response: ConvertResponse) -> Result<Self, Self::Error> {
        if let Some(message) = response.error.filter(|m| !m.is_empty()) {
            return Ok(ConversionResult::Failure { message });
        }

        match (response.result, response.rate, response.fetched_at) {
            (Some(result), Some(rate), Some(fetched_at)) => {
                Ok(ConversionResult::Success(Conversion {
                    result,
                    rate,
                    fetched_at: parse_timestamp(&fetched_at)?,
                }))
            }
            _ => Err(MalformedResponse::Incomplete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_success_serializes_triple_only() {
        let fetched_at = Utc.with_ymd_and_hms(2024, 5, 1, 3, 4, 5).unwrap();
        let response = ConvertResponse::from(ConversionResult::Success(Conversion {
            result: 15025.0,
            rate: 150.25,
            fetched_at,
        }));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "result": 15025.0,
                "rate": 150.25,
                "fetched_at": "2024-05-01T03:04:05Z"
            })
        );
    }

    #[test]
    fn test_failure_serializes_error_only() {
        let response = ConvertResponse::from(ConversionResult::Failure {
            message: "Invalid amount".to_string(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "error": "Invalid amount" }));
    }

    #[test]
    fn test_timestamp_drops_subsecond_precision() {
        let fetched_at = Utc
            .with_ymd_and_hms(2024, 5, 1, 3, 4, 5)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(987))
            .unwrap();
        assert_eq!(format_timestamp(&fetched_at), "2024-05-01T03:04:05Z");
    }

    #[test]
    fn test_decode_success_and_failure() {
        let body = r#"{"result": 100.0, "rate": 150.25, "fetched_at": "2024-05-01T03:04:05Z"}"#;
        let response: ConvertResponse = serde_json::from_str(body).unwrap();
        let result = ConversionResult::try_from(response).unwrap();
        assert_eq!(
            result,
            ConversionResult::Success(Conversion {
                result: 100.0,
                rate: 150.25,
                fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 3, 4, 5).unwrap(),
            })
        );

        // Explicit nulls, as some API implementations emit them.
        let body = r#"{"result": null, "rate": null, "fetched_at": null, "error": "boom"}"#;
        let response: ConvertResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            ConversionResult::try_from(response).unwrap(),
            ConversionResult::Failure {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_malformed_bodies() {
        let response: ConvertResponse = serde_json::from_str(r#"{"result": 1.0}"#).unwrap();
        assert_eq!(
            ConversionResult::try_from(response),
            Err(MalformedResponse::Incomplete)
        );

        let response: ConvertResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            ConversionResult::try_from(response),
            Err(MalformedResponse::Incomplete)
        );

        let response: ConvertResponse = serde_json::from_str(
            r#"{"result": 1.0, "rate": 2.0, "fetched_at": "yesterday"}"#,
        )
        .unwrap();
        assert_eq!(
            ConversionResult::try_from(response),
            Err(MalformedResponse::InvalidTimestamp("yesterday".to_string()))
        );
    }
}
