//! Decode the JSON body of a `latest` response.

use super::{CurrencyCode, ExchangeRateError};
use crate::retry::FetchError;
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Rates quoted against one base currency, ordered by target code.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    /// `time_last_update_utc` as sent by the API.
    pub updated: Option<String>,
    pub rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Rates for `targets` in the given order, or all rates when `targets` is empty.
    pub fn select(&self, targets: &[CurrencyCode]) -> Result<Vec<(String, f64)>, ExchangeRateError> {
        if targets.is_empty() {
            return Ok(self.rates.iter().map(|(k, v)| (k.clone(), *v)).collect());
        }
        targets
            .iter()
            .map(|t| {
                self.rates
                    .get(t.as_str())
                    .map(|rate| (t.to_string(), *rate))
                    .ok_or_else(|| ExchangeRateError::UnknownTarget(t.to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawLatest {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    time_last_update_utc: Option<String>,
    conversion_rates: Option<BTreeMap<String, f64>>,
}

/// Turn an HTTP status and body into a `RateTable`.
///
/// A JSON error body wins over the status code; a non-JSON body on a non-2xx
/// status is reported as `HTTP <status>`.
pub fn parse_latest(status: u32, body: &[u8]) -> Result<RateTable> {
    let success = (200..300).contains(&status);
    let raw: RawLatest = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(_) if !success => return Err(FetchError::Http(status).into()),
        Err(e) => return Err(ExchangeRateError::MalformedResponse(e.to_string()).into()),
    };

    match raw.result.as_str() {
        "success" if success => {}
        "success" => return Err(FetchError::Http(status).into()),
        "error" => {
            let kind = raw.error_type.unwrap_or_else(|| "unknown".to_string());
            return Err(ExchangeRateError::Api(kind).into());
        }
        other => {
            return Err(ExchangeRateError::MalformedResponse(format!("unexpected result '{other}'")).into())
        }
    }

    let base = raw
        .base_code
        .ok_or_else(|| ExchangeRateError::MalformedResponse("missing base_code".into()))?;
    let rates = raw
        .conversion_rates
        .ok_or_else(|| ExchangeRateError::MalformedResponse("missing conversion_rates".into()))?;

    Ok(RateTable {
        base,
        updated: raw.time_last_update_utc,
        rates,
    })
}
