//! Exchange rate lookup (`extrate`) against the ExchangeRate-API v6 "latest" endpoint.

mod currency;
mod parse;

pub use currency::CurrencyCode;
pub use parse::{parse_latest, RateTable};

use crate::config::ShellsyConfig;
use crate::http::{self, HttpOptions};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use anyhow::{Context, Result};
use thiserror::Error;
use url::Url;

/// Failures specific to exchange rate lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeRateError {
    #[error("no exchange rate API key configured (set exchange_rate.api_key in the config or SHELLSY_EXCHANGE_API_KEY)")]
    MissingApiKey,
    #[error("invalid currency code '{0}': expected three letters such as USD")]
    InvalidCurrency(String),
    /// The API answered with `"result": "error"`; carries its `error-type`.
    #[error("exchange rate API error: {0}")]
    Api(String),
    #[error("no rate for {0} in the response")]
    UnknownTarget(String),
    #[error("malformed exchange rate response: {0}")]
    MalformedResponse(String),
}

/// Blocking client for one API root and key.
#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    base_url: String,
    api_key: String,
    http: HttpOptions,
    retry: RetryPolicy,
}

impl ExchangeRateClient {
    pub fn new(base_url: &str, api_key: &str, http: HttpOptions, retry: RetryPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
            retry,
        }
    }

    /// Build a client from the loaded config. Fails without an API key.
    pub fn from_config(cfg: &ShellsyConfig) -> Result<Self, ExchangeRateError> {
        let key = cfg
            .exchange_rate
            .resolved_api_key()
            .ok_or(ExchangeRateError::MissingApiKey)?;
        Ok(Self::new(
            &cfg.exchange_rate.base_url,
            &key,
            HttpOptions::from(&cfg.download),
            RetryPolicy::from(&cfg.retry),
        ))
    }

    /// `{base_url}/{api_key}/latest/{CODE}`. The key is percent-encoded as one path segment.
    pub fn latest_url(&self, base: &CurrencyCode) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid exchange rate base URL '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("exchange rate base URL '{}' cannot hold a path", self.base_url))?
            .pop_if_empty()
            .push(&self.api_key)
            .push("latest")
            .push(base.as_str());
        Ok(url)
    }

    /// Same as `latest_url` with the key masked, for logs and errors.
    fn redacted_url(&self, base: &CurrencyCode) -> String {
        format!("{}/***/latest/{}", self.base_url, base)
    }

    /// Fetch the latest rates quoted against `base`.
    ///
    /// Server errors (5xx) and network failures are retried. Other statuses,
    /// and the last 5xx once retries run out, are handed to the parser so the
    /// API's JSON `error-type` reaches the caller.
    pub fn latest(&self, base: &CurrencyCode) -> Result<RateTable> {
        let url = self.latest_url(base)?;
        let shown = self.redacted_url(base);
        tracing::debug!(url = %shown, "fetching exchange rates");

        let mut last_server_error = None;
        let fetched = run_with_retry(&self.retry, |_| {
            last_server_error = None;
            let (response, body) = http::get_bytes(url.as_str(), &self.http)?;
            if response.status >= 500 {
                let status = response.status;
                last_server_error = Some((response, body));
                return Err(FetchError::Http(status));
            }
            Ok((response, body))
        });
        let (response, body) = match (fetched, last_server_error) {
            (Ok(pair), _) => pair,
            (Err(FetchError::Http(_)), Some(pair)) => pair,
            (Err(e), _) => return Err(e).with_context(|| format!("GET {shown} failed")),
        };

        let table = parse_latest(response.status, &body)?;
        tracing::info!(base = %table.base, count = table.rates.len(), "exchange rates fetched");
        Ok(table)
    }
}
