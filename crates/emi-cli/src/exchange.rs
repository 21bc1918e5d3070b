//! Exchange-rate source for display conversion.
//!
//! Rates come from the exchangerate-api v6 `latest` endpoint or from a JSON
//! file with the same shape. They are fetched at most once per invocation; a
//! failed fetch never fails a loan command, it only turns conversion off.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, warn};

use emi_core::currency::{DisplayCurrency, RateTable};
use emi_core::Currency;

use crate::config::{AppConfig, ExchangeConfig};
use crate::input;

/// Display flags shared by every loan command.
#[derive(Debug, Clone, Default)]
pub struct DisplayOptions {
    pub currency: Option<String>,
    pub rates_file: Option<String>,
    pub offline: bool,
}

/// Body of a `latest/{BASE}` response.
#[derive(Debug, Deserialize)]
pub struct RateResponse {
    pub result: String,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub time_last_update_utc: Option<String>,
    #[serde(default, rename = "error-type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub conversion_rates: HashMap<String, Decimal>,
}

impl RateResponse {
    pub fn into_table(self, expected_base: &Currency) -> Result<RateTable, Box<dyn Error>> {
        if self.result != "success" {
            let reason = self.error_type.unwrap_or(self.result);
            return Err(format!("rate API returned an error: {reason}").into());
        }
        if let Some(code) = self.base_code.as_deref() {
            let base: Currency = code.parse()?;
            if base != *expected_base {
                return Err(format!("rates are quoted against {base}, expected {expected_base}").into());
            }
        }
        if self.conversion_rates.is_empty() {
            return Err("rate response contains no conversion rates".into());
        }
        debug!(
            quotes = self.conversion_rates.len(),
            updated = self.time_last_update_utc.as_deref().unwrap_or("unknown"),
            "rate table parsed"
        );
        Ok(RateTable::new(expected_base.clone(), self.conversion_rates))
    }
}

/// Blocking HTTP client for the rate API.
pub struct RateClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl RateClient {
    pub fn from_config(cfg: &ExchangeConfig) -> Result<Self, Box<dyn Error>> {
        let api_key = AppConfig::resolve_env(&cfg.api_key_env)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("emi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("Failed to build rate HTTP client: {e}"))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn fetch(&self, base: &Currency) -> Result<RateTable, Box<dyn Error>> {
        let url = format!("{}/{}/latest/{}", self.base_url, self.api_key, base.code());
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| format!("rate request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("rate API error: {}", resp.status()).into());
        }

        let body: RateResponse = resp
            .json()
            .map_err(|e| format!("Failed to parse rate response: {e}"))?;
        body.into_table(base)
    }
}

/// Read a saved `latest` response from disk.
pub fn read_rates_file(path: &str, base: &Currency) -> Result<RateTable, Box<dyn Error>> {
    let body: RateResponse = input::file::read_json(path)?;
    body.into_table(base)
}

/// Rate table from the file cache and/or the API. A successful fetch replaces
/// cached quotes; a failed one falls back to the cache.
pub fn load_rate_table(opts: &DisplayOptions, cfg: &AppConfig) -> Result<RateTable, Box<dyn Error>> {
    let base = Currency::INR;
    let cached = match opts.rates_file.as_deref() {
        Some(path) => Some(read_rates_file(path, &base)?),
        None => None,
    };

    if opts.offline {
        return cached.ok_or_else(|| "--offline requires --rates-file".into());
    }

    let fetched = RateClient::from_config(&cfg.exchange).and_then(|client| client.fetch(&base));
    match (fetched, cached) {
        (Ok(fresh), Some(mut table)) => {
            info!(quotes = fresh.rates.len(), "fetched rates replace cached rates");
            table.merge_newer(fresh)?;
            Ok(table)
        }
        (Ok(fresh), None) => {
            info!(quotes = fresh.rates.len(), "fetched exchange rates");
            Ok(fresh)
        }
        (Err(e), Some(table)) => {
            warn!(error = %e, "rate fetch failed; using rates file");
            Ok(table)
        }
        (Err(e), None) => Err(e),
    }
}

/// Pick the display currency. Any failure to obtain a rate degrades to the
/// base currency and is reported as a warning string.
pub fn resolve_display(
    opts: &DisplayOptions,
    cfg: &AppConfig,
) -> Result<(DisplayCurrency, Vec<String>), Box<dyn Error>> {
    let wanted: Currency = match opts.currency.as_deref().or(cfg.display.currency.as_deref()) {
        Some(code) => code.parse()?,
        None => return Ok((DisplayCurrency::base(), Vec::new())),
    };
    if wanted.is_base() {
        return Ok((DisplayCurrency::base(), Vec::new()));
    }

    let resolved = load_rate_table(opts, cfg)
        .and_then(|table| DisplayCurrency::from_table(&table, wanted.clone()).map_err(Into::into));

    match resolved {
        Ok(display) => Ok((display, Vec::new())),
        Err(e) => {
            warn!(error = %e, currency = %wanted, "conversion unavailable; showing base currency");
            Ok((
                DisplayCurrency::base(),
                vec![format!(
                    "exchange rates unavailable ({e}); showing amounts in {}",
                    Currency::INR
                )],
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "result": "success",
        "base_code": "INR",
        "time_last_update_utc": "Fri, 16 Oct 2026 00:00:01 +0000",
        "conversion_rates": { "INR": 1, "USD": 0.0125, "EUR": 0.0105 }
    }"#;

    #[test]
    fn test_parse_success_response() {
        let body: RateResponse = serde_json::from_str(SAMPLE).unwrap();
        let table = body.into_table(&Currency::INR).unwrap();
        assert_eq!(table.rates["USD"], dec!(0.0125));
        assert_eq!(table.base, Currency::INR);
    }

    #[test]
    fn test_error_response_is_rejected() {
        let body: RateResponse =
            serde_json::from_str(r#"{"result": "error", "error-type": "invalid-key"}"#).unwrap();
        let err = body.into_table(&Currency::INR).unwrap_err();
        assert!(err.to_string().contains("invalid-key"));
    }

    #[test]
    fn test_wrong_base_is_rejected() {
        let body: RateResponse = serde_json::from_str(
            r#"{"result": "success", "base_code": "USD", "conversion_rates": {"INR": 80}}"#,
        )
        .unwrap();
        assert!(body.into_table(&Currency::INR).is_err());
    }

    #[test]
    fn test_base_currency_needs_no_rates() {
        let opts = DisplayOptions {
            currency: Some("inr".into()),
            ..DisplayOptions::default()
        };
        let (display, warnings) = resolve_display(&opts, &AppConfig::default()).unwrap();
        assert!(display.is_base());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_offline_without_file_falls_back() {
        let opts = DisplayOptions {
            currency: Some("USD".into()),
            rates_file: None,
            offline: true,
        };
        let (display, warnings) = resolve_display(&opts, &AppConfig::default()).unwrap();
        assert!(display.is_base());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("showing amounts in INR"));
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let opts = DisplayOptions {
            currency: Some("DOLLARS".into()),
            ..DisplayOptions::default()
        };
        assert!(resolve_display(&opts, &AppConfig::default()).is_err());
    }
}
