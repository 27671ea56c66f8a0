// src/services/fmp.rs
//
// Financial Modeling Prep client: per-symbol earnings history, historical
// daily closes, after-market quotes and profile beta. One shared reqwest
// client, retry with exponential backoff on transport errors and 429s,
// and a fixed pacing delay so a full scan stays inside the API's rate
// limit.
use std::env;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{EarningsRecord, HistoricalClose};

const BASE_URL: &str = "https://financialmodelingprep.com";
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
/// Spacing between consecutive API calls (the hosted plan allows roughly
/// 10 calls per 3 seconds).
const PACING_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Deserialize)]
struct FmpEarningsEntry {
    date: NaiveDate,
    #[serde(rename = "epsActual")]
    eps_actual: Option<f64>,
    #[serde(rename = "epsEstimated")]
    eps_estimated: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalBar {
    date: NaiveDate,
    close: f64,
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalResponse {
    #[serde(default)]
    historical: Vec<FmpHistoricalBar>,
}

#[derive(Debug, Deserialize)]
struct FmpAftermarketQuote {
    #[serde(rename = "askPrice")]
    ask_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FmpProfile {
    beta: Option<f64>,
}

#[derive(Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Reads `FINANCIAL_API_KEY` from the environment. A missing key is a
    /// configuration error surfaced at startup, not per call.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("FINANCIAL_API_KEY")
            .context("FINANCIAL_API_KEY not set in environment")?;
        Ok(Self::new(api_key))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        for attempt in 0..RETRY_ATTEMPTS {
            if attempt > 0 {
                let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                warn!("Retrying FMP request (attempt {}) after {:?}", attempt + 1, delay);
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(url).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!("FMP transport error: {}", e);
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => {
                    let parsed = response.json::<T>().await?;
                    tokio::time::sleep(PACING_DELAY).await;
                    return Ok(parsed);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!("FMP rate limit hit");
                    continue;
                }
                status => {
                    let message = match status.as_u16() {
                        401 => "invalid API key",
                        402 => "premium data required",
                        403 => "access forbidden",
                        404 => "data not found",
                        500 => "internal server error",
                        503 => "service unavailable",
                        _ => "unexpected status",
                    };
                    bail!("FMP API error {}: {}", status.as_u16(), message);
                }
            }
        }

        Err(anyhow!("FMP request failed after {} attempts", RETRY_ATTEMPTS))
    }

    /// The symbol's earnings record for `report_date`, if the history
    /// contains one. Optional EPS fields stay optional.
    pub async fn get_earnings(
        &self,
        symbol: &str,
        report_date: NaiveDate,
    ) -> anyhow::Result<Option<EarningsRecord>> {
        info!("Fetching earnings history for {}", symbol);
        let url = format!(
            "{}/stable/earnings?symbol={}&apikey={}",
            BASE_URL, symbol, self.api_key
        );
        let entries: Vec<FmpEarningsEntry> = self.get_json(&url).await?;

        Ok(entries
            .into_iter()
            .find(|e| e.date == report_date)
            .map(|e| EarningsRecord {
                symbol: symbol.to_string(),
                eps_actual: e.eps_actual,
                eps_estimated: e.eps_estimated,
            }))
    }

    /// Full daily close history, most-recent-first as the provider returns
    /// it. Index 0 is the latest session; the caller never re-sorts.
    pub async fn get_historical_closes(&self, symbol: &str) -> anyhow::Result<Vec<HistoricalClose>> {
        info!("Fetching historical closes for {}", symbol);
        let url = format!(
            "{}/api/v3/historical-price-full/{}?apikey={}",
            BASE_URL, symbol, self.api_key
        );
        let response: FmpHistoricalResponse = self.get_json(&url).await?;

        Ok(response
            .historical
            .into_iter()
            .map(|bar| HistoricalClose {
                date: bar.date,
                close: bar.close,
            })
            .collect())
    }

    /// After-market ask price, used as the current price on report day.
    /// Absent outside the after-market session.
    pub async fn get_aftermarket_quote(&self, symbol: &str) -> anyhow::Result<Option<f64>> {
        info!("Fetching after-market quote for {}", symbol);
        let url = format!(
            "{}/stable/aftermarket-quote?symbol={}&apikey={}",
            BASE_URL, symbol, self.api_key
        );
        let quotes: Vec<FmpAftermarketQuote> = self.get_json(&url).await?;
        Ok(quotes.into_iter().next().and_then(|q| q.ask_price))
    }

    /// Historical beta from the company profile.
    pub async fn get_beta(&self, symbol: &str) -> anyhow::Result<Option<f64>> {
        info!("Fetching profile beta for {}", symbol);
        let url = format!(
            "{}/api/v3/profile/{}?apikey={}",
            BASE_URL, symbol, self.api_key
        );
        let profiles: Vec<FmpProfile> = self.get_json(&url).await?;
        Ok(profiles.into_iter().next().and_then(|p| p.beta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earnings_entry_tolerates_null_eps_fields() {
        let json = r#"[
            {"date": "2025-07-15", "epsActual": 1.10, "epsEstimated": null},
            {"date": "2025-04-15", "epsActual": null, "epsEstimated": 0.95}
        ]"#;
        let entries: Vec<FmpEarningsEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].eps_actual, Some(1.10));
        assert_eq!(entries[0].eps_estimated, None);
        assert_eq!(entries[1].eps_actual, None);
    }

    #[test]
    fn historical_response_defaults_to_empty() {
        let response: FmpHistoricalResponse = serde_json::from_str("{}").unwrap();
        assert!(response.historical.is_empty());

        let json = r#"{"symbol": "ACME", "historical": [
            {"date": "2025-07-15", "close": 105.0, "volume": 123},
            {"date": "2025-07-14", "close": 100.0, "volume": 456}
        ]}"#;
        let response: FmpHistoricalResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.historical.len(), 2);
        assert_eq!(response.historical[0].close, 105.0);
    }

    #[test]
    fn profile_beta_may_be_missing() {
        let profiles: Vec<FmpProfile> =
            serde_json::from_str(r#"[{"companyName": "Acme Corp"}]"#).unwrap();
        assert_eq!(profiles[0].beta, None);
    }
}
