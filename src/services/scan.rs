// src/services/scan.rs
//
// One scan cycle: build the market context, walk the earnings calendar
// sequentially, fetch each symbol's raw inputs, and join them into
// presentation rows. Partial success across symbols is the normal mode;
// only a context or calendar failure aborts the cycle.
use std::fmt;

use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;

use crate::models::{CompanyListing, EarningsRecord, HistoricalClose, MarketContext, ScanRow};
use crate::services::calculations::{
    compute_symbol_metrics, windowed_changes, OverreactionStrategy,
    DEFAULT_OVERREACTION_THRESHOLD,
};
use crate::services::fmp::FmpClient;
use crate::services::market_context::{build_market_context, DEFAULT_FALLBACK_RISK_FREE_RATE};
use crate::services::nasdaq;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub strategy: OverreactionStrategy,
    pub overreaction_threshold: f64,
    pub fallback_risk_free_rate: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            strategy: OverreactionStrategy::CapmAdjusted,
            overreaction_threshold: DEFAULT_OVERREACTION_THRESHOLD,
            fallback_risk_free_rate: DEFAULT_FALLBACK_RISK_FREE_RATE,
        }
    }
}

/// A stage failure that aborts the whole cycle. Per-symbol data problems
/// never surface here; they are logged and leave blank cells.
#[derive(Debug)]
pub struct ScanError {
    pub stage: &'static str,
    pub message: String,
}

impl ScanError {
    fn new(stage: &'static str, message: impl Into<String>) -> Self {
        ScanError {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.message)
    }
}

impl std::error::Error for ScanError {}

/// Raw per-symbol inputs as fetched. Any leg may be absent or empty after
/// an upstream failure; composition tolerates all of them.
#[derive(Debug, Default)]
struct SymbolInputs {
    earnings: Option<EarningsRecord>,
    closes: Vec<HistoricalClose>,
    current_price: Option<f64>,
    beta: Option<f64>,
}

async fn fetch_symbol_inputs(fmp: &FmpClient, symbol: &str, date: NaiveDate) -> SymbolInputs {
    let earnings = match fmp.get_earnings(symbol, date).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Earnings fetch failed for {}: {}", symbol, e);
            None
        }
    };

    let closes = match fmp.get_historical_closes(symbol).await {
        Ok(closes) => closes,
        Err(e) => {
            warn!("Historical closes fetch failed for {}: {}", symbol, e);
            Vec::new()
        }
    };

    let current_price = match fmp.get_aftermarket_quote(symbol).await {
        Ok(price) => price,
        Err(e) => {
            warn!("After-market quote fetch failed for {}: {}", symbol, e);
            None
        }
    };

    let beta = match fmp.get_beta(symbol).await {
        Ok(beta) => beta,
        Err(e) => {
            warn!("Profile beta fetch failed for {}: {}", symbol, e);
            None
        }
    };

    SymbolInputs {
        earnings,
        closes,
        current_price,
        beta,
    }
}

/// Joins one calendar listing with its fetched inputs and the shared
/// context into a presentation row. Pure; absent inputs become blank
/// cells.
fn compose_row(
    listing: &CompanyListing,
    inputs: &SymbolInputs,
    ctx: &MarketContext,
    config: &ScanConfig,
) -> ScanRow {
    let eps_actual = inputs.earnings.as_ref().and_then(|e| e.eps_actual);
    let eps_estimated = inputs.earnings.as_ref().and_then(|e| e.eps_estimated);
    // Index 0 is today's session; index 1 is the close before the report.
    let previous_close = inputs.closes.get(1).map(|c| c.close);

    let metrics = compute_symbol_metrics(
        &listing.symbol,
        eps_actual,
        eps_estimated,
        inputs.current_price,
        previous_close,
        inputs.beta,
        ctx,
        config.strategy,
        config.overreaction_threshold,
    );
    let windows = windowed_changes(&inputs.closes);

    ScanRow {
        symbol: listing.symbol.clone(),
        company_name: listing.name.clone(),
        market_cap: listing.market_cap.clone(),
        eps_estimated,
        eps_actual,
        eps_surprise_pct: metrics.eps_surprise_pct,
        previous_close,
        current_price: inputs.current_price,
        return_pct: metrics.actual_return_pct,
        change_1w: windows.week,
        change_1m: windows.month,
        change_3m: windows.quarter,
        change_1y: windows.year,
        abnormal_return_pct: metrics.abnormal_return_pct,
        overreaction: metrics.overreaction,
    }
}

/// Runs a full cycle for one report date. Symbols are processed strictly
/// in sequence; the context is built once and shared read-only.
pub async fn run_scan(
    fmp: &FmpClient,
    http: &Client,
    date: NaiveDate,
    config: &ScanConfig,
) -> Result<Vec<ScanRow>, ScanError> {
    let ctx = build_market_context(fmp, config.fallback_risk_free_rate)
        .await
        .map_err(|e| ScanError::new("market context", e.message))?;

    let listings = nasdaq::fetch_earnings_calendar(http, date)
        .await
        .map_err(|e| ScanError::new("earnings calendar", e.to_string()))?;

    let mut rows = Vec::with_capacity(listings.len());
    for listing in &listings {
        let inputs = fetch_symbol_inputs(fmp, &listing.symbol, date).await;
        rows.push(compose_row(listing, &inputs, &ctx, config));
    }

    info!("Scan for {} produced {} rows", date, rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Overreaction, RateProvenance};
    use chrono::NaiveDate;

    fn listing() -> CompanyListing {
        CompanyListing {
            symbol: "ACME".into(),
            name: "Acme Corp".into(),
            market_cap: Some("$12,345,678".into()),
        }
    }

    fn context() -> MarketContext {
        MarketContext {
            market_return: 2.0,
            risk_free_rate: 1.0,
            rate_provenance: RateProvenance::Fetched,
        }
    }

    fn close_series(prices: &[f64]) -> Vec<HistoricalClose> {
        let start = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| HistoricalClose {
                date: start - chrono::Duration::days(i as i64),
                close,
            })
            .collect()
    }

    #[test]
    fn compose_row_with_full_inputs() {
        let inputs = SymbolInputs {
            earnings: Some(EarningsRecord {
                symbol: "ACME".into(),
                eps_actual: Some(1.10),
                eps_estimated: Some(1.00),
            }),
            closes: close_series(&[104.0, 100.0, 99.0]),
            current_price: Some(105.0),
            beta: Some(1.2),
        };
        let row = compose_row(&listing(), &inputs, &context(), &ScanConfig::default());

        assert_eq!(row.previous_close, Some(100.0));
        assert!((row.eps_surprise_pct.unwrap() - 10.0).abs() < 1e-9);
        assert!((row.return_pct.unwrap() - 5.0).abs() < 1e-9);
        assert!((row.abnormal_return_pct.unwrap() - 2.8).abs() < 1e-9);
        assert_eq!(row.overreaction, Overreaction::No);
        // Series is too short for any window.
        assert_eq!(row.change_1w, None);
    }

    #[test]
    fn compose_row_without_earnings_keeps_listing_fields() {
        let inputs = SymbolInputs {
            earnings: None,
            closes: Vec::new(),
            current_price: None,
            beta: None,
        };
        let row = compose_row(&listing(), &inputs, &context(), &ScanConfig::default());

        assert_eq!(row.symbol, "ACME");
        assert_eq!(row.company_name, "Acme Corp");
        assert_eq!(row.market_cap.as_deref(), Some("$12,345,678"));
        assert_eq!(row.eps_surprise_pct, None);
        assert_eq!(row.previous_close, None);
        assert_eq!(row.return_pct, None);
        assert_eq!(row.abnormal_return_pct, None);
        assert_eq!(row.overreaction, Overreaction::Unknown);
    }

    #[test]
    fn compose_row_raw_strategy_classifies_without_beta() {
        let config = ScanConfig {
            strategy: OverreactionStrategy::RawMagnitude,
            ..ScanConfig::default()
        };
        let inputs = SymbolInputs {
            earnings: Some(EarningsRecord {
                symbol: "ACME".into(),
                eps_actual: Some(1.01),
                eps_estimated: Some(1.00),
            }),
            // 1% surprise, 12% raw move: disproportionate under the raw
            // strategy even with no beta or abnormal return.
            closes: close_series(&[112.0, 100.0]),
            current_price: Some(112.0),
            beta: None,
        };
        let row = compose_row(&listing(), &inputs, &context(), &config);

        assert_eq!(row.abnormal_return_pct, None);
        assert_eq!(row.overreaction, Overreaction::Yes);
    }

    #[test]
    fn scan_error_names_the_stage() {
        let err = ScanError::new("market context", "index proxy fetch failed");
        assert_eq!(
            err.to_string(),
            "market context stage failed: index proxy fetch failed"
        );
    }
}
