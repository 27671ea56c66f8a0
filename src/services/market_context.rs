// src/services/market_context.rs
use std::fmt;

use log::{info, warn};

use crate::models::{MarketContext, RateProvenance};
use crate::services::calculations::calculate_price_change;
use crate::services::fmp::FmpClient;
use crate::services::treasury;

/// Broad-market index proxy for the CAPM market-return leg.
pub const MARKET_PROXY_SYMBOL: &str = "^GSPC";

/// Substituted when the reference-rate feed fails; deliberately nominal.
pub const DEFAULT_FALLBACK_RISK_FREE_RATE: f64 = 5.0;

/// The market-wide context could not be built. Every symbol's abnormal
/// return depends on it, so the whole cycle aborts before any per-symbol
/// work starts.
#[derive(Debug, Clone)]
pub struct ContextError {
    pub message: String,
}

impl ContextError {
    pub fn new(message: impl Into<String>) -> Self {
        ContextError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "market context unavailable: {}", self.message)
    }
}

impl std::error::Error for ContextError {}

/// Builds the shared context for one scan cycle.
///
/// Market return comes from the latest two closes of the index proxy. If
/// those cannot be had, the cycle fails here. The risk-free rate comes
/// from the short-term Treasury feed; on failure the configured fallback
/// is substituted and the provenance marked so callers can tell the two
/// apart.
pub async fn build_market_context(
    fmp: &FmpClient,
    fallback_risk_free_rate: f64,
) -> Result<MarketContext, ContextError> {
    let closes = fmp
        .get_historical_closes(MARKET_PROXY_SYMBOL)
        .await
        .map_err(|e| ContextError::new(format!("index proxy fetch failed: {}", e)))?;

    let latest = closes.first().map(|c| c.close);
    let previous = closes.get(1).map(|c| c.close);
    let market_return = calculate_price_change(latest, previous).ok_or_else(|| {
        ContextError::new(format!(
            "need two closes of {} to compute market return, got {}",
            MARKET_PROXY_SYMBOL,
            closes.len()
        ))
    })?;

    let (risk_free_rate, rate_provenance) =
        resolve_rate(treasury::fetch_short_term_rate().await, fallback_risk_free_rate);

    info!(
        "Market context: market_return={:.4}%, risk_free_rate={:.4}% ({:?})",
        market_return, risk_free_rate, rate_provenance
    );

    Ok(MarketContext {
        market_return,
        risk_free_rate,
        rate_provenance,
    })
}

/// Resolves the reference-rate fetch outcome: the live observation when
/// the fetch succeeded, otherwise the configured fallback, with the
/// provenance marking which one the context carries.
fn resolve_rate(fetched: anyhow::Result<f64>, fallback: f64) -> (f64, RateProvenance) {
    match fetched {
        Ok(rate) => (rate, RateProvenance::Fetched),
        Err(e) => {
            warn!("Reference-rate fetch failed ({}); using fallback {}", e, fallback);
            (fallback, RateProvenance::Fallback)
        }
    }
}
