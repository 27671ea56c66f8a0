// src/models.rs
use serde::Serialize;
use chrono::NaiveDate;

/// One symbol's actual/estimated EPS for a specific report date.
/// Absent fields stay absent; they are never substituted with zero.
#[derive(Debug, Clone, Serialize)]
pub struct EarningsRecord {
    pub symbol: String,
    pub eps_actual: Option<f64>,
    pub eps_estimated: Option<f64>,
}

/// A single daily close. Sequences of these arrive most-recent-first from
/// the price source and are never re-sorted downstream.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// A row of the earnings calendar: catalog metadata joined onto the
/// symbol's computed metrics at presentation time.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyListing {
    pub symbol: String,
    pub name: String,
    pub market_cap: Option<String>,
}

/// Whether the risk-free rate in a `MarketContext` came from the live
/// reference-rate feed or from the configured fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RateProvenance {
    Fetched,
    Fallback,
}

/// Market-wide reference values, built once per scan cycle and shared
/// read-only across every symbol in that cycle. Percentage-point units
/// throughout (1.5 means 1.5%).
#[derive(Debug, Clone, Serialize)]
pub struct MarketContext {
    pub market_return: f64,
    pub risk_free_rate: f64,
    pub rate_provenance: RateProvenance,
}

/// Three-valued overreaction verdict. `Unknown` serializes as an empty
/// string so the frontend renders a blank cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overreaction {
    Yes,
    No,
    #[serde(rename = "")]
    Unknown,
}

/// Computed result for one symbol. Recomputed fresh every cycle, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolMetrics {
    pub symbol: String,
    pub eps_surprise_pct: Option<f64>,
    pub actual_return_pct: Option<f64>,
    pub abnormal_return_pct: Option<f64>,
    pub overreaction: Overreaction,
}

/// Windowed historical price changes at nominal trading-day offsets.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PriceWindows {
    pub week: Option<f64>,
    pub month: Option<f64>,
    pub quarter: Option<f64>,
    pub year: Option<f64>,
}

/// One presentation row. Absent numeric fields serialize as null and the
/// frontend renders them blank.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRow {
    pub symbol: String,
    pub company_name: String,
    pub market_cap: Option<String>,
    pub eps_estimated: Option<f64>,
    pub eps_actual: Option<f64>,
    pub eps_surprise_pct: Option<f64>,
    pub previous_close: Option<f64>,
    pub current_price: Option<f64>,
    pub return_pct: Option<f64>,
    pub change_1w: Option<f64>,
    pub change_1m: Option<f64>,
    pub change_3m: Option<f64>,
    pub change_1y: Option<f64>,
    pub abnormal_return_pct: Option<f64>,
    pub overreaction: Overreaction,
}
