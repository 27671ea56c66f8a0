// src/lib.rs

// Re-export or define the top-level modules you need
pub mod services;
pub mod models;
pub mod handlers;
pub mod routes;

use crate::services::fmp::FmpClient;
use crate::services::scan::ScanConfig;

/// Shared application state: the FMP client (owns the API key), a plain
/// reqwest client for the Nasdaq calendar, and the scan configuration.
pub struct AppState {
    pub fmp: FmpClient,
    pub http: reqwest::Client,
    pub config: ScanConfig,
}
