// src/bin/test_scan.rs
use chrono::NaiveDate;
use dotenv::dotenv;
use log::{error, info};
use std::env;

use aurora_dashboard::services::fmp::FmpClient;
use aurora_dashboard::services::scan::{run_scan, ScanConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let date_arg = env::args().nth(1).unwrap_or_else(|| "2025-07-15".to_string());
    let date = NaiveDate::parse_from_str(&date_arg, "%Y-%m-%d")?;

    info!("Running full scan for {}...", date);

    let fmp = FmpClient::from_env()?;
    let http = reqwest::Client::new();

    match run_scan(&fmp, &http, date, &ScanConfig::default()).await {
        Ok(rows) => {
            info!("SUCCESS: scan produced {} rows", rows.len());
            for row in &rows {
                println!(
                    "{:<8} surprise={:?} return={:?} abnormal={:?} overreaction={:?}",
                    row.symbol,
                    row.eps_surprise_pct,
                    row.return_pct,
                    row.abnormal_return_pct,
                    row.overreaction,
                );
            }
        }
        Err(e) => {
            error!("ERROR: scan aborted: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
