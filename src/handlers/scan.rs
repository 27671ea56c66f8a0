// src/handlers/scan.rs
use std::sync::Arc;

use chrono::NaiveDate;
use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use crate::services::scan::run_scan;
use crate::AppState;

use super::error::{ApiError, InvalidDate};

/// Today's date on the US market calendar; Nasdaq report dates are
/// Eastern-time dates.
fn market_today() -> NaiveDate {
    chrono::Utc::now()
        .with_timezone(&chrono_tz::US::Eastern)
        .date_naive()
}

pub async fn get_scan_for_date(date: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| warp::reject::custom(InvalidDate { raw: date }))?;
    scan_and_reply(date, state).await
}

pub async fn get_scan_today(state: Arc<AppState>) -> Result<Json, Rejection> {
    scan_and_reply(market_today(), state).await
}

async fn scan_and_reply(date: NaiveDate, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling scan request for {}", date);

    match run_scan(&state.fmp, &state.http, date, &state.config).await {
        Ok(rows) => Ok(warp::reply::json(&rows)),
        Err(e) => {
            error!("Scan for {} aborted: {}", date, e);
            Err(warp::reject::custom(ApiError::new(e.to_string())))
        }
    }
}
