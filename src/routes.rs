// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::{ApiError, InvalidDate};
use crate::handlers::{market::get_market_context, scan::get_scan_for_date, scan::get_scan_today};
use crate::AppState;

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(invalid) = err.find::<InvalidDate>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = format!("invalid date '{}', expected YYYY-MM-DD", invalid.raw);
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = api_error.message.clone();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let scan_date_route = warp::path!("api" / "v1" / "scan" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_scan_for_date);

    let scan_today_route = warp::path!("api" / "v1" / "scan")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_scan_today);

    let market_context_route = warp::path!("api" / "v1" / "market_context")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_market_context);

    info!("All routes configured successfully.");

    scan_date_route
        .or(scan_today_route)
        .or(market_context_route)
        .recover(handle_rejection)
}
