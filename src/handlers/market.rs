// src/handlers/market.rs
use std::sync::Arc;

use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use crate::services::market_context::build_market_context;
use crate::AppState;

use super::error::ApiError;

pub async fn get_market_context(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for current market context");

    match build_market_context(&state.fmp, state.config.fallback_risk_free_rate).await {
        Ok(ctx) => Ok(warp::reply::json(&ctx)),
        Err(e) => {
            error!("Failed to build market context: {}", e);
            Err(warp::reject::custom(ApiError::new(e.to_string())))
        }
    }
}
