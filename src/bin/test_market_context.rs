// src/bin/test_market_context.rs
use dotenv::dotenv;
use log::{error, info};

use aurora_dashboard::services::fmp::FmpClient;
use aurora_dashboard::services::market_context::{
    build_market_context, DEFAULT_FALLBACK_RISK_FREE_RATE,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Testing market context construction...");

    let fmp = FmpClient::from_env()?;
    match build_market_context(&fmp, DEFAULT_FALLBACK_RISK_FREE_RATE).await {
        Ok(ctx) => {
            info!("SUCCESS: {:?}", ctx);
            println!("Market return:  {:.4}%", ctx.market_return);
            println!("Risk-free rate: {:.4}% ({:?})", ctx.risk_free_rate, ctx.rate_provenance);
        }
        Err(e) => {
            error!("ERROR: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
