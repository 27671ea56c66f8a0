use dotenv::dotenv;
use env_logger;
use log::{error, info, warn};
use std::env;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use warp::Filter;

use aurora_dashboard::services::fmp::FmpClient;
use aurora_dashboard::services::scan::ScanConfig;
use aurora_dashboard::{routes, AppState};

fn scan_config_from_env() -> ScanConfig {
    let mut config = ScanConfig::default();

    if let Ok(raw) = env::var("FALLBACK_RISK_FREE_RATE") {
        match raw.parse::<f64>() {
            Ok(rate) => config.fallback_risk_free_rate = rate,
            Err(_) => warn!("Ignoring unparseable FALLBACK_RISK_FREE_RATE: {}", raw),
        }
    }

    if let Ok(raw) = env::var("OVERREACTION_THRESHOLD") {
        match raw.parse::<f64>() {
            Ok(threshold) => config.overreaction_threshold = threshold,
            Err(_) => warn!("Ignoring unparseable OVERREACTION_THRESHOLD: {}", raw),
        }
    }

    config
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let fmp = match FmpClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("Startup configuration error: {}", e);
            process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        fmp,
        http: reqwest::Client::new(),
        config: scan_config_from_env(),
    });

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });

    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;
}
