// src/bin/test_treasury.rs
use aurora_dashboard::services::treasury::fetch_short_term_rate;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();
    println!("4-Week T-Bill Rate: {:?}", fetch_short_term_rate().await?);
    Ok(())
}
