use anyhow::{anyhow, Context};
use chrono::{Utc, Datelike};
use csv::Reader;
use log::{info, warn};
use reqwest;

/// Fetch the most recent 4-week T-bill rate from the Treasury daily-rates
/// CSV endpoint. Rows arrive most-recent-first; the first row with a
/// parseable "4 Wk" cell wins. The result is in percentage points.
pub async fn fetch_short_term_rate() -> anyhow::Result<f64> {
    let year = Utc::now().year();
    let url = format!(
        "https://home.treasury.gov/resource-center/data-chart-center/interest-rates/\
daily-treasury-rates.csv/{year}/all?_format=csv\
&field_tdr_date_value={year}\
&type=daily_treasury_bill_rates",
        year = year
    );
    info!("Fetching T-bill CSV from URL: {}", url);

    let csv_text = reqwest::get(&url)
        .await?
        .error_for_status()?
        .text()
        .await?;
    let mut rdr = Reader::from_reader(csv_text.as_bytes());

    let headers = rdr.headers().context("T-bill CSV has no header row")?.clone();
    let idx_4wk = headers
        .iter()
        .position(|h| h.trim() == "4 Wk")
        .ok_or_else(|| anyhow!("no '4 Wk' column in T-bill CSV"))?;

    for record in rdr.records() {
        let row = record?;
        let cell = row.get(idx_4wk).map(str::trim).unwrap_or("");
        match cell.parse::<f64>() {
            Ok(rate) => {
                info!("Found T-bill rate (4 Wk): {}", rate);
                return Ok(rate);
            }
            Err(_) => {
                warn!("Skipping T-bill row with unparseable '4 Wk' cell: {:?}", cell);
            }
        }
    }

    Err(anyhow!("no usable T-bill observation in CSV"))
}
