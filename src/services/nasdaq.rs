// src/services/nasdaq.rs
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use log::info;
use reqwest::Client;
use serde::Deserialize;

use crate::models::CompanyListing;

const CALENDAR_URL: &str = "https://api.nasdaq.com/api/calendar/earnings";

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    data: Option<CalendarData>,
}

#[derive(Debug, Deserialize)]
struct CalendarData {
    rows: Option<Vec<CalendarRow>>,
}

#[derive(Debug, Deserialize)]
struct CalendarRow {
    symbol: String,
    name: String,
    #[serde(rename = "marketCap")]
    market_cap: Option<String>,
}

/// Companies reporting on `date` per the Nasdaq earnings calendar.
/// An empty calendar (weekend, holiday) is an empty list, not an error.
/// The endpoint refuses requests without browser-like headers.
pub async fn fetch_earnings_calendar(
    client: &Client,
    date: NaiveDate,
) -> anyhow::Result<Vec<CompanyListing>> {
    info!("Fetching Nasdaq earnings calendar for {}", date);

    let response = client
        .get(CALENDAR_URL)
        .query(&[("date", date.format("%Y-%m-%d").to_string())])
        .header("Accept", "application/json, text/plain, */*")
        .header("Accept-Language", "en-US,en;q=0.9")
        .header("Origin", "https://www.nasdaq.com")
        .header("Referer", "https://www.nasdaq.com")
        .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
        .send()
        .await?
        .error_for_status()
        .context("Nasdaq calendar request failed")?;

    let payload: CalendarResponse = response.json().await?;
    let data = payload
        .data
        .ok_or_else(|| anyhow!("unexpected payload from Nasdaq calendar API"))?;

    let listings: Vec<CompanyListing> = data
        .rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| CompanyListing {
            symbol: row.symbol,
            name: row.name,
            market_cap: row.market_cap,
        })
        .collect();

    info!("Calendar has {} listings for {}", listings.len(), date);
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_rows_deserialize() {
        let json = r#"{"data": {"rows": [
            {"symbol": "ACME", "name": "Acme Corp", "marketCap": "$12,345,678", "time": "time-after-hours"},
            {"symbol": "BETA", "name": "Beta Inc", "marketCap": null}
        ]}}"#;
        let payload: CalendarResponse = serde_json::from_str(json).unwrap();
        let rows = payload.data.unwrap().rows.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].market_cap.as_deref(), Some("$12,345,678"));
        assert_eq!(rows[1].market_cap, None);
    }

    #[test]
    fn empty_calendar_is_not_an_error() {
        let payload: CalendarResponse =
            serde_json::from_str(r#"{"data": {"rows": null}}"#).unwrap();
        assert!(payload.data.unwrap().rows.is_none());
    }
}
