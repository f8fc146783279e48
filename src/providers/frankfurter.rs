use crate::core::rates::{RateProvider, RateTable};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

type RawRates = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    rates: RawRates,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    rates: BTreeMap<String, RawRates>,
}

/// Rates published by the ECB through the Frankfurter API. No key needed.
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        base: &str,
        symbols: &[String],
    ) -> Result<T> {
        let url = Url::parse_with_params(
            &format!("{}/{}", self.base_url, endpoint),
            &[("base", base), ("symbols", symbols.join(",").as_str())],
        )
        .map_err(|e| anyhow!("Invalid URL for endpoint {}: {}", endpoint, e))?;
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxbrief/0.1")
            .build()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for endpoint: {}", e, endpoint))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for endpoint: {}",
                response.status(),
                endpoint
            ));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", endpoint, e))
    }

    async fn fetch_snapshot(&self, endpoint: &str, base: &str, symbols: &[String]) -> Result<RateTable> {
        let data: SnapshotResponse = self.get_json(endpoint, base, symbols).await?;
        let table = RateTable::from_json_values(data.rates);
        if table.is_empty() {
            return Err(anyhow!("No rates found for endpoint: {}", endpoint));
        }
        Ok(table)
    }
}

/// Per-currency mean over a series of daily tables.
fn average_tables<'a>(tables: impl IntoIterator<Item = &'a RateTable>) -> RateTable {
    let mut totals: HashMap<String, (f64, usize)> = HashMap::new();
    for table in tables {
        for (code, rate) in table.iter() {
            let entry = totals.entry(code.to_string()).or_insert((0.0, 0));
            entry.0 += rate;
            entry.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(code, (sum, count))| (code, sum / count as f64))
        .collect()
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self, symbols), fields(base = %base))]
    async fn fetch_latest(&self, base: &str, symbols: &[String]) -> Result<RateTable> {
        self.fetch_snapshot("latest", base, symbols).await
    }

    #[instrument(name = "FrankfurterOnDate", skip(self, symbols), fields(base = %base, date = %date))]
    async fn fetch_on(
        &self,
        date: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> Result<RateTable> {
        let endpoint = date.format("%Y-%m-%d").to_string();
        self.fetch_snapshot(&endpoint, base, symbols).await
    }

    #[instrument(name = "FrankfurterAverage", skip(self, symbols), fields(base = %base, start = %start, end = %end))]
    async fn fetch_average(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> Result<RateTable> {
        let endpoint = format!("{}..{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        let data: SeriesResponse = self.get_json(&endpoint, base, symbols).await?;

        let daily: Vec<RateTable> = data
            .rates
            .into_values()
            .map(RateTable::from_json_values)
            .collect();
        debug!(days = daily.len(), "Averaging daily rates");

        let average = average_tables(&daily);
        if average.is_empty() {
            return Err(anyhow!("No rates found between {} and {}", start, end));
        }
        Ok(average)
    }
}
