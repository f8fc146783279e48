//! Fetches every input concurrently and combines comparator, classifier and
//! curator output into one result object for the presentation layer.
use crate::core::comparator::{self, Baselines, ChangeMetric, DerivedRate};
use crate::core::config::{AppConfig, NewsConfig, RatesConfig};
use crate::core::curator::{self, Curation, CurationRules};
use crate::core::news::{NewsItem, NewsProvider};
use crate::core::rates::{Fetched, RateProvider, RateTable};
use crate::core::signal::{self, Signal};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub pair: String,
    pub currency: String,
    pub rate: f64,
    pub changes: ChangeMetric,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub base_currency: String,
    pub quote_currency: String,
    pub current: RateTable,
    pub derived_rates: Vec<DerivedRate>,
    pub baselines: Baselines,
    pub pairs: Vec<PairReport>,
    pub news: Curation,
}

impl Dashboard {
    pub fn pair(&self, currency: &str) -> Option<&PairReport> {
        self.pairs.iter().find(|p| p.currency == currency)
    }
}

/// First and last day of the calendar year before `today`.
pub fn prior_year_range(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let year = today.year() - 1;
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Combines already-fetched inputs. Never fails: unavailable baselines fall
/// back to the current table and missing news is an empty list.
pub fn assemble(
    config: &AppConfig,
    current: RateTable,
    last_year: Fetched<RateTable>,
    seven_day: Fetched<RateTable>,
    thirty_day: Fetched<RateTable>,
    raw_news: Vec<NewsItem>,
    generated_at: DateTime<Utc>,
) -> Dashboard {
    let comparison = comparator::compare(&config.rates, &current, last_year, seven_day, thirty_day);

    let pairs = comparison
        .changes
        .into_iter()
        .map(|change| {
            let signal = signal::classify_with_threshold(
                change.changes.vs_last_year,
                change.changes.vs_seven_day,
                config.rates.signal_threshold_percent,
            );
            debug!(pair = %change.pair, signal = %signal.signal, "Classified pair");
            PairReport {
                pair: change.pair,
                currency: change.currency,
                rate: change.rate,
                changes: change.changes,
                signal,
            }
        })
        .collect();

    let news = curator::curate(raw_news, &curation_rules(&config.news));

    Dashboard {
        generated_at,
        base_currency: config.rates.base_currency.clone(),
        quote_currency: config.rates.quote_currency.clone(),
        current,
        derived_rates: comparison.derived_rates,
        baselines: comparison.baselines,
        pairs,
        news,
    }
}

fn curation_rules(news: &NewsConfig) -> CurationRules<'_> {
    CurationRules {
        allowed_sources: &news.allowed_sources,
        urgent_keywords: &news.urgent_keywords,
        important_keywords: &news.important_keywords,
        target_count: news.target_count,
    }
}

/// Fetches all inputs concurrently and assembles the dashboard.
///
/// Only the current-rate fetch is fatal. Historical tables and news queries
/// fail independently and degrade the result instead.
#[instrument(name = "BuildDashboard", skip_all, fields(today = %today))]
pub async fn build_dashboard(
    config: &AppConfig,
    rate_provider: &(dyn RateProvider + Send + Sync),
    news_provider: Option<&(dyn NewsProvider + Send + Sync)>,
    today: NaiveDate,
) -> Result<Dashboard> {
    let rates = &config.rates;
    let symbols = rates.symbols();
    let base = rates.base_currency.as_str();

    let (current, last_year, seven_day, thirty_day, raw_news) = tokio::join!(
        rate_provider.fetch_latest(base, &symbols),
        fetch_last_year(rates, rate_provider, &symbols, today),
        fetch_days_ago(rate_provider, base, &symbols, today, 7),
        fetch_days_ago(rate_provider, base, &symbols, today, 30),
        fetch_news(&config.news, news_provider),
    );

    let current = current.context("Failed to fetch current rates")?;
    info!(currencies = current.len(), "Fetched current rates");

    let last_year = Fetched::from_result(last_year, "last year average");
    let seven_day = Fetched::from_result(seven_day, "7-day rates");
    let thirty_day = Fetched::from_result(thirty_day, "30-day rates");
    let available = [&last_year, &seven_day, &thirty_day]
        .iter()
        .filter(|fetched| fetched.is_ok())
        .count();
    info!(available, total = 3, "Fetched historical baselines");

    Ok(assemble(
        config,
        current,
        last_year,
        seven_day,
        thirty_day,
        raw_news,
        Utc::now(),
    ))
}

async fn fetch_last_year(
    rates: &RatesConfig,
    provider: &(dyn RateProvider + Send + Sync),
    symbols: &[String],
    today: NaiveDate,
) -> Result<RateTable> {
    if let Some(precomputed) = &rates.last_year_average {
        debug!("Using configured last year average");
        return Ok(precomputed.clone());
    }
    let (start, end) =
        prior_year_range(today).ok_or_else(|| anyhow!("No prior year for {today}"))?;
    provider
        .fetch_average(start, end, &rates.base_currency, symbols)
        .await
}

async fn fetch_days_ago(
    provider: &(dyn RateProvider + Send + Sync),
    base: &str,
    symbols: &[String],
    today: NaiveDate,
    days: u64,
) -> Result<RateTable> {
    let date = today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| anyhow!("Date out of range: {today} minus {days} days"))?;
    provider.fetch_on(date, base, symbols).await
}

async fn fetch_news(
    news: &NewsConfig,
    provider: Option<&(dyn NewsProvider + Send + Sync)>,
) -> Vec<NewsItem> {
    let Some(provider) = provider else {
        warn!("No news provider configured, news will be empty");
        return Vec::new();
    };

    let searches = news.queries.iter().map(|query| async move {
        match provider.search(query, news.display).await {
            Ok(items) => {
                debug!(query = %query, count = items.len(), "News query returned");
                items
            }
            Err(e) => {
                warn!(error = %e, query = %query, "News query failed, continuing without it");
                Vec::new()
            }
        }
    });

    curator::merge_batches(join_all(searches).await)
}
