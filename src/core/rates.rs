//! Exchange-rate tables and the provider abstraction that fetches them

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::warn;

/// Rates keyed by currency code, each quoted per one unit of the base currency.
///
/// Only positive, finite rates are ever stored. Anything else an upstream
/// sends is treated as if the currency were missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, f64>);

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(BTreeMap::<String, f64>::deserialize(deserializer)?
            .into_iter()
            .collect())
    }
}

impl RateTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a table from a raw JSON object, dropping values that are not
    /// usable rates.
    pub fn from_json_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        values
            .into_iter()
            .filter_map(|(code, value)| value.as_f64().map(|rate| (code, rate)))
            .collect()
    }

    pub fn insert(&mut self, code: impl Into<String>, rate: f64) {
        if is_usable_rate(rate) {
            self.0.insert(code.into(), rate);
        }
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut table = RateTable::new();
        for (code, rate) in iter {
            table.insert(code, rate);
        }
        table
    }
}

impl<const N: usize> From<[(&str, f64); N]> for RateTable {
    fn from(entries: [(&str, f64); N]) -> Self {
        entries
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect()
    }
}

fn is_usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Outcome of fetching one input table, before any fallback is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ok(T),
    Unavailable(String),
}

impl<T> Fetched<T> {
    /// Converts a fetch result, logging the failure that makes it unavailable.
    pub fn from_result(result: Result<T>, what: &str) -> Self {
        match result {
            Ok(value) => Fetched::Ok(value),
            Err(e) => {
                warn!(error = %e, input = what, "Input unavailable, falling back");
                Fetched::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Fetched::Ok(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineStatus {
    Ok,
    Degraded,
}

impl Display for BaselineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineStatus::Ok => write!(f, "ok"),
            BaselineStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// A historical table as used by the comparator, tagged with whether it is
/// the real upstream data or the current table standing in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub status: BaselineStatus,
    pub rates: RateTable,
}

impl Baseline {
    pub fn ok(rates: RateTable) -> Self {
        Self {
            status: BaselineStatus::Ok,
            rates,
        }
    }

    /// Substitutes `current` when the historical table could not be fetched.
    pub fn resolve(fetched: Fetched<RateTable>, current: &RateTable) -> Self {
        match fetched {
            Fetched::Ok(rates) => Baseline::ok(rates),
            Fetched::Unavailable(_) => Self {
                status: BaselineStatus::Degraded,
                rates: current.clone(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status == BaselineStatus::Degraded
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest published rates for `symbols`, quoted against `base`.
    async fn fetch_latest(&self, base: &str, symbols: &[String]) -> Result<RateTable>;

    /// Rates as published on `date`.
    async fn fetch_on(&self, date: NaiveDate, base: &str, symbols: &[String])
    -> Result<RateTable>;

    /// Mean of the daily rates between `start` and `end`, both inclusive.
    async fn fetch_average(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> Result<RateTable>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;

    #[test]
    fn test_from_json_values_drops_unusable_rates() {
        let raw = json!({
            "KRW": 1400.5,
            "JPY": "150.1",
            "CNY": null,
            "EUR": 0.0,
            "GBP": -1.0,
            "CHF": 0.88
        });
        let serde_json::Value::Object(map) = raw else {
            panic!("Expected a JSON object");
        };

        let table = RateTable::from_json_values(map);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("KRW"), Some(1400.5));
        assert_eq!(table.get("CHF"), Some(0.88));
        assert_eq!(table.get("JPY"), None);
        assert_eq!(table.get("EUR"), None);
    }

    #[test]
    fn test_insert_ignores_non_finite() {
        let mut table = RateTable::new();
        table.insert("KRW", f64::NAN);
        table.insert("JPY", f64::INFINITY);
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_deserializes_from_plain_map() {
        let table: RateTable =
            serde_yaml::from_str("KRW: 1438.75\nJPY: 153.6\nCNY: 0\n").unwrap();
        assert_eq!(table.get("KRW"), Some(1438.75));
        assert_eq!(table.get("JPY"), Some(153.6));
        assert_eq!(table.get("CNY"), None);
    }

    #[test]
    fn test_baseline_resolve_substitutes_current() {
        let current = RateTable::from([("KRW", 1400.0)]);

        let resolved = Baseline::resolve(Fetched::Unavailable("timeout".into()), &current);
        assert!(resolved.is_degraded());
        assert_eq!(resolved.rates, current);

        let history = RateTable::from([("KRW", 1390.0)]);
        let resolved = Baseline::resolve(Fetched::Ok(history.clone()), &current);
        assert_eq!(resolved.status, BaselineStatus::Ok);
        assert_eq!(resolved.rates, history);
    }

    #[test]
    fn test_fetched_from_result() {
        let ok: Fetched<u8> = Fetched::from_result(Ok(1), "test");
        assert!(ok.is_ok());

        let failed: Fetched<u8> = Fetched::from_result(Err(anyhow!("HTTP error: 500")), "test");
        assert_eq!(failed, Fetched::Unavailable("HTTP error: 500".to_string()));
    }
}
