use crate::core::rates::RateTable;
use crate::core::signal::DEFAULT_THRESHOLD_PERCENT;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

impl Default for FrankfurterProviderConfig {
    fn default() -> Self {
        FrankfurterProviderConfig {
            base_url: "https://api.frankfurter.app".to_string(),
        }
    }
}

fn default_naver_base_url() -> String {
    "https://openapi.naver.com".to_string()
}

fn default_naver_sort() -> String {
    "date".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NaverProviderConfig {
    #[serde(default = "default_naver_base_url")]
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// `date` for newest first, `sim` for relevance.
    #[serde(default = "default_naver_sort")]
    pub sort: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
    pub naver: Option<NaverProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig::default()),
            naver: None,
        }
    }
}

fn default_unit() -> f64 {
    1.0
}

/// A currency shown as a cross-rate against the quote currency, per `unit`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CrossCurrency {
    pub currency: String,
    #[serde(default = "default_unit")]
    pub unit: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RatesConfig {
    pub base_currency: String,
    pub quote_currency: String,
    pub tracked: Vec<String>,
    pub cross: Vec<CrossCurrency>,
    /// Precomputed prior-year averages. Fetched from the rate provider when absent.
    pub last_year_average: Option<RateTable>,
    pub signal_threshold_percent: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        RatesConfig {
            base_currency: "USD".to_string(),
            quote_currency: "KRW".to_string(),
            tracked: vec!["KRW".to_string(), "JPY".to_string(), "CNY".to_string()],
            cross: vec![
                CrossCurrency {
                    currency: "EUR".to_string(),
                    unit: 1.0,
                },
                CrossCurrency {
                    currency: "JPY".to_string(),
                    unit: 100.0,
                },
                CrossCurrency {
                    currency: "CNY".to_string(),
                    unit: 1.0,
                },
            ],
            last_year_average: None,
            signal_threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

impl RatesConfig {
    /// Every currency the rate tables need to contain, without repeats.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        let candidates = std::iter::once(&self.quote_currency)
            .chain(self.tracked.iter())
            .chain(self.cross.iter().map(|c| &c.currency));
        for symbol in candidates {
            if symbol != &self.base_currency && !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }
        symbols
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NewsConfig {
    pub queries: Vec<String>,
    /// Raw results requested per query.
    pub display: usize,
    pub allowed_sources: Vec<String>,
    pub urgent_keywords: Vec<String>,
    pub important_keywords: Vec<String>,
    pub target_count: usize,
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for NewsConfig {
    fn default() -> Self {
        NewsConfig {
            queries: to_strings(&["제약 OR 바이오"]),
            display: 50,
            allowed_sources: to_strings(&[
                "yakup.com",
                "dailypharm.com",
                "hitnews.co.kr",
                "medipana.com",
                "kpanews.co.kr",
                "biospectator.com",
                "newsmp.com",
            ]),
            urgent_keywords: to_strings(&["리콜", "회수", "판매중지", "공급중단", "품절"]),
            important_keywords: to_strings(&["허가", "승인", "약가", "인수", "원료"]),
            target_count: 3,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub news: NewsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("kr", "fxbrief", "fxbrief")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  frankfurter:
    base_url: "http://example.com/fx"
  naver:
    client_id: "id"
    client_secret: "secret"
rates:
  quote_currency: "KRW"
  tracked: ["KRW", "JPY"]
  cross:
    - currency: "EUR"
    - currency: "JPY"
      unit: 100
  last_year_average:
    KRW: 1438.75
    JPY: 153.60
  signal_threshold_percent: 3.0
news:
  queries: ["제약", "바이오"]
  allowed_sources: ["yakup.com"]
  urgent_keywords: ["리콜"]
  important_keywords: ["허가"]
  target_count: 5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.frankfurter.unwrap().base_url,
            "http://example.com/fx"
        );
        let naver = config.providers.naver.expect("Expected naver config");
        assert_eq!(naver.base_url, "https://openapi.naver.com");
        assert_eq!(naver.client_id, "id");
        assert_eq!(naver.sort, "date");

        assert_eq!(config.rates.base_currency, "USD");
        assert_eq!(config.rates.tracked, vec!["KRW", "JPY"]);
        assert_eq!(config.rates.cross[0].unit, 1.0);
        assert_eq!(config.rates.cross[1].unit, 100.0);
        let averages = config.rates.last_year_average.expect("Expected averages");
        assert_eq!(averages.get("KRW"), Some(1438.75));
        assert_eq!(config.rates.signal_threshold_percent, 3.0);

        assert_eq!(config.news.queries.len(), 2);
        assert_eq!(config.news.display, 50);
        assert_eq!(config.news.target_count, 5);
        assert_eq!(config.news.allowed_sources, vec!["yakup.com"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert!(config.providers.frankfurter.is_some());
        assert!(config.providers.naver.is_none());
        assert_eq!(config.rates.quote_currency, "KRW");
        assert_eq!(config.rates.signal_threshold_percent, 2.0);
        assert!(config.rates.last_year_average.is_none());
        assert_eq!(config.news.target_count, 3);
        assert!(config.news.urgent_keywords.contains(&"리콜".to_string()));
    }

    #[test]
    fn test_symbols_are_unique_and_exclude_base() {
        let rates = RatesConfig {
            tracked: vec!["KRW".into(), "USD".into(), "JPY".into()],
            ..RatesConfig::default()
        };
        assert_eq!(rates.symbols(), vec!["KRW", "JPY", "EUR", "CNY"]);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/fxbrief/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
