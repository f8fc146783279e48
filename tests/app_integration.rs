use chrono::NaiveDate;
use fxbrief::core::config::{AppConfig, NaverProviderConfig};
use fxbrief::core::{NewsCategory, SignalKind, build_dashboard};
use fxbrief::providers::{frankfurter::FrankfurterProvider, naver::NaverNewsProvider};
use std::fs;
use tracing::info;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub const LATEST: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "date": "2026-10-16",
        "rates": {"CNY": 7.2, "EUR": 0.9, "JPY": 150.0, "KRW": 1400.0}
    }"#;

    /// Rate server where `/latest` answers with `latest_status` and every
    /// historical endpoint fails.
    pub async fn create_rates_mock_server(latest_status: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(latest_status).set_body_string(LATEST))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/\d{4}-\d{2}-\d{2}(\.\.\d{4}-\d{2}-\d{2})?$"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// 50 search results: 6 from an allowed source, one urgent, two important.
    pub fn news_body() -> String {
        let mut items: Vec<String> = (0..44)
            .map(|i| {
                format!(
                    r#"{{"title": "<b>리콜</b> 블로그 {i}", "originallink": "https://blog.example.com/{i}", "link": "https://blog.example.com/{i}", "description": "", "pubDate": "Sun, 18 Oct 2026 07:00:00 +0900"}}"#
                )
            })
            .collect();
        let on_source = [
            (3, "제약 업계 &quot;동향&quot;"),
            (9, "신약 <b>허가</b> 획득"),
            (15, "원가 절감 사례"),
            (21, "바이오시밀러 승인 임박"),
            (28, "혈압약 리콜 결정"),
            (35, "CDMO 수주 확대"),
        ];
        for (position, title) in on_source {
            items.insert(
                position,
                format!(
                    r#"{{"title": "{title}", "originallink": "https://www.yakup.com/news/{position}", "link": "https://n.news.naver.com/mnews/{position}", "description": "식약처 발표", "pubDate": "Sun, 18 Oct 2026 08:00:00 +0900"}}"#
                ),
            );
        }
        format!(r#"{{"total": 50, "start": 1, "display": 50, "items": [{}]}}"#, items.join(","))
    }

    pub async fn create_news_mock_server(status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search/news.json"))
            .respond_with(ResponseTemplate::new(status).set_body_string(news_body()))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub fn write_config(rates_uri: &str, news_uri: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        providers:
          frankfurter:
            base_url: {rates_uri}
          naver:
            base_url: {news_uri}
            client_id: "id"
            client_secret: "secret"
        news:
          allowed_sources: ["yakup.com"]
    "#
        );
        fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }

    pub fn naver(uri: &str) -> NaverNewsProvider {
        NaverNewsProvider::new(&NaverProviderConfig {
            base_url: uri.to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            sort: "sim".to_string(),
        })
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let rates_server = test_utils::create_rates_mock_server(200).await;
    let news_server = test_utils::create_news_mock_server(200).await;
    let config_file = test_utils::write_config(&rates_server.uri(), &news_server.uri());

    for command in [
        fxbrief::AppCommand::Rates,
        fxbrief::AppCommand::News,
        fxbrief::AppCommand::Brief,
        fxbrief::AppCommand::Json,
    ] {
        let result =
            fxbrief::run_command(command, Some(config_file.path().to_str().unwrap())).await;
        assert!(
            result.is_ok(),
            "{command:?} failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_current_rate_failure_is_reported() {
    let rates_server = test_utils::create_rates_mock_server(500).await;
    let news_server = test_utils::create_news_mock_server(200).await;
    let config_file = test_utils::write_config(&rates_server.uri(), &news_server.uri());

    let result = fxbrief::run_command(
        fxbrief::AppCommand::Json,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Current rate failure must be fatal");
    info!(error = %err, "Received expected error");
    assert!(err.to_string().contains("Failed to fetch current rates"));
}

#[test_log::test(tokio::test)]
async fn test_history_unavailable_degrades_and_news_is_curated() {
    let rates_server = test_utils::create_rates_mock_server(200).await;
    let news_server = test_utils::create_news_mock_server(200).await;

    let mut config = AppConfig::default();
    config.news.allowed_sources = vec!["yakup.com".to_string()];
    let rate_provider = FrankfurterProvider::new(&rates_server.uri());
    let news_provider = test_utils::naver(&news_server.uri());
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let dashboard = build_dashboard(&config, &rate_provider, Some(&news_provider), today)
        .await
        .expect("Degraded inputs must not fail the dashboard");

    assert!(dashboard.baselines.last_year.is_degraded());
    assert!(dashboard.baselines.seven_day.is_degraded());
    assert!(dashboard.baselines.thirty_day.is_degraded());
    for pair in &dashboard.pairs {
        assert_eq!(pair.changes.vs_last_year, 0.0, "{}", pair.pair);
        assert_eq!(pair.changes.vs_seven_day, 0.0, "{}", pair.pair);
        assert_eq!(pair.changes.vs_thirty_day, 0.0, "{}", pair.pair);
        assert_eq!(pair.signal.signal, SignalKind::Neutral, "{}", pair.pair);
    }

    let krw = dashboard.pair("KRW").unwrap();
    assert_eq!(krw.rate, 1400.0);

    assert_eq!(dashboard.news.total_matched, 6);
    let picked: Vec<(&str, NewsCategory)> = dashboard
        .news
        .selected
        .iter()
        .map(|n| (n.item.title.as_str(), n.category))
        .collect();
    assert_eq!(
        picked,
        vec![
            ("혈압약 리콜 결정", NewsCategory::Urgent),
            ("신약 허가 획득", NewsCategory::Important),
            ("제약 업계 \"동향\"", NewsCategory::Normal),
        ]
    );
}

#[test_log::test(tokio::test)]
async fn test_news_failure_yields_empty_news() {
    let rates_server = test_utils::create_rates_mock_server(200).await;
    let news_server = test_utils::create_news_mock_server(500).await;

    let config = AppConfig::default();
    let rate_provider = FrankfurterProvider::new(&rates_server.uri());
    let news_provider = test_utils::naver(&news_server.uri());
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let dashboard = build_dashboard(&config, &rate_provider, Some(&news_provider), today)
        .await
        .unwrap();

    assert!(dashboard.news.selected.is_empty());
    assert_eq!(dashboard.news.total_matched, 0);
    assert_eq!(dashboard.derived_rates.len(), 3);
}
