use crate::core::config::NaverProviderConfig;
use crate::core::news::{NewsItem, NewsProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

/// The search API rejects `display` outside this range.
const MAX_DISPLAY: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    #[serde(default)]
    description: String,
    link: String,
    #[serde(default, rename = "originallink")]
    original_link: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
}

impl From<SearchItem> for NewsItem {
    fn from(item: SearchItem) -> Self {
        NewsItem {
            title: item.title,
            description: item.description,
            link: item.link,
            original_link: item.original_link.filter(|l| !l.is_empty()),
            pub_date: item.pub_date,
        }
    }
}

/// Naver news search. Results come back raw, markup and all.
pub struct NaverNewsProvider {
    base_url: String,
    client_id: String,
    client_secret: String,
    sort: String,
}

impl NaverNewsProvider {
    pub fn new(config: &NaverProviderConfig) -> Self {
        NaverNewsProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            sort: config.sort.clone(),
        }
    }
}

#[async_trait]
impl NewsProvider for NaverNewsProvider {
    #[instrument(name = "NaverNewsSearch", skip(self, display), fields(query = %query))]
    async fn search(&self, query: &str, display: usize) -> Result<Vec<NewsItem>> {
        let display = display.clamp(1, MAX_DISPLAY).to_string();
        let url = Url::parse_with_params(
            &format!("{}/v1/search/news.json", self.base_url),
            &[
                ("query", query),
                ("display", display.as_str()),
                ("sort", self.sort.as_str()),
            ],
        )
        .map_err(|e| anyhow!("Invalid news search URL: {}", e))?;
        debug!("Requesting news from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxbrief/0.1")
            .build()?;
        let response = client
            .get(url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for news query: {}", e, query))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for news query: {}",
                response.status(),
                query
            ));
        }

        let text = response.text().await?;
        let data: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for news query {}: {}", query, e))?;

        debug!(count = data.items.len(), "Received news items");
        Ok(data.items.into_iter().map(NewsItem::from).collect())
    }
}
