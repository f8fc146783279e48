//! News items and the provider abstraction that searches for them

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_link: Option<String>,
    pub pub_date: String,
}

impl NewsItem {
    /// Publication time, if the provider's date string is RFC 2822 or RFC 3339.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.pub_date.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }

    /// Every link the item is reachable under.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.link.as_str()).chain(self.original_link.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Urgent,
    Important,
    Normal,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 3] = [
        NewsCategory::Urgent,
        NewsCategory::Important,
        NewsCategory::Normal,
    ];

    pub fn priority(&self) -> u8 {
        match self {
            NewsCategory::Urgent => 1,
            NewsCategory::Important => 2,
            NewsCategory::Normal => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::Urgent => "긴급",
            NewsCategory::Important => "중요",
            NewsCategory::Normal => "일반",
        }
    }
}

impl Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NewsCategory::Urgent => "urgent",
                NewsCategory::Important => "important",
                NewsCategory::Normal => "normal",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedNewsItem {
    #[serde(flatten)]
    pub item: NewsItem,
    pub priority: u8,
    pub category: NewsCategory,
    pub label: String,
}

impl CategorizedNewsItem {
    pub fn new(item: NewsItem, category: NewsCategory) -> Self {
        Self {
            item,
            priority: category.priority(),
            category,
            label: category.label().to_string(),
        }
    }
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Runs one search query and returns at most `display` raw results.
    async fn search(&self, query: &str, display: usize) -> Result<Vec<NewsItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pub_date: &str) -> NewsItem {
        NewsItem {
            title: "t".into(),
            description: "d".into(),
            link: "https://n.news.naver.com/a/1".into(),
            original_link: Some("https://www.yakup.com/news/1".into()),
            pub_date: pub_date.into(),
        }
    }

    #[test]
    fn test_published_at_parses_provider_formats() {
        assert!(item("Mon, 12 Oct 2026 09:30:00 +0900").published_at().is_some());
        assert!(item("2026-10-12T09:30:00+09:00").published_at().is_some());
        assert!(item("yesterday").published_at().is_none());
    }

    #[test]
    fn test_links_include_original() {
        let news = item("");
        let links: Vec<&str> = news.links().collect();
        assert_eq!(
            links,
            vec!["https://n.news.naver.com/a/1", "https://www.yakup.com/news/1"]
        );
    }

    #[test]
    fn test_category_priorities_are_ordered() {
        let priorities: Vec<u8> = NewsCategory::ALL.iter().map(|c| c.priority()).collect();
        assert_eq!(priorities, vec![1, 2, 3]);
    }

    #[test]
    fn test_categorized_item_serializes_flat() {
        let categorized = CategorizedNewsItem::new(item(""), NewsCategory::Urgent);
        let json = serde_json::to_value(&categorized).unwrap();
        assert_eq!(json["title"], "t");
        assert_eq!(json["originalLink"], "https://www.yakup.com/news/1");
        assert_eq!(json["category"], "urgent");
        assert_eq!(json["priority"], 1);
        assert_eq!(json["label"], "긴급");
    }
}
