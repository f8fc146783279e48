//! Reduces a noisy news feed to a small, prioritised set.
//!
//! The pipeline is sanitize, source filter, categorize, stable sort by
//! priority, one pick per category, then backfill up to the target count.
use crate::core::news::{CategorizedNewsItem, NewsCategory, NewsItem};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// Strips markup and decodes `&quot;` and `&amp;`.
///
/// Applied until the text stops changing, so sanitizing sanitized text is a
/// no-op even for inputs like `&amp;quot;` or `<<b>b>`.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(text: &str) -> String {
    RE_TAGS
        .replace_all(text, "")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Inputs that steer curation, normally taken from the news config.
#[derive(Debug, Clone, Copy)]
pub struct CurationRules<'a> {
    pub allowed_sources: &'a [String],
    pub urgent_keywords: &'a [String],
    pub important_keywords: &'a [String],
    pub target_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curation {
    pub selected: Vec<CategorizedNewsItem>,
    pub total_matched: usize,
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .filter(|n| !n.is_empty())
        .any(|n| haystack.contains(n.as_str()))
}

/// True if the item's link or original link contains an allowed source.
pub fn is_allowed_source(item: &NewsItem, allowed_sources: &[String]) -> bool {
    item.links().any(|link| contains_any(link, allowed_sources))
}

/// Keeps items from allowed sources, preserving input order.
pub fn filter_sources(items: Vec<NewsItem>, allowed_sources: &[String]) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| is_allowed_source(item, allowed_sources))
        .collect()
}

/// Urgent keywords are checked before important ones; the first match decides.
pub fn categorize(item: &NewsItem, urgent: &[String], important: &[String]) -> NewsCategory {
    let text = format!("{} {}", item.title, item.description);
    if contains_any(&text, urgent) {
        NewsCategory::Urgent
    } else if contains_any(&text, important) {
        NewsCategory::Important
    } else {
        NewsCategory::Normal
    }
}

pub fn curate(raw_items: Vec<NewsItem>, rules: &CurationRules<'_>) -> Curation {
    let raw_count = raw_items.len();
    let sanitized: Vec<NewsItem> = raw_items
        .into_iter()
        .map(|item| NewsItem {
            title: sanitize(&item.title),
            description: sanitize(&item.description),
            ..item
        })
        .collect();

    let matched = filter_sources(sanitized, rules.allowed_sources);
    let total_matched = matched.len();

    let mut ranked: Vec<CategorizedNewsItem> = matched
        .into_iter()
        .map(|item| {
            let category = categorize(&item, rules.urgent_keywords, rules.important_keywords);
            CategorizedNewsItem::new(item, category)
        })
        .collect();
    // `sort_by_key` is stable, ties keep upstream order.
    ranked.sort_by_key(|item| item.priority);

    let mut taken = vec![false; ranked.len()];
    let mut picks: Vec<usize> = Vec::with_capacity(rules.target_count);

    for category in NewsCategory::ALL {
        if let Some(index) = ranked
            .iter()
            .enumerate()
            .position(|(i, item)| !taken[i] && item.category == category)
        {
            taken[index] = true;
            picks.push(index);
        }
    }

    for index in 0..ranked.len() {
        if picks.len() >= rules.target_count {
            break;
        }
        if !taken[index] {
            taken[index] = true;
            picks.push(index);
        }
    }
    picks.truncate(rules.target_count);

    let mut slots: Vec<Option<CategorizedNewsItem>> = ranked.into_iter().map(Some).collect();
    let selected: Vec<CategorizedNewsItem> = picks
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    debug!(
        raw = raw_count,
        matched = total_matched,
        selected = selected.len(),
        "Curated news"
    );

    Curation {
        selected,
        total_matched,
    }
}

/// Concatenates query results in order, dropping repeated links.
pub fn merge_batches(batches: Vec<Vec<NewsItem>>) -> Vec<NewsItem> {
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    let mut duplicates = 0usize;

    for item in batches.into_iter().flatten() {
        if !seen_links.insert(item.link.clone()) {
            duplicates += 1;
            continue;
        }
        merged.push(item);
    }

    if duplicates > 0 {
        debug!(duplicates, kept = merged.len(), "Dropped repeated news links");
    }
    merged
}
