//! Core business logic: rate comparison, signals and news curation

pub mod comparator;
pub mod config;
pub mod curator;
pub mod dashboard;
pub mod log;
pub mod news;
pub mod rates;
pub mod signal;

// Re-export main types for cleaner imports
pub use comparator::{ChangeMetric, Comparison};
pub use curator::Curation;
pub use dashboard::{Dashboard, build_dashboard};
pub use news::{CategorizedNewsItem, NewsCategory, NewsItem, NewsProvider};
pub use rates::{Baseline, BaselineStatus, Fetched, RateProvider, RateTable};
pub use signal::{Signal, SignalKind};
