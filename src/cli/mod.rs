//! Terminal presentation of the dashboard

pub mod brief;
pub mod news;
pub mod rates;
pub mod setup;
pub mod ui;
